//! Timeline reconstruction
//!
//! Walks a pipeline specification for one reference date and lays every work
//! item out on a shared time axis starting at the anchor:
//!
//! - stages run in declared order; a stage starts when the slowest chain of
//!   the previous stage has finished (the barrier is a `max`, never a sum)
//! - chains inside a stage all start at the stage base
//! - items inside a chain run back to back
//!
//! Items without a successful past execution are laid out with zero duration
//! and flagged, rather than failing the run.

use chrono::{NaiveDateTime, TimeDelta};
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::domain::{ANCHOR, Chain, PipelineSpec, ReferenceDate, TaskInterval, Timeline};
use crate::error::{LookupError, TimelineError};
use crate::label::{strip_tags, task_label};
use crate::resolver::DurationResolver;

/// Builds timelines from a pipeline specification and a duration source
pub struct TimelineBuilder<R> {
    resolver: R,
    anchor: NaiveDateTime,
}

/// Intervals produced by one chain and where its cursor ended up
struct ChainWalk {
    intervals: Vec<TaskInterval>,
    cursor: NaiveDateTime,
}

impl<R: DurationResolver> TimelineBuilder<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            anchor: ANCHOR,
        }
    }

    /// Use a different time origin; every reference date built by this
    /// builder shares it
    pub fn with_anchor(mut self, anchor: NaiveDateTime) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Compute the timeline of one reference date
    ///
    /// The specification is validated before any lookup is made. Chains of a
    /// stage are resolved concurrently but merged in declared order, so the
    /// output is deterministic for a deterministic resolver.
    ///
    /// # Errors
    /// - `MalformedSpec` if a stage or chain is empty
    /// - `LookupFailure` if the resolver cannot complete a lookup, or returns a
    ///   duration that does not fit on the time axis
    pub async fn build(
        &self,
        spec: &PipelineSpec,
        date: ReferenceDate,
    ) -> Result<Timeline, TimelineError> {
        spec.validate()?;

        info!(
            "Building timeline as of {} ({} stage(s), {} work item(s))",
            date,
            spec.stages.len(),
            spec.work_item_count()
        );

        let mut intervals = Vec::with_capacity(spec.work_item_count());
        let mut degraded = Vec::new();
        let mut stage_base = self.anchor;

        for (stage_idx, stage) in spec.stages.iter().enumerate() {
            let walks = join_all(
                stage
                    .chains()
                    .iter()
                    .map(|chain| self.walk_chain(chain, stage_base, date)),
            )
            .await;

            // The barrier must see every chain before the next stage starts
            let mut stage_max_finish = stage_base;
            for walk in walks {
                let walk = walk?;
                stage_max_finish = stage_max_finish.max(walk.cursor);
                for interval in walk.intervals {
                    if interval.degraded {
                        degraded.push(interval.work_item.clone());
                    }
                    intervals.push(interval);
                }
            }

            debug!(
                "Stage {} as of {}: {} -> {}",
                stage_idx, date, stage_base, stage_max_finish
            );
            stage_base = stage_max_finish;
        }

        if !degraded.is_empty() {
            warn!(
                "Timeline as of {} used zero duration for {} work item(s)",
                date,
                degraded.len()
            );
        }
        info!("Timeline as of {} finishes at {}", date, stage_base);

        Ok(Timeline {
            reference_date: date,
            intervals,
            degraded,
            finish: stage_base,
        })
    }

    /// Compute independent timelines for several reference dates
    ///
    /// Dates are built concurrently. A failure affects only its own date;
    /// results are returned in the order the dates were given.
    pub async fn build_all(
        &self,
        spec: &PipelineSpec,
        dates: &[ReferenceDate],
    ) -> Vec<(ReferenceDate, Result<Timeline, TimelineError>)> {
        join_all(
            dates
                .iter()
                .map(|&date| async move { (date, self.build(spec, date).await) }),
        )
        .await
    }

    async fn walk_chain(
        &self,
        chain: &Chain,
        base: NaiveDateTime,
        date: ReferenceDate,
    ) -> Result<ChainWalk, TimelineError> {
        let mut cursor = base;
        let mut intervals = Vec::with_capacity(chain.items().len());

        for work_item in chain.items() {
            let resolution = self.resolver.resolve(work_item, date).await.map_err(|source| {
                TimelineError::LookupFailure {
                    work_item: work_item.clone(),
                    reference_date: date,
                    source,
                }
            })?;

            let (duration_minutes, degraded) = match &resolution.execution {
                Some(execution) => {
                    info!(
                        "{}: build #{} completed {}, duration {} min",
                        resolution.display_name,
                        execution.number,
                        execution.completed_at,
                        execution.duration_minutes
                    );
                    (execution.duration_minutes.max(0), false)
                }
                None => {
                    warn!(
                        "{}: no successful build found as of {}, using duration of 0",
                        resolution.display_name, date
                    );
                    (0, true)
                }
            };

            let start = cursor;
            let finish = TimeDelta::try_minutes(duration_minutes)
                .and_then(|delta| start.checked_add_signed(delta))
                .ok_or_else(|| TimelineError::LookupFailure {
                    work_item: work_item.clone(),
                    reference_date: date,
                    source: LookupError::Malformed(format!(
                        "duration of {duration_minutes} min starting at {start} is out of range"
                    )),
                })?;
            debug!("{}: {} -> {}", resolution.display_name, start, finish);

            intervals.push(TaskInterval {
                label: task_label(&resolution.display_name, date),
                group_key: strip_tags(&resolution.display_name),
                work_item: work_item.clone(),
                reference_date: date,
                start,
                finish,
                duration_minutes,
                degraded,
            });

            cursor = finish;
        }

        Ok(ChainWalk { intervals, cursor })
    }
}
