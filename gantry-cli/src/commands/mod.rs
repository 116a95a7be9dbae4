//! Commands module
//!
//! Defines all CLI commands and their handlers, plus the pieces they share:
//! loading the pipeline file, assembling the resolver stack and building
//! timelines for every requested reference date.

mod render;
mod timeline;
mod validate;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::*;
use gantry_client::{JenkinsClient, JenkinsDurationResolver};
use gantry_core::TimelineError;
use gantry_core::domain::{PipelineSpec, ReferenceDate, Timeline};
use gantry_core::resolver::{CachingResolver, DurationResolver, RetryingResolver};
use gantry_core::timeline::TimelineBuilder;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::Config;
use crate::render::Format;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Render a Gantt chart of the pipeline for one or more reference dates
    Render {
        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "html")]
        format: Format,

        /// Output file (defaults to gantt-simple-gantt-chart-<first>-to-<last>.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the computed intervals
    Timeline {
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Check a pipeline file without contacting the build server
    Validate {
        /// Path to the pipeline JSON file
        #[arg(short, long)]
        pipeline: PathBuf,
    },
}

/// Pipeline file and reference dates
#[derive(Args)]
pub struct PipelineArgs {
    /// Path to the pipeline JSON file
    #[arg(short, long)]
    pub pipeline: PathBuf,

    /// Reference date (YYYY-MM-DD); repeat for several dates
    #[arg(short, long = "date", required = true)]
    pub dates: Vec<ReferenceDate>,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Render {
            pipeline,
            format,
            output,
        } => render::handle_render(&pipeline, format, output, config).await,
        Commands::Timeline { pipeline } => timeline::handle_timeline(&pipeline, config).await,
        Commands::Validate { pipeline } => validate::handle_validate(&pipeline),
    }
}

/// Read and validate a pipeline file
pub fn load_pipeline(path: &Path) -> Result<PipelineSpec> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read pipeline file: {}", path.display()))?;

    PipelineSpec::from_json(&source)
        .with_context(|| format!("Invalid pipeline file: {}", path.display()))
}

/// Build server resolver wrapped in retry and, optionally, cache decorators
pub fn build_resolver(config: &Config) -> Result<Box<dyn DurationResolver>> {
    let client = JenkinsClient::from_config(&config.client_config())
        .context("Failed to create build server client")?;
    let retrying = RetryingResolver::new(JenkinsDurationResolver::new(client), config.retry_policy());

    Ok(if config.cache {
        Box::new(CachingResolver::new(retrying))
    } else {
        Box::new(retrying)
    })
}

/// Timelines that were built, and the dates that failed
pub struct TimelineRun {
    pub timelines: Vec<Timeline>,
    pub failures: Vec<(ReferenceDate, TimelineError)>,
}

impl TimelineRun {
    /// Print failures and turn them into a non-zero exit
    pub fn finish(self) -> Result<Vec<Timeline>> {
        if self.failures.is_empty() {
            return Ok(self.timelines);
        }

        for (date, err) in &self.failures {
            eprintln!("{} {}: {}", "✗".red().bold(), date, err);
        }
        anyhow::bail!(
            "{} of {} reference date(s) failed",
            self.failures.len(),
            self.failures.len() + self.timelines.len()
        )
    }
}

/// Build one timeline per reference date with the given resolver
pub async fn run_timelines<R: DurationResolver>(
    resolver: R,
    spec: &PipelineSpec,
    dates: &[ReferenceDate],
) -> TimelineRun {
    let builder = TimelineBuilder::new(resolver);
    let mut timelines = Vec::with_capacity(dates.len());
    let mut failures = Vec::new();

    for (date, result) in builder.build_all(spec, dates).await {
        match result {
            Ok(timeline) => timelines.push(timeline),
            Err(e) => failures.push((date, e)),
        }
    }

    info!(
        "Built {} timeline(s), {} failure(s)",
        timelines.len(),
        failures.len()
    );

    TimelineRun {
        timelines,
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gantry_core::LookupError;
    use gantry_core::chart::{ChartRenderer, GanttChart};
    use gantry_core::domain::{Chain, Stage, WorkItemId};
    use gantry_core::resolver::{Execution, Resolution};

    /// Ten-minute builds, except on `outage` where the server cannot be reached
    struct OutageResolver {
        outage: ReferenceDate,
    }

    #[async_trait]
    impl DurationResolver for OutageResolver {
        async fn resolve(
            &self,
            work_item: &WorkItemId,
            date: ReferenceDate,
        ) -> std::result::Result<Resolution, LookupError> {
            if date == self.outage {
                return Err(LookupError::Transport("connection refused".to_string()));
            }
            Ok(Resolution::found(
                work_item.as_str(),
                Execution {
                    number: 1,
                    duration_minutes: 10,
                    completed_at: date.date().and_hms_opt(0, 0, 0).unwrap().and_utc(),
                    url: None,
                },
            ))
        }
    }

    fn spec() -> PipelineSpec {
        PipelineSpec::new([
            Stage::new([Chain::new(["build"])]),
            Stage::new([Chain::new(["deploy"])]),
        ])
    }

    #[tokio::test]
    async fn test_failed_date_keeps_successful_timelines() {
        let good = ReferenceDate::from_ymd(2017, 1, 4).unwrap();
        let outage = ReferenceDate::from_ymd(2017, 12, 4).unwrap();

        let run = run_timelines(OutageResolver { outage }, &spec(), &[good, outage]).await;

        assert_eq!(run.timelines.len(), 1);
        assert_eq!(run.timelines[0].reference_date, good);
        assert_eq!(run.failures.len(), 1);
        assert_eq!(run.failures[0].0, outage);

        let chart = GanttChart::from_timelines(&run.timelines);
        assert_eq!(chart.dates, vec![good]);
        let html = Format::Html.renderer().render(&chart).unwrap();
        assert!(html.contains("build 04-01-17"));

        let err = run.finish().unwrap_err();
        assert!(err.to_string().contains("1 of 2 reference date(s) failed"));
    }

    #[tokio::test]
    async fn test_all_dates_succeed() {
        let outage = ReferenceDate::from_ymd(2000, 1, 1).unwrap();
        let dates = [
            ReferenceDate::from_ymd(2017, 1, 4).unwrap(),
            ReferenceDate::from_ymd(2017, 12, 4).unwrap(),
        ];

        let run = run_timelines(OutageResolver { outage }, &spec(), &dates).await;
        let timelines = run.finish().unwrap();

        assert_eq!(timelines.len(), 2);
        assert_eq!(timelines[1].total_minutes(gantry_core::domain::ANCHOR), 20);
    }
}
