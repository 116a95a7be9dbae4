//! Task interval and timeline types

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::date::ReferenceDate;
use super::pipeline::WorkItemId;

/// One work item occurrence laid out on the shared time axis
///
/// Labels are not unique: the same work item appears once per reference date.
/// `group_key` is stable across dates and is what renderers align rows on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInterval {
    pub label: String,
    pub group_key: String,
    pub work_item: WorkItemId,
    pub reference_date: ReferenceDate,
    pub start: NaiveDateTime,
    pub finish: NaiveDateTime,
    pub duration_minutes: i64,
    /// Set when no successful execution was found and the zero fallback was used
    pub degraded: bool,
}

/// All intervals computed for a single reference date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    pub reference_date: ReferenceDate,
    pub intervals: Vec<TaskInterval>,
    /// Work items that fell back to a zero duration, in walk order
    pub degraded: Vec<WorkItemId>,
    /// Finish of the last stage barrier
    pub finish: NaiveDateTime,
}

impl Timeline {
    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }

    /// Total modeled wall-clock time of the pipeline, in minutes
    pub fn total_minutes(&self, anchor: NaiveDateTime) -> i64 {
        (self.finish - anchor).num_minutes()
    }
}
