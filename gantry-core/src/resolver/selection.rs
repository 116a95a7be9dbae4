//! Picking the execution that applies to a reference date

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::Execution;
use crate::domain::ReferenceDate;

/// Outcome of one execution as reported by the build server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Success,
    Unstable,
    Failure,
    Aborted,
    NotBuilt,
    /// Still running, or the server has not recorded a result yet
    InProgress,
    Other(String),
}

impl Outcome {
    /// Map the server's result string (`null` while a build runs)
    pub fn from_result(result: Option<&str>) -> Self {
        match result {
            None => Self::InProgress,
            Some("SUCCESS") => Self::Success,
            Some("UNSTABLE") => Self::Unstable,
            Some("FAILURE") => Self::Failure,
            Some("ABORTED") => Self::Aborted,
            Some("NOT_BUILT") => Self::NotBuilt,
            Some(other) => Self::Other(other.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Timing and outcome of one past execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub number: u64,
    pub outcome: Outcome,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub url: Option<String>,
}

impl ExecutionRecord {
    /// Start plus duration; `None` when the sum is not a representable instant
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        let millis = i64::try_from(self.duration_ms).ok()?;
        self.started_at
            .checked_add_signed(TimeDelta::try_milliseconds(millis)?)
    }

    pub fn duration_minutes(&self) -> i64 {
        i64::try_from(self.duration_ms / 60_000).unwrap_or(i64::MAX)
    }

    pub fn to_execution(&self) -> Option<Execution> {
        Some(Execution {
            number: self.number,
            duration_minutes: self.duration_minutes(),
            completed_at: self.completed_at()?,
            url: self.url.clone(),
        })
    }
}

/// Most recent successful record completed on or before `date` (UTC calendar day)
///
/// Records may arrive in any order; the newest completion wins, ties broken by
/// the higher build number. Records without a computable completion are skipped.
pub fn select_latest_success(
    records: &[ExecutionRecord],
    date: ReferenceDate,
) -> Option<&ExecutionRecord> {
    records
        .iter()
        .filter(|r| r.outcome.is_success())
        .filter_map(|r| r.completed_at().map(|at| (at, r)))
        .filter(|(at, _)| at.date_naive() <= date.date())
        .max_by_key(|(at, r)| (*at, r.number))
        .map(|(_, r)| r)
}
