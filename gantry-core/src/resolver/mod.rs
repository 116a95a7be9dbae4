//! Duration resolution
//!
//! A `DurationResolver` answers "how long did work item X take as of date D".
//! The production implementation talks to the build server; tests use
//! in-memory tables. Resolvers compose: `RetryingResolver` and
//! `CachingResolver` wrap any other resolver.

mod cache;
mod retry;
mod selection;

pub use cache::CachingResolver;
pub use retry::{RetryPolicy, RetryingResolver};
pub use selection::{ExecutionRecord, Outcome, select_latest_success};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::{ReferenceDate, WorkItemId};
use crate::error::LookupError;

/// The execution whose duration was selected for a reference date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Execution {
    /// Build number on the server
    pub number: u64,
    /// Whole minutes, floored
    pub duration_minutes: i64,
    pub completed_at: DateTime<Utc>,
    pub url: Option<String>,
}

/// Result of a lookup
///
/// `execution` is `None` when the work item has no successful execution at
/// or before the reference date. The display name is returned either way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub display_name: String,
    pub execution: Option<Execution>,
}

impl Resolution {
    pub fn found(display_name: impl Into<String>, execution: Execution) -> Self {
        Self {
            display_name: display_name.into(),
            execution: Some(execution),
        }
    }

    pub fn not_found(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            execution: None,
        }
    }

    pub fn is_found(&self) -> bool {
        self.execution.is_some()
    }

    pub fn duration_minutes(&self) -> Option<i64> {
        self.execution.as_ref().map(|e| e.duration_minutes)
    }
}

/// Source of historical work item durations
///
/// Implementations must be idempotent: a failed call leaves no state behind,
/// so callers may retry it freely.
#[async_trait]
pub trait DurationResolver: Send + Sync {
    /// Look up the most recent successful execution of `work_item` completed
    /// on or before `date`
    async fn resolve(
        &self,
        work_item: &WorkItemId,
        date: ReferenceDate,
    ) -> Result<Resolution, LookupError>;
}

#[async_trait]
impl<R: DurationResolver + ?Sized> DurationResolver for Arc<R> {
    async fn resolve(
        &self,
        work_item: &WorkItemId,
        date: ReferenceDate,
    ) -> Result<Resolution, LookupError> {
        (**self).resolve(work_item, date).await
    }
}

#[async_trait]
impl<R: DurationResolver + ?Sized> DurationResolver for Box<R> {
    async fn resolve(
        &self,
        work_item: &WorkItemId,
        date: ReferenceDate,
    ) -> Result<Resolution, LookupError> {
        (**self).resolve(work_item, date).await
    }
}
