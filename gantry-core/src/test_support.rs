//! In-memory resolvers for unit tests

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::{ReferenceDate, WorkItemId};
use crate::error::LookupError;
use crate::resolver::{DurationResolver, Execution, Resolution};

/// Resolver backed by a fixed table of display names and durations
#[derive(Default)]
pub struct TableResolver {
    entries: HashMap<String, (String, Option<i64>)>,
    overrides: HashMap<(String, ReferenceDate), Option<i64>>,
    failing: HashSet<(String, ReferenceDate)>,
    calls: AtomicUsize,
    log: Mutex<Vec<String>>,
}

impl TableResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// `minutes = None` means no successful execution exists
    pub fn with(mut self, id: &str, display_name: &str, minutes: Option<i64>) -> Self {
        self.entries
            .insert(id.to_string(), (display_name.to_string(), minutes));
        self
    }

    /// Different duration for one reference date
    pub fn with_on(mut self, id: &str, date: ReferenceDate, minutes: Option<i64>) -> Self {
        self.overrides.insert((id.to_string(), date), minutes);
        self
    }

    /// Lookups of `id` on `date` fail with a transport error
    pub fn failing_on(mut self, id: &str, date: ReferenceDate) -> Self {
        self.failing.insert((id.to_string(), date));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Work item ids in the order they were looked up
    pub fn lookups(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl DurationResolver for TableResolver {
    async fn resolve(
        &self,
        work_item: &WorkItemId,
        date: ReferenceDate,
    ) -> Result<Resolution, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(work_item.to_string());

        let key = (work_item.to_string(), date);
        if self.failing.contains(&key) {
            return Err(LookupError::Transport("connection refused".to_string()));
        }

        let (display_name, minutes) = self
            .entries
            .get(work_item.as_str())
            .cloned()
            .ok_or_else(|| LookupError::status(404, format!("unknown job {work_item}")))?;
        let minutes = self.overrides.get(&key).copied().unwrap_or(minutes);

        Ok(match minutes {
            Some(duration_minutes) => Resolution::found(
                display_name,
                Execution {
                    number: 1,
                    duration_minutes,
                    completed_at: date.date().and_hms_opt(0, 0, 0).unwrap().and_utc(),
                    url: None,
                },
            ),
            None => Resolution::not_found(display_name),
        })
    }
}

/// Fails the first `failures` calls, then reports "not found" with the id as display name
pub struct FlakyResolver {
    failures: usize,
    error: LookupError,
    calls: AtomicUsize,
}

impl FlakyResolver {
    pub fn new(failures: usize, error: LookupError) -> Self {
        Self {
            failures,
            error,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DurationResolver for FlakyResolver {
    async fn resolve(
        &self,
        work_item: &WorkItemId,
        _date: ReferenceDate,
    ) -> Result<Resolution, LookupError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(self.error.clone());
        }
        Ok(Resolution::not_found(work_item.as_str()))
    }
}
