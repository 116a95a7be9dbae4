//! Memoizing decorator for resolvers

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

use super::{DurationResolver, Resolution};
use crate::domain::{ReferenceDate, WorkItemId};
use crate::error::LookupError;

/// Caches resolutions per `(work item, reference date)`
///
/// Only successful lookups are stored; a failed lookup is retried on the
/// next call. The lock is never held across the inner call.
pub struct CachingResolver<R> {
    inner: R,
    entries: Mutex<HashMap<(WorkItemId, ReferenceDate), Resolution>>,
}

impl<R: DurationResolver> CachingResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of cached resolutions
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl<R: DurationResolver> DurationResolver for CachingResolver<R> {
    async fn resolve(
        &self,
        work_item: &WorkItemId,
        date: ReferenceDate,
    ) -> Result<Resolution, LookupError> {
        let key = (work_item.clone(), date);

        if let Some(hit) = self.entries.lock().await.get(&key) {
            debug!("Cache hit for {} as of {}", work_item, date);
            return Ok(hit.clone());
        }

        let resolution = self.inner.resolve(work_item, date).await?;
        self.entries.lock().await.insert(key, resolution.clone());
        Ok(resolution)
    }
}
