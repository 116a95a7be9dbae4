//! Retry decorator for resolvers

use async_trait::async_trait;
use std::time::Duration;
use tracing::{error, warn};

use super::{DurationResolver, Resolution};
use crate::domain::{ReferenceDate, WorkItemId};
use crate::error::LookupError;

/// Exponential backoff settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one; 1 disables retrying
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Delay before the attempt following `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

/// Retries transient lookup failures of the wrapped resolver
///
/// Non-transient errors (4xx, malformed payloads) are returned immediately.
pub struct RetryingResolver<R> {
    inner: R,
    policy: RetryPolicy,
}

impl<R: DurationResolver> RetryingResolver<R> {
    pub fn new(inner: R, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<R: DurationResolver> DurationResolver for RetryingResolver<R> {
    async fn resolve(
        &self,
        work_item: &WorkItemId,
        date: ReferenceDate,
    ) -> Result<Resolution, LookupError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.inner.resolve(work_item, date).await {
                Ok(resolution) => return Ok(resolution),
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) => {
                    if attempt >= max_attempts {
                        error!(
                            "Lookup for {} failed after {} attempt(s): {}",
                            work_item, attempt, e
                        );
                        return Err(e);
                    }

                    let delay = self.policy.delay_after(attempt);
                    warn!(
                        "Lookup for {} failed (attempt {}/{}): {}",
                        work_item, attempt, max_attempts, e
                    );
                    warn!("Retrying in {} ms...", delay.as_millis());

                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
