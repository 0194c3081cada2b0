//! Bounded retry for idempotent reads.
//!
//! Only the list fetch goes through this policy; mutating calls are never
//! re-attempted automatically. Backoff is linear: the wait before attempt
//! k is (k - 1) x the base interval.

use crate::api::ApiError;
use std::future::Future;
use tokio::time::sleep;
use tracing::warn;

/// Retry policy for read operations
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, first try included
    pub max_attempts: u32,
    /// Base backoff interval
    pub base_delay: std::time::Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: std::time::Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: std::time::Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Run `op` until it succeeds, exhausts the attempt budget, or fails
    /// with a non-retryable error. The last observed error is surfaced.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                sleep(self.base_delay * (attempt - 1)).await;
            }

            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.max_attempts => {
                    warn!(
                        attempt,
                        max = self.max_attempts,
                        error = %err,
                        "read failed, will retry"
                    );
                    last_error = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        Err(last_error
            .unwrap_or_else(|| ApiError::Network("retry budget exhausted".to_string())))
    }
}
