//! Bounded retries with deterministic exponential backoff.
//!
//! Attempts are numbered from zero. After a retryable failure on attempt
//! `i` (when another attempt remains) the caller sleeps for
//! `base_delay * 2^i`. There is no jitter and no delay cap, so the default
//! policy waits 5s, then 10s.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info_span, warn, Instrument};

use crate::error::{ClientError, ClientResult};

/// Retry budget for an external call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay after the first failed attempt; doubles per attempt.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay to wait after attempt `attempt` (0-indexed) failed.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Sum of all delays when every attempt but the last fails.
    pub fn total_backoff(&self) -> Duration {
        (0..self.max_attempts.saturating_sub(1))
            .map(|attempt| self.delay_for_attempt(attempt))
            .fold(Duration::ZERO, |acc, d| acc.saturating_add(d))
    }
}

/// Source of backoff sleeps.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Runs an operation under a [`RetryPolicy`].
#[derive(Clone)]
pub struct RetryingCaller {
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl RetryingCaller {
    pub fn new(policy: RetryPolicy) -> Self {
        Self::with_sleeper(policy, Arc::new(TokioSleeper))
    }

    pub fn with_sleeper(policy: RetryPolicy, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { policy, sleeper }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute `op` until it succeeds, fails terminally, or the attempt
    /// budget is spent.
    ///
    /// Non-retryable errors are returned unchanged without sleeping. When
    /// the budget runs out the last error is wrapped in
    /// [`ClientError::RetriesExhausted`].
    pub async fn call<T, F, Fut>(&self, operation: &str, op: F) -> ClientResult<T>
    where
        F: Fn(u32) -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0u32;

        loop {
            let span = info_span!("retry", operation = %operation, attempt = attempt + 1);

            match op(attempt).instrument(span).await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) if attempt + 1 < max_attempts => {
                    let delay = self.policy.delay_for_attempt(attempt);
                    warn!(
                        operation = %operation,
                        attempt = attempt + 1,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "Attempt failed, retrying: {}",
                        e
                    );
                    self.sleeper.sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!(
                        operation = %operation,
                        attempts = max_attempts,
                        "All attempts failed: {}",
                        e
                    );
                    return Err(ClientError::RetriesExhausted {
                        operation: operation.to_string(),
                        attempts: max_attempts,
                        source: Box::new(e),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Records requested sleeps instead of waiting.
    #[derive(Debug, Default)]
    pub struct RecordingSleeper {
        sleeps: Mutex<Vec<Duration>>,
    }

    impl RecordingSleeper {
        pub fn sleeps(&self) -> Vec<Duration> {
            self.sleeps.lock().unwrap().clone()
        }

        pub fn total(&self) -> Duration {
            self.sleeps().into_iter().sum()
        }
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.sleeps.lock().unwrap().push(duration);
        }
    }
}
