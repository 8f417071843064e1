//! Retry with exponential backoff and jitter.
//!
//! [`retry_with_backoff`] wraps a single attempt function and re-runs it on
//! retryable failures. It is generic over the attempt so the loop can be
//! exercised in tests without a network; the HTTP runner supplies an attempt
//! that performs one throttled request.
//!
//! Retries on:
//! - Transport failures (timeout, connection refused, DNS)
//! - The explicit retryable statuses {429, 500, 502, 503, 504}, raised as
//!   [`FetchError::RetryableStatus`] by the attempt
//!
//! Does not retry on:
//! - Any other completed HTTP exchange - a 2xx, 400, 401, 403, or 404
//!   response is authoritative and returned to the caller as-is
//!
//! On exhaustion the last error is returned, never swallowed; the
//! orchestrator turns it into a classified error record.

use crate::downloader::config::{
    BACKOFF_JITTER_MS, INITIAL_BACKOFF_MS, MAX_ATTEMPTS, MAX_BACKOFF_MS,
};
use crate::fetcher::FetchError;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry budget and backoff shape for one HTTP call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, initial call included
    pub max_attempts: usize,
    /// Backoff before the first retry
    pub initial_delay: Duration,
    /// Cap applied after doubling and jitter
    pub max_delay: Duration,
    /// Upper bound of the uniform random jitter added per wait
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            initial_delay: Duration::from_millis(INITIAL_BACKOFF_MS),
            max_delay: Duration::from_millis(MAX_BACKOFF_MS),
            jitter: Duration::from_millis(BACKOFF_JITTER_MS),
        }
    }
}

impl RetryPolicy {
    /// Policy with near-zero waits, for tests that count attempts.
    pub fn immediate(max_attempts: usize) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            jitter: Duration::ZERO,
        }
    }

    /// Jittered exponential delay before retry number `retry_count` (0-based).
    pub fn backoff_delay(&self, retry_count: u32) -> Duration {
        let base_ms = self
            .initial_delay
            .as_millis()
            .saturating_mul(2u128.saturating_pow(retry_count)) as u64;
        let jitter_ms = if self.jitter.is_zero() {
            0
        } else {
            rand::thread_rng().gen_range(0..=self.jitter.as_millis() as u64)
        };
        Duration::from_millis(base_ms.saturating_add(jitter_ms)).min(self.max_delay)
    }
}

/// Run `attempt` under `policy`, sleeping between retryable failures.
///
/// The attempt is executed at most `policy.max_attempts` times, strictly
/// sequentially - a new attempt starts only after the previous one finished
/// and its backoff elapsed. A non-retryable error is returned immediately.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    mut attempt: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut last_error: Option<FetchError> = None;

    for attempt_number in 1..=policy.max_attempts {
        match attempt().await {
            Ok(value) => {
                if attempt_number > 1 {
                    debug!(attempt = attempt_number, "request succeeded after retries");
                }
                return Ok(value);
            }
            Err(e) if e.is_retryable() => {
                warn!(
                    attempt = attempt_number,
                    max_attempts = policy.max_attempts,
                    error = %e,
                    "retryable failure"
                );
                last_error = Some(e);

                if attempt_number < policy.max_attempts {
                    let backoff = policy.backoff_delay(attempt_number as u32 - 1);
                    debug!(backoff_ms = backoff.as_millis() as u64, "waiting before retry");
                    tokio::time::sleep(backoff).await;
                }
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_error
        .unwrap_or_else(|| FetchError::Transport("retry budget exhausted".to_string())))
}
