//! Bounded-retry policy for startup steps.
//!
//! A step that fails on every attempt is tried exactly
//! [`RetryPolicy::max_attempts`] times, sleeping only *between*
//! attempts. Each failure is logged and retried silently; only
//! exhaustion (or cancellation) surfaces to the caller.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Tunable parameters for a bounded retry loop.
///
/// The default multiplier of `1.0` gives a fixed inter-attempt delay;
/// a larger multiplier produces exponential backoff clamped to
/// `max_delay`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub delay: Duration,
    /// Factor by which the delay grows after each failure.
    pub multiplier: f64,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_millis(5000),
            multiplier: 1.0,
            max_delay: Duration::from_secs(30),
        }
    }
}

/// Calculate the next inter-attempt delay from the current delay.
///
/// The result is clamped to [`RetryPolicy::max_delay`].
pub fn next_delay(current: Duration, policy: &RetryPolicy) -> Duration {
    let next_ms = (current.as_millis() as f64 * policy.multiplier) as u64;
    Duration::from_millis(next_ms).min(policy.max_delay)
}

/// Result of running an operation under a [`RetryPolicy`].
#[derive(Debug)]
pub enum RetryOutcome<T> {
    /// The operation succeeded on some attempt.
    Ok(T),
    /// Every attempt failed; `last_error` is the final failure.
    Exhausted { attempts: u32, last_error: String },
    /// The cancellation token fired before an attempt succeeded.
    Cancelled,
}

/// Run `op` until it succeeds, the policy is exhausted, or `cancel`
/// fires.
///
/// `op` receives the 1-based attempt number. Cancellation is observed
/// both while an attempt is in flight and while sleeping between
/// attempts; no further attempts are made after the token fires.
pub async fn run_with_retry<T, E, F, Fut>(
    step: &'static str,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut op: F,
) -> RetryOutcome<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut delay = policy.delay;
    let mut last_error = String::new();

    for attempt in 1..=policy.max_attempts {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(step, attempt, "Retry loop cancelled");
                return RetryOutcome::Cancelled;
            }
            result = op(attempt) => match result {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::info!(step, attempt, "Succeeded after retries");
                    }
                    return RetryOutcome::Ok(value);
                }
                Err(e) => {
                    tracing::warn!(
                        step,
                        attempt,
                        max_attempts = policy.max_attempts,
                        error = %e,
                        "Attempt failed",
                    );
                    last_error = e.to_string();
                }
            }
        }

        if attempt < policy.max_attempts {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(step, "Retry loop cancelled while waiting");
                    return RetryOutcome::Cancelled;
                }
                _ = tokio::time::sleep(delay) => {}
            }
            delay = next_delay(delay, policy);
        }
    }

    RetryOutcome::Exhausted {
        attempts: policy.max_attempts,
        last_error,
    }
}
