//! Retry wrapper with linear backoff.
//!
//! Fetch operations in this crate report a `(value, Status)` pair instead of
//! failing outright: a failed feed fetch still yields an (empty) article list.
//! [`retry`] re-runs such an operation until it reports [`Status::Ok`] or the
//! [`RetryPolicy`] runs out of attempts, sleeping between attempts.
//!
//! # Backoff Strategy
//!
//! ```text
//! delay(attempt_index) = attempt_index + 1 seconds
//! ```
//!
//! No jitter and no cap. The sleep only happens between attempts, so a run
//! where every attempt fails logs `max_attempts - 1` warnings followed by one
//! error.
//!
//! The value of the last attempt is always handed back. [`Retried`] also
//! carries the final [`Status`] so callers that care can tell a late success
//! from exhaustion; [`Retried::into_result`] turns that into a `Result`.

use crate::error::NewsError;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, instrument, warn};

/// Outcome reported by a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Err,
}

/// How many times to attempt an operation and how long to wait in between.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one. Values below 1 are treated as 1.
    pub max_attempts: usize,
    /// Delay to sleep after the failed attempt with the given zero-based index.
    pub backoff: fn(usize) -> Duration,
}

/// Sleep `attempt_index + 1` seconds.
pub fn linear_backoff(attempt_index: usize) -> Duration {
    Duration::from_secs(attempt_index as u64 + 1)
}

impl RetryPolicy {
    /// A policy with [`linear_backoff`] between attempts.
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts,
            backoff: linear_backoff,
        }
    }

    #[cfg(test)]
    pub fn with_backoff(mut self, backoff: fn(usize) -> Duration) -> Self {
        self.backoff = backoff;
        self
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

/// The value of the last attempt made, plus how the run ended.
#[derive(Debug, Clone, PartialEq)]
pub struct Retried<T> {
    pub value: T,
    pub attempts: usize,
    pub status: Status,
}

impl<T> Retried<T> {
    pub fn succeeded(&self) -> bool {
        self.status == Status::Ok
    }

    /// Drop the status and keep whatever the last attempt produced.
    pub fn into_value(self) -> T {
        self.value
    }

    /// `Ok(value)` if the final attempt succeeded, otherwise
    /// [`NewsError::RetriesExhausted`].
    pub fn into_result(self) -> Result<T, NewsError> {
        match self.status {
            Status::Ok => Ok(self.value),
            Status::Err => Err(NewsError::RetriesExhausted {
                attempts: self.attempts,
            }),
        }
    }
}

/// Run `op` until it reports [`Status::Ok`] or `policy.max_attempts` is reached.
///
/// Each failed attempt except the last logs a warning and sleeps for
/// `policy.backoff(attempt_index)`. Exhaustion logs one error.
///
/// # Arguments
///
/// * `policy` - Attempt budget and backoff curve
/// * `label` - Names the operation in log lines
/// * `op` - Produces one attempt's `(value, status)` each time it is called
///
/// # Returns
///
/// A [`Retried`] holding the value of the last attempt made, how many
/// attempts ran, and the status of the last one.
#[instrument(level = "debug", skip_all, fields(op = %label))]
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, label: &str, mut op: F) -> Retried<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = (T, Status)>,
{
    let max = policy.max_attempts.max(1);
    let mut attempt = 0usize;

    loop {
        let (value, status) = op().await;
        attempt += 1;

        if status == Status::Ok {
            return Retried {
                value,
                attempts: attempt,
                status,
            };
        }

        if attempt >= max {
            error!(attempt, max, "{label} exhausted retries");
            return Retried {
                value,
                attempts: attempt,
                status,
            };
        }

        let delay = (policy.backoff)(attempt - 1);
        warn!(attempt, max, ?delay, "{label} failed; retry {attempt} times");
        sleep(delay).await;
    }
}
