//! Constant-delay retry for the not-ready condition
//!
//! The policy is a plain value: it holds no state between guarded calls and
//! counts attempts only inside one [`RetryPolicy::run`].

use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use signflow_config::Config;
use signflow_utils::error::{ErrorKind, SignError};

/// Outcome of [`RetryPolicy::should_retry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait this long, then try again
    RetryAfter(Duration),
    /// Surface the last error
    Stop,
}

/// Retry only `NotReady`, at most `max_attempts` attempts in total, waiting a
/// constant `delay` between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// # Errors
    ///
    /// Returns `SignError::Misconfiguration` if `max_attempts` is zero.
    pub fn new(max_attempts: u32, delay: Duration) -> Result<Self, SignError> {
        if max_attempts == 0 {
            return Err(SignError::Misconfiguration(
                "retry max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            max_attempts,
            delay,
        })
    }

    /// # Errors
    ///
    /// See [`RetryPolicy::new`].
    pub fn from_config(config: &Config) -> Result<Self, SignError> {
        Self::new(config.max_attempts(), config.retry_delay())
    }

    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Decide what to do after `attempt` attempts (1-based) ended in `kind`.
    #[must_use]
    pub fn should_retry(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if kind == ErrorKind::NotReady && attempt < self.max_attempts {
            RetryDecision::RetryAfter(self.delay)
        } else {
            RetryDecision::Stop
        }
    }

    /// Drive `op` until it succeeds, fails with a non-retryable error, or
    /// exhausts the attempt budget.
    ///
    /// # Errors
    ///
    /// Non-`NotReady` errors are returned unchanged. A `NotReady` on the last
    /// attempt becomes `SignError::RetryExhausted`.
    pub async fn run<T, F, Fut>(&self, op_name: &str, op: F) -> Result<T, SignError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, SignError>>,
    {
        self.run_with_cancel(op_name, op, std::future::pending::<()>())
            .await
    }

    /// Like [`RetryPolicy::run`], but each backoff wait races against `stop`.
    ///
    /// # Errors
    ///
    /// Returns `SignError::Cancelled` if `stop` completes during a wait, and
    /// otherwise the same errors as [`RetryPolicy::run`].
    pub async fn run_with_cancel<T, F, Fut, S>(
        &self,
        op_name: &str,
        mut op: F,
        stop: S,
    ) -> Result<T, SignError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, SignError>>,
        S: Future<Output = ()>,
    {
        let mut stop = std::pin::pin!(stop);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            let err = match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(op = op_name, attempt, "Succeeded after retrying");
                    }
                    return Ok(value);
                }
                Err(err) => err,
            };

            match self.should_retry(attempt, err.kind()) {
                RetryDecision::RetryAfter(delay) => {
                    warn!(
                        op = op_name,
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Not ready, will retry"
                    );
                    tokio::select! {
                        () = tokio::time::sleep(delay) => {}
                        () = &mut stop => {
                            debug!(op = op_name, attempt, "Retry wait cancelled");
                            return Err(SignError::Cancelled);
                        }
                    }
                }
                RetryDecision::Stop if err.kind() == ErrorKind::NotReady => {
                    warn!(op = op_name, attempts = attempt, "Retry budget exhausted");
                    return Err(SignError::RetryExhausted { attempts: attempt });
                }
                RetryDecision::Stop => return Err(err),
            }
        }
    }
}
