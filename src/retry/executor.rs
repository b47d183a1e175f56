use super::policy::RetryPolicy;
use super::types::{RetryError, RetryOutcome};
use backoff::{backoff::Backoff, ExponentialBackoff, ExponentialBackoffBuilder};
use std::time::Duration;
use tracing::{debug, warn};

/// Retry executor with exponential backoff
pub struct RetryExecutor<E> {
    policy: RetryPolicy<E>,
}

impl<E> RetryExecutor<E> {
    /// Create a new retry executor
    pub fn new(policy: RetryPolicy<E>) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy<E> {
        &self.policy
    }

    /// Execute an attempt-indexed operation with retries.
    ///
    /// The operation receives the 0-indexed attempt number and may run up to
    /// `max_retries + 1` times, so it must be safe to invoke repeatedly. On
    /// failure the policy's predicate can veto further retries; otherwise the
    /// observer is notified and the next attempt starts after the backoff
    /// delay.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> RetryOutcome<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut backoff = self.create_backoff();
        let mut attempt = 0;

        loop {
            debug!(
                attempt,
                max_retries = self.policy.config().max_retries,
                "Executing attempt"
            );

            match operation(attempt).await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(attempt, "Operation succeeded after retries");
                    }
                    return Ok(value);
                }
                Err(error) => {
                    let attempts = attempt + 1;

                    // The final attempt fails outright, without consulting the predicate
                    if attempt == self.policy.config().max_retries {
                        warn!(
                            attempts,
                            error = %error,
                            "Operation failed after exhausting retries"
                        );
                        return Err(RetryError::Exhausted {
                            attempts,
                            last_error: error,
                        });
                    }

                    if !self.policy.wants_retry(&error) {
                        debug!(attempts, error = %error, "Retry vetoed by predicate");
                        return Err(RetryError::Vetoed {
                            attempts,
                            last_error: error,
                        });
                    }

                    let wait = match backoff.next_backoff() {
                        Some(wait) => wait,
                        None => {
                            // Backoff exhausted
                            warn!(attempts, error = %error, "Backoff exhausted");
                            return Err(RetryError::Exhausted {
                                attempts,
                                last_error: error,
                            });
                        }
                    };

                    debug!(
                        attempt,
                        wait_ms = wait.as_millis(),
                        error = %error,
                        "Operation failed, retrying after backoff"
                    );
                    self.policy.notify_retry(&error, attempts, wait);
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
            }
        }
    }

    fn create_backoff(&self) -> ExponentialBackoff {
        let config = self.policy.config();
        ExponentialBackoffBuilder::new()
            .with_initial_interval(config.base_delay())
            .with_randomization_factor(0.0) // Delays follow the configured curve exactly
            .with_multiplier(config.backoff_factor)
            .with_max_interval(Duration::MAX) // The attempt budget bounds growth
            .with_max_elapsed_time(None) // We handle max retries manually
            .build()
    }
}
