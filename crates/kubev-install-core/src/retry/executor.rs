//! Retry loop

use std::fmt::Display;
use std::future::Future;

use super::error::RetryError;
use super::observer::TracingObserver;
use super::policy::{RetryPolicy, RetryPredicate};

/// Runs an async operation until it succeeds, the predicate refuses, or the
/// attempt budget is spent
///
/// ```rust
/// use kubev_install_core::retry::{HttpStatusPredicate, RetryExecutor, RetryPolicy, TracingObserver};
///
/// let executor = RetryExecutor::new(
///     RetryPolicy::download(),
///     HttpStatusPredicate,
///     TracingObserver::new("download"),
/// );
/// # let _ = executor;
/// ```
pub struct RetryExecutor<P> {
    policy: RetryPolicy,
    predicate: P,
    observer: TracingObserver,
}

impl<P> RetryExecutor<P> {
    pub fn new(policy: RetryPolicy, predicate: P, observer: TracingObserver) -> Self {
        Self {
            policy,
            predicate,
            observer,
        }
    }

    /// Execute `op`; the closure receives the 1-indexed attempt number
    pub async fn execute<F, Fut, T, E>(&self, mut op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
        P: RetryPredicate<E>,
    {
        // A zero budget still makes one attempt.
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let err = match op(attempt).await {
                Ok(value) => {
                    self.observer.succeeded(attempt);
                    return Ok(value);
                }
                Err(err) => err,
            };

            if !self.predicate.should_retry(&err) {
                self.observer.gave_up(attempt, &err, false);
                return Err(RetryError::NonRetryable {
                    attempt,
                    source: err,
                });
            }

            if attempt >= max_attempts {
                self.observer.gave_up(attempt, &err, true);
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    source: err,
                });
            }

            let delay = self.policy.delay_after(attempt);
            self.observer.will_retry(attempt, max_attempts, &err, delay);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            attempt += 1;
        }
    }
}
