//! Logging of retry decisions

use std::fmt::Display;
use std::time::Duration;

use tracing::{debug, info, warn};

/// Reports what a [`RetryExecutor`](super::RetryExecutor) decided, tagged
/// with the operation being retried
#[derive(Debug, Clone)]
pub struct TracingObserver {
    operation: String,
}

impl TracingObserver {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }

    pub(crate) fn will_retry(
        &self,
        attempt: u32,
        max_attempts: u32,
        error: &dyn Display,
        delay: Duration,
    ) {
        warn!(
            operation = %self.operation,
            attempt,
            max_attempts,
            delay_ms = delay.as_millis() as u64,
            "{}, retrying",
            error
        );
    }

    pub(crate) fn succeeded(&self, attempt: u32) {
        if attempt > 1 {
            info!(operation = %self.operation, attempt, "succeeded after retry");
        } else {
            debug!(operation = %self.operation, "succeeded");
        }
    }

    /// The caller turns the final error into the fatal one; this only notes why
    pub(crate) fn gave_up(&self, attempt: u32, error: &dyn Display, retryable: bool) {
        let reason = if retryable {
            "attempt budget spent"
        } else {
            "error is not retryable"
        };
        debug!(operation = %self.operation, attempt, error = %error, "giving up: {}", reason);
    }
}
