//! Attempt budget, backoff and retry predicates

use std::time::Duration;

/// Statuses that usually clear up on their own
const RETRYABLE_STATUS: &[u16] = &[408, 425, 429, 500, 502, 503, 504];

/// How many times to try and how long to wait in between
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,

    /// Wait after the first failed attempt; doubled after each further failure
    pub initial_delay: Duration,

    /// Upper bound for any single wait
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Three attempts per file, waiting 1s then 2s
    pub fn download() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }

    /// `max_attempts` attempts back to back
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Wait after attempt `attempt` (1-indexed) failed
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_delay.saturating_mul(factor).min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::download()
    }
}

/// Decides whether a failed attempt should be retried
pub trait RetryPredicate<E: ?Sized>: Send + Sync {
    fn should_retry(&self, error: &E) -> bool;
}

/// Errors that may carry an HTTP status code
pub trait HttpStatusError {
    /// The HTTP status code, if the failure came from a response
    fn status_code(&self) -> Option<u16>;
}

/// Retries transient statuses and every failure that never got a response
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpStatusPredicate;

impl HttpStatusPredicate {
    pub fn is_retryable_code(&self, code: u16) -> bool {
        RETRYABLE_STATUS.contains(&code)
    }
}

impl<E: HttpStatusError> RetryPredicate<E> for HttpStatusPredicate {
    fn should_retry(&self, error: &E) -> bool {
        error
            .status_code()
            .map_or(true, |code| self.is_retryable_code(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StatusOnly(Option<u16>);

    impl HttpStatusError for StatusOnly {
        fn status_code(&self) -> Option<u16> {
            self.0
        }
    }

    #[test]
    fn test_download_backoff() {
        let policy = RetryPolicy::download();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay_after(1), Duration::from_secs(1));
        assert_eq!(policy.delay_after(2), Duration::from_secs(2));
        assert_eq!(policy.delay_after(3), Duration::from_secs(4));
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy {
            max_delay: Duration::from_millis(1500),
            ..RetryPolicy::download()
        };
        assert_eq!(policy.delay_after(5), Duration::from_millis(1500));
        assert_eq!(policy.delay_after(u32::MAX), Duration::from_millis(1500));
    }

    #[test]
    fn test_immediate_policy() {
        let policy = RetryPolicy::immediate(3);
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay_after(2), Duration::ZERO);
    }

    #[test]
    fn test_http_status_predicate() {
        let predicate = HttpStatusPredicate;
        assert!(predicate.should_retry(&StatusOnly(Some(503))));
        assert!(predicate.should_retry(&StatusOnly(Some(429))));
        assert!(!predicate.should_retry(&StatusOnly(Some(404))));
        assert!(!predicate.should_retry(&StatusOnly(Some(403))));
        assert!(predicate.should_retry(&StatusOnly(None)));
    }
}
