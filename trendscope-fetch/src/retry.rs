//! Retry policy with exponential backoff.

use std::time::Duration;

use crate::error::FetchError;
use crate::settings::FetchSettings;

/// Strategy for retrying failed requests.
#[derive(Debug, Clone)]
pub struct RetryStrategy {
    /// Total attempts, first try included.
    pub max_attempts: u32,
    /// Base delay between retries.
    pub base_delay: Duration,
    /// Whether to use exponential backoff.
    pub exponential_backoff: bool,
    /// Maximum delay between retries.
    pub max_delay: Duration,
}

impl RetryStrategy {
    /// Creates a strategy with `max_attempts` and a 2 second base.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: Duration::from_secs(2),
            exponential_backoff: true,
            max_delay: Duration::from_secs(60),
        }
    }

    /// Builds the strategy from fetch settings.
    pub fn from_settings(settings: &FetchSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            base_delay: settings.base_delay,
            exponential_backoff: true,
            max_delay: settings.max_delay,
        }
    }

    /// Disables retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            exponential_backoff: false,
            max_delay: Duration::ZERO,
        }
    }

    /// Sets the base delay.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Calculates the wait after failed attempt number `attempt` (1-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = if self.exponential_backoff {
            let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
            self.base_delay.saturating_mul(factor)
        } else {
            self.base_delay
        };

        delay.min(self.max_delay)
    }

    /// Like [`delay_for_attempt`](Self::delay_for_attempt), but honours a
    /// server `Retry-After` as a lower bound (still capped).
    pub fn delay_for_error(&self, attempt: u32, error: &FetchError) -> Duration {
        let backoff = self.delay_for_attempt(attempt);
        match error {
            FetchError::RateLimited {
                retry_after: Some(secs),
                ..
            } => backoff.max(Duration::from_secs(*secs)).min(self.max_delay),
            _ => backoff,
        }
    }

    /// Returns true if `error` after attempt number `attempt` should be retried.
    pub fn should_retry(&self, attempt: u32, error: &FetchError) -> bool {
        attempt < self.max_attempts && error.is_retryable()
    }
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self::new(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_backoff() {
        let strategy = RetryStrategy::default();

        assert_eq!(strategy.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(strategy.delay_for_attempt(2), Duration::from_secs(4));
        assert_eq!(strategy.delay_for_attempt(3), Duration::from_secs(8));
    }

    #[test]
    fn test_max_delay_cap() {
        let strategy = RetryStrategy::new(10).with_base_delay(Duration::from_secs(10));

        assert_eq!(strategy.delay_for_attempt(5), Duration::from_secs(60));
        assert_eq!(strategy.delay_for_attempt(40), Duration::from_secs(60));
    }

    #[test]
    fn test_retry_after_is_a_floor() {
        let strategy = RetryStrategy::default();
        let limited = FetchError::RateLimited {
            url: "https://github.com/trending".into(),
            retry_after: Some(15),
        };
        assert_eq!(strategy.delay_for_error(1, &limited), Duration::from_secs(15));

        let huge = FetchError::RateLimited {
            url: "https://github.com/trending".into(),
            retry_after: Some(3600),
        };
        assert_eq!(strategy.delay_for_error(1, &huge), Duration::from_secs(60));
    }

    #[test]
    fn test_should_retry() {
        let strategy = RetryStrategy::default();
        let timeout = FetchError::Timeout { url: "u".into() };
        let missing = FetchError::Status { status: 404, url: "u".into() };

        assert!(strategy.should_retry(1, &timeout));
        assert!(strategy.should_retry(2, &timeout));
        assert!(!strategy.should_retry(3, &timeout));
        assert!(!strategy.should_retry(1, &missing));
        assert!(!RetryStrategy::no_retry().should_retry(1, &timeout));
    }
}
