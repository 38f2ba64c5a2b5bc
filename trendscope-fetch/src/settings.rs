//! Fetch settings.

use std::time::Duration;

/// Browser-like user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Settings shared by the HTTP client, retry policy, and throttle.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Total attempts per URL (first try included).
    pub max_attempts: u32,
    /// Backoff base; attempt `n` waits `base * 2^(n-1)`.
    pub base_delay: Duration,
    /// Backoff cap.
    pub max_delay: Duration,
    /// Lower bound of the pause between consecutive requests.
    pub min_pause: Duration,
    /// Upper bound of the pause between consecutive requests.
    pub max_pause: Duration,
    /// User agent header.
    pub user_agent: String,
    /// Hosts requests may target (subdomains included). Empty allows all.
    pub allowed_domains: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(60),
            min_pause: Duration::from_millis(100),
            max_pause: Duration::from_millis(300),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            allowed_domains: vec!["github.com".to_string()],
        }
    }
}

impl FetchSettings {
    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the number of attempts (at least one).
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Sets the backoff base delay.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Sets the politeness pause range.
    pub fn with_pause(mut self, min: Duration, max: Duration) -> Self {
        self.min_pause = min;
        self.max_pause = max.max(min);
        self
    }

    /// Sets the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the domain allowlist.
    pub fn with_allowed_domains(mut self, domains: Vec<String>) -> Self {
        self.allowed_domains = domains;
        self
    }

    /// Zeroes every wait. Used with local fixtures and in tests.
    pub fn without_delays(mut self) -> Self {
        self.base_delay = Duration::ZERO;
        self.max_delay = Duration::ZERO;
        self.min_pause = Duration::ZERO;
        self.max_pause = Duration::ZERO;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = FetchSettings::default();
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert_eq!(settings.max_attempts, 3);
        assert_eq!(settings.base_delay, Duration::from_secs(2));
        assert!(settings.user_agent.contains("Chrome/120"));
        assert_eq!(settings.allowed_domains, vec!["github.com"]);
    }

    #[test]
    fn test_builders_keep_bounds_sane() {
        let settings = FetchSettings::default()
            .with_max_attempts(0)
            .with_pause(Duration::from_millis(500), Duration::from_millis(100));
        assert_eq!(settings.max_attempts, 1);
        assert_eq!(settings.max_pause, Duration::from_millis(500));
    }
}
