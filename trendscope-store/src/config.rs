//! Configuration file.
//!
//! Optional JSON at `<config_dir>/trendscope/config.json`. Every field has a
//! default, so a partial file (or none) is valid.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use trendscope_fetch::{FetchSettings, host_in_domain};
use trendscope_scrape::ScraperSettings;
use url::Url;

use crate::error::StoreError;
use crate::persistence::default_config_path;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// HTTP settings.
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Scraper settings.
    #[serde(default)]
    pub scraper: ScraperConfig,
    /// Session cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Export settings.
    #[serde(default)]
    pub export: ExportConfig,
}

/// HTTP settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Attempts per page.
    pub max_attempts: u32,
    /// Backoff base in seconds.
    pub base_delay_secs: u64,
    /// Backoff cap in seconds.
    pub max_delay_secs: u64,
    /// Minimum pause between requests in milliseconds.
    pub min_pause_ms: u64,
    /// Maximum pause between requests in milliseconds.
    pub max_pause_ms: u64,
    /// User agent override.
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let defaults = FetchSettings::default();
        Self {
            timeout_secs: defaults.timeout.as_secs(),
            max_attempts: defaults.max_attempts,
            base_delay_secs: defaults.base_delay.as_secs(),
            max_delay_secs: defaults.max_delay.as_secs(),
            min_pause_ms: millis(defaults.min_pause),
            max_pause_ms: millis(defaults.max_pause),
            user_agent: None,
        }
    }
}

/// Scraper settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Site root.
    pub base_url: String,
    /// Commits sampled per repository.
    pub max_commits: usize,
    /// Contributors sampled per repository.
    pub max_contributors: usize,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        let defaults = ScraperSettings::default();
        Self {
            base_url: defaults.base_url,
            max_commits: defaults.max_commits,
            max_contributors: defaults.max_contributors,
        }
    }
}

/// Session cache settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entries older than this are refetched; `None` keeps them all session.
    pub max_age_secs: Option<u64>,
}

/// Export settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory for export files (current directory if unset).
    pub directory: Option<PathBuf>,
}

impl Config {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        default_config_path()
    }

    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, StoreError> {
        Self::load_from(&Self::default_path())
    }

    /// Loads configuration from a specific path; a missing file yields
    /// defaults.
    pub fn load_from(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.fetch.max_attempts == 0 {
            return Err(StoreError::Config("fetch.max_attempts must be at least 1".into()));
        }
        if self.fetch.min_pause_ms > self.fetch.max_pause_ms {
            return Err(StoreError::Config(
                "fetch.min_pause_ms must not exceed fetch.max_pause_ms".into(),
            ));
        }
        let base_url = Url::parse(&self.scraper.base_url).ok();
        let usable = base_url.as_ref().is_some_and(|url| {
            matches!(url.scheme(), "http" | "https") && url.host_str().is_some()
        });
        if !usable {
            return Err(StoreError::Config(format!(
                "scraper.base_url must be an http(s) URL with a host, got {:?}",
                self.scraper.base_url
            )));
        }
        Ok(())
    }

    /// Builds fetch settings.
    pub fn fetch_settings(&self) -> FetchSettings {
        let f = &self.fetch;
        let mut settings = FetchSettings::default()
            .with_timeout(Duration::from_secs(f.timeout_secs))
            .with_max_attempts(f.max_attempts)
            .with_base_delay(Duration::from_secs(f.base_delay_secs))
            .with_pause(
                Duration::from_millis(f.min_pause_ms),
                Duration::from_millis(f.max_pause_ms),
            );
        settings.max_delay = Duration::from_secs(f.max_delay_secs);
        if let Some(user_agent) = &f.user_agent {
            settings = settings.with_user_agent(user_agent.clone());
        }
        if let Some(host) = host_of(&self.scraper.base_url) {
            if !settings.allowed_domains.iter().any(|d| host_in_domain(&host, d)) {
                settings.allowed_domains.push(host);
            }
        }
        settings
    }

    /// Builds scraper settings.
    pub fn scraper_settings(&self) -> ScraperSettings {
        ScraperSettings::default()
            .with_base_url(self.scraper.base_url.clone())
            .with_max_commits(self.scraper.max_commits)
            .with_max_contributors(self.scraper.max_contributors)
    }

    /// Returns the cache max age.
    pub fn cache_max_age(&self) -> Option<chrono::Duration> {
        self.cache
            .max_age_secs
            .and_then(|secs| i64::try_from(secs).ok())
            .map(chrono::Duration::seconds)
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn host_of(url: &str) -> Option<String> {
    Url::parse(url).ok()?.host_str().map(str::to_string)
}
