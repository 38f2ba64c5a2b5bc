//! Trending page records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::query::TrendingQuery;

// ============================================================================
// Trending Entry
// ============================================================================

/// One repository as listed on a trending page.
///
/// Entries are created fresh per scrape and never mutated after
/// normalization. Their order in a [`TrendingReport`] is the page's rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingEntry {
    /// `owner/repo`, unique within one scrape.
    pub full_name: String,
    /// Canonical URL (`https://github.com/<owner>/<repo>`).
    pub url: String,
    /// Repository description.
    pub description: Option<String>,
    /// Primary language, if GitHub shows one.
    pub language: Option<String>,
    /// Total stars.
    pub stars: u64,
    /// Total forks.
    pub forks: u64,
    /// Stars gained within the queried time range (0 if unavailable).
    pub stars_today: u64,
    /// Contributor display names from the "Built by" row.
    #[serde(default)]
    pub contributors: Vec<String>,
}

impl TrendingEntry {
    /// Returns the owner part of `full_name`.
    pub fn owner(&self) -> &str {
        self.full_name.split('/').next().unwrap_or_default()
    }

    /// Returns the repository part of `full_name`.
    pub fn repo_name(&self) -> &str {
        self.full_name.split('/').nth(1).unwrap_or_default()
    }

    /// Returns the contributors as one comma-separated string.
    pub fn contributors_joined(&self) -> String {
        self.contributors.join(", ")
    }
}

// ============================================================================
// Trending Report
// ============================================================================

/// Result of one trending scrape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingReport {
    /// The query that produced this report.
    pub query: TrendingQuery,
    /// Normalized entries in page order.
    pub entries: Vec<TrendingEntry>,
    /// Number of entries dropped during normalization.
    pub skipped: usize,
    /// When the page was fetched.
    pub fetched_at: DateTime<Utc>,
}

impl TrendingReport {
    /// Creates a report stamped with the current time.
    pub fn new(query: TrendingQuery, entries: Vec<TrendingEntry>, skipped: usize) -> Self {
        Self {
            query,
            entries,
            skipped,
            fetched_at: Utc::now(),
        }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the report holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
