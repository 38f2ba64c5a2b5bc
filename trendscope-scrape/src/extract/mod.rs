//! HTML extraction into raw, untyped records.
//!
//! Extraction never fails: a field no strategy can read stays `None`, and
//! validation is left to [`crate::normalize`].

mod repository;
mod trending;

use serde::{Deserialize, Serialize};
use trendscope_core::TrendingEntry;

pub use repository::{
    MAX_COMMITS, MAX_CONTRIBUTORS, extract_commits, extract_commits_limited,
    extract_contributors, extract_contributors_limited, extract_issue_count,
    extract_repository,
};
pub use trending::{MAX_BUILT_BY, extract_trending};

// ============================================================================
// Raw Records
// ============================================================================

/// One trending-page entry as found in the HTML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTrendingEntry {
    /// Link text of the repository name, e.g. `"owner /\n repo"`.
    pub full_name: Option<String>,
    /// Repository link, relative or absolute.
    pub href: Option<String>,
    /// Description paragraph.
    pub description: Option<String>,
    /// Primary language.
    pub language: Option<String>,
    /// Star count text.
    pub stars: Option<String>,
    /// Fork count text.
    pub forks: Option<String>,
    /// Period star text, e.g. `"1,234 stars today"`.
    pub stars_today: Option<String>,
    /// Comma-joined contributor names.
    pub contributors: Option<String>,
}

impl From<&TrendingEntry> for RawTrendingEntry {
    fn from(entry: &TrendingEntry) -> Self {
        Self {
            full_name: Some(entry.full_name.clone()),
            href: Some(entry.url.clone()),
            description: entry.description.clone(),
            language: entry.language.clone(),
            stars: Some(entry.stars.to_string()),
            forks: Some(entry.forks.to_string()),
            stars_today: Some(entry.stars_today.to_string()),
            contributors: Some(entry.contributors_joined()),
        }
    }
}

impl From<TrendingEntry> for RawTrendingEntry {
    fn from(entry: TrendingEntry) -> Self {
        Self::from(&entry)
    }
}

/// Repository landing page fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRepositoryPage {
    /// "About" text.
    pub description: Option<String>,
    /// Primary language.
    pub language: Option<String>,
    /// Star count text.
    pub stars: Option<String>,
    /// Fork count text.
    pub forks: Option<String>,
    /// Watcher count text.
    pub watchers: Option<String>,
    /// Open issue count text from the issues tab counter.
    pub open_issues: Option<String>,
    /// Size text, e.g. `"12.5 MB"`.
    pub size: Option<String>,
}

/// One row of the commit history page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCommit {
    /// Commit link, ending in the full hash.
    pub href: Option<String>,
    /// Message link text.
    pub message: Option<String>,
    /// Author name.
    pub author: Option<String>,
    /// `datetime` attribute of the relative time element.
    pub datetime: Option<String>,
}

/// One entry of the contributors page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawContributor {
    /// Login or display name.
    pub name: Option<String>,
    /// Contribution count text.
    pub contributions: Option<String>,
}
