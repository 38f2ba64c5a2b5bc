//! Repository profile records.
//!
//! - [`RepositoryProfile`] - Detailed single-repository snapshot
//! - [`CommitSummary`] / [`ContributorSummary`] - Scraped sub-records
//! - [`ActivityMetrics`] - Derived scores
//! - [`CommitAnalysis`] / [`ContributorAnalysis`] - Sample statistics

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Repository Profile
// ============================================================================

/// Detailed snapshot of one repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryProfile {
    /// `owner/repo`.
    pub full_name: String,
    /// Canonical URL.
    pub url: String,
    /// Repository description ("About" text).
    pub description: Option<String>,
    /// Primary language.
    pub language: Option<String>,
    /// Total stars.
    pub stars: u64,
    /// Total forks.
    pub forks: u64,
    /// Watchers.
    pub watchers: u64,
    /// Open issues.
    pub open_issues: u64,
    /// Approximate repository size in kilobytes.
    pub size_kb: Option<u64>,
    /// Most recent commits, newest first.
    pub recent_commits: Vec<CommitSummary>,
    /// Top contributors, descending by contribution count.
    pub top_contributors: Vec<ContributorSummary>,
    /// Derived scores.
    pub activity_metrics: ActivityMetrics,
    /// Statistics over `recent_commits`.
    pub commit_analysis: Option<CommitAnalysis>,
    /// Statistics over `top_contributors`.
    pub contributor_analysis: Option<ContributorAnalysis>,
}

/// One commit from the commit history page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    /// Short hash (empty if unavailable).
    pub sha: String,
    /// First line of the commit message.
    pub message: String,
    /// Author display name.
    pub author: String,
    /// Best-effort commit time.
    pub timestamp: Option<DateTime<Utc>>,
}

/// One contributor with a contribution count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorSummary {
    /// Login or display name.
    pub name: String,
    /// Number of contributions.
    pub contribution_count: u64,
    /// True when the count was derived from the commit sample.
    #[serde(default)]
    pub estimated: bool,
}

// ============================================================================
// Activity Metrics
// ============================================================================

/// Derived scores, each within [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivityMetrics {
    /// Stars, fork ratio, and commit recency combined.
    pub health_score: f64,
    /// Contributor count and issue-to-star ratio combined.
    pub community_engagement: f64,
    /// Commit frequency over the sampled window.
    pub development_velocity: f64,
    /// Bucket of `health_score`.
    pub activity_level: ActivityLevel,
}

impl Default for ActivityMetrics {
    fn default() -> Self {
        Self {
            health_score: 0.0,
            community_engagement: 0.0,
            development_velocity: 0.0,
            activity_level: ActivityLevel::VeryLow,
        }
    }
}

/// Coarse activity bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Lowest bucket.
    VeryLow,
    /// Low activity.
    Low,
    /// Medium activity.
    Medium,
    /// High activity.
    High,
    /// Highest bucket.
    VeryHigh,
}

impl ActivityLevel {
    /// Buckets a 0-100 score at 80/60/40/20.
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::VeryHigh
        } else if score >= 60.0 {
            Self::High
        } else if score >= 40.0 {
            Self::Medium
        } else if score >= 20.0 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }

    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryLow => "Very Low",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Commit Analysis
// ============================================================================

/// Conventional category of a commit message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitKind {
    /// New functionality.
    Feature,
    /// Bug fix.
    Fix,
    /// Documentation.
    Docs,
    /// Formatting and lint.
    Style,
    /// Restructuring.
    Refactor,
    /// Tests.
    Test,
    /// Anything else.
    Other,
}

impl CommitKind {
    /// Kinds in classification order.
    pub fn all() -> &'static [CommitKind] {
        &[
            Self::Feature,
            Self::Fix,
            Self::Docs,
            Self::Style,
            Self::Refactor,
            Self::Test,
            Self::Other,
        ]
    }

    /// Keywords that select this kind (empty for `Other`).
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Feature => &["feat", "feature", "add", "new"],
            Self::Fix => &["fix", "bug", "patch"],
            Self::Docs => &["doc", "readme", "comment"],
            Self::Style => &["style", "format", "lint"],
            Self::Refactor => &["refactor", "clean", "optimize"],
            Self::Test => &["test", "spec", "coverage"],
            Self::Other => &[],
        }
    }

    /// Classifies a commit message; the first kind with a matching keyword wins.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.keywords().iter().any(|k| lower.contains(k)))
            .unwrap_or(Self::Other)
    }
}

/// Statistics over a commit sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitAnalysis {
    /// Commits in the sample.
    pub total_commits: usize,
    /// Dated commits per day across the sample span.
    pub daily_commit_rate: f64,
    /// Distinct authors.
    pub unique_authors: usize,
    /// Mean message length in characters.
    pub average_message_length: f64,
    /// Count per commit kind.
    pub commit_types: BTreeMap<CommitKind, usize>,
}

// ============================================================================
// Contributor Analysis
// ============================================================================

/// Statistics over the contributor list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributorAnalysis {
    /// Contributors listed.
    pub total_contributors: usize,
    /// Name of the first-ranked contributor.
    pub top_contributor: Option<String>,
    /// Sum of contribution counts.
    pub total_contributions: u64,
    /// Mean contribution count.
    pub average_contributions: f64,
    /// 1 - HHI of contribution shares (0 = one contributor, near 1 = even).
    pub diversity: f64,
}
