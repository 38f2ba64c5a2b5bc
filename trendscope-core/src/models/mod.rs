//! Domain records for Trendscope.
//!
//! ## Submodules
//!
//! - [`query`] - Query parameters and repository identifiers
//! - [`trending`] - Trending page records (TrendingEntry, TrendingReport)
//! - [`repository`] - Repository profile, commits, contributors, metrics

mod query;
mod repository;
mod trending;

pub use query::{GITHUB_BASE_URL, LanguageFilter, RepoId, TimeRange, TrendingQuery};
pub use repository::{
    ActivityLevel, ActivityMetrics, CommitAnalysis, CommitKind, CommitSummary,
    ContributorAnalysis, ContributorSummary, RepositoryProfile,
};
pub use trending::{TrendingEntry, TrendingReport};
