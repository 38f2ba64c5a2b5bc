// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Trendscope Core
//!
//! Typed records shared by every Trendscope crate.
//!
//! ## Key Types
//!
//! ### Queries
//! - [`TrendingQuery`] - Language filter plus time range
//! - [`RepoId`] - `owner/repo` identifier with canonical URL
//!
//! ### Trending
//! - [`TrendingEntry`] - One repository snapshot from a trending page
//! - [`TrendingReport`] - Entries of one scrape plus the skipped count
//!
//! ### Repository Analysis
//! - [`RepositoryProfile`] - Detailed repository snapshot
//! - [`ActivityMetrics`] - Derived health/engagement/velocity scores

pub mod error;
pub mod models;

pub use error::CoreError;

pub use models::{
    // Queries
    GITHUB_BASE_URL,
    LanguageFilter,
    RepoId,
    TimeRange,
    TrendingQuery,
    // Trending
    TrendingEntry,
    TrendingReport,
    // Repository analysis
    ActivityLevel,
    ActivityMetrics,
    CommitAnalysis,
    CommitKind,
    CommitSummary,
    ContributorAnalysis,
    ContributorSummary,
    RepositoryProfile,
};
