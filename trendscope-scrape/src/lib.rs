// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Trendscope Scrape
//!
//! Turns GitHub HTML into typed records.
//!
//! ## Pipeline
//!
//! 1. [`extract`] - Ordered fallback selectors produce raw string fields
//! 2. [`normalize`] - Validation, canonical URLs, counts, de-duplication
//! 3. [`metrics`] / [`analysis`] - Scores and sample statistics
//!
//! [`GitHubScraper`] wires these to a [`trendscope_fetch::Fetcher`].
//! [`stats`] holds list-level helpers (popularity, filters, language
//! breakdown) used by presentation layers.
//!
//! ## Example
//!
//! ```ignore
//! use trendscope_core::{LanguageFilter, TimeRange, TrendingQuery};
//! use trendscope_fetch::FetchSettings;
//! use trendscope_scrape::{GitHubScraper, ScraperSettings};
//!
//! let scraper = GitHubScraper::new(&FetchSettings::default(), ScraperSettings::default())?;
//! let query = TrendingQuery::new(LanguageFilter::parse("rust"), TimeRange::Weekly);
//! let report = scraper.scrape_trending(&query).await?;
//! ```

pub mod analysis;
pub mod error;
pub mod extract;
pub mod github;
pub mod metrics;
pub mod normalize;
pub mod numbers;
pub mod selector;
pub mod stats;

pub use error::ScrapeError;
pub use extract::{
    RawCommit, RawContributor, RawRepositoryPage, RawTrendingEntry, extract_commits,
    extract_contributors, extract_issue_count, extract_repository, extract_trending,
};
pub use metrics::{MetricsInput, clamp_score, compute_metrics};
pub use normalize::{Normalized, normalize};
pub use numbers::{parse_count, parse_size_kb};
pub use github::{GitHubScraper, ScraperSettings};
pub use selector::{ExtractStrategy, FieldChain};
pub use stats::{LanguageStats, SortKey};
