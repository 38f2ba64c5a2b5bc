//! Scrape error types.

use thiserror::Error;
use trendscope_core::CoreError;
use trendscope_fetch::FetchError;

/// Error type for scrape operations.
///
/// Unparseable fields are not errors (they default), and invalid entries
/// are dropped and counted rather than reported here.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The page could not be fetched.
    #[error("Network failure: {0}")]
    Network(#[from] FetchError),

    /// The trending page yielded no valid entries.
    #[error("No repositories found ({skipped} entries skipped)")]
    EmptyResult {
        /// Entries dropped during normalization.
        skipped: usize,
    },

    /// The repository identifier could not be parsed.
    #[error("Invalid repository: {0}")]
    InvalidRepository(String),

    /// Domain-level error.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ScrapeError {
    /// Returns true for network failures.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
