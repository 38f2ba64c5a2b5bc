// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Trendscope Store
//!
//! Everything that outlives a single scrape call:
//!
//! - **SessionCache**: Opt-in in-memory reuse of trending reports and profiles
//! - **Config**: Optional JSON configuration with defaults
//! - **Persistence**: Atomic file writes and export file naming
//!
//! ## Usage
//!
//! ```ignore
//! use trendscope_store::{Config, SessionCache};
//!
//! let config = Config::load()?;
//! let cache = config
//!     .cache_max_age()
//!     .map_or_else(SessionCache::new, SessionCache::with_max_age);
//!
//! let report = cache
//!     .trending_or_fetch(&query, false, || scraper.scrape_trending(&query))
//!     .await?;
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod persistence;

pub use cache::SessionCache;
pub use config::{CacheConfig, Config, ExportConfig, FetchConfig, ScraperConfig};
pub use error::StoreError;
pub use persistence::{
    ExportKind, default_config_dir, default_config_path, export_file_name, load_json,
    write_atomic,
};
