// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Trendscope Fetch
//!
//! Polite page fetching for the Trendscope scraper.
//!
//! - [`Transport`] - One GET request, no retries (the test seam)
//! - [`HttpClient`] - reqwest transport with browser headers and a domain allowlist
//! - [`Fetcher`] - Retries with exponential backoff and paces requests
//! - [`RetryStrategy`] / [`Throttle`] - The two timing policies
//!
//! ## Example
//!
//! ```ignore
//! use trendscope_fetch::{FetchSettings, Fetcher};
//!
//! let fetcher = Fetcher::new(&FetchSettings::default())?;
//! let html = fetcher.fetch("https://github.com/trending?since=daily").await?;
//! ```

pub mod error;
pub mod fetcher;
pub mod http;
pub mod retry;
pub mod settings;
pub mod throttle;
pub mod transport;

pub use error::FetchError;
pub use fetcher::{FetchAttempt, FetchOutcome, Fetcher};
pub use http::{HttpClient, ResponseExt, host_in_domain};
pub use retry::RetryStrategy;
pub use settings::{DEFAULT_USER_AGENT, FetchSettings};
pub use throttle::Throttle;
pub use transport::Transport;
