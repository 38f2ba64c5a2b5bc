//! The single-request seam beneath the retrying fetcher.

use async_trait::async_trait;

use crate::error::FetchError;

/// Performs one GET request and returns the body.
///
/// Implementations make exactly one attempt; retries, backoff, and
/// pacing are the [`Fetcher`](crate::Fetcher)'s job.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches `url` once.
    async fn get(&self, url: &str) -> Result<String, FetchError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        (**self).get(url).await
    }
}
