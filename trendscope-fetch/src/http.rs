//! reqwest-backed transport with browser headers and a domain allowlist.

use async_trait::async_trait;
use reqwest::{Client, Response, header, header::HeaderMap, header::HeaderValue};
use tracing::{debug, instrument};
use url::Url;

use crate::error::FetchError;
use crate::settings::FetchSettings;
use crate::transport::Transport;

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client with default browser headers and a domain allowlist.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    allowed_domains: Vec<String>,
}

impl HttpClient {
    /// Builds a client from settings.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Client` if the TLS backend cannot be initialized
    /// or the user agent is not a valid header value.
    pub fn new(settings: &FetchSettings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.as_str())
            .default_headers(default_headers())
            .gzip(true)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            inner: client,
            allowed_domains: settings.allowed_domains.clone(),
        })
    }

    /// Checks if a URL's domain is allowed.
    fn is_domain_allowed(&self, url: &str) -> Result<(), FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;

        let host = parsed
            .host_str()
            .ok_or_else(|| FetchError::InvalidUrl(format!("{url}: no host")))?;

        if self.allowed_domains.is_empty() {
            return Ok(());
        }

        let allowed = self
            .allowed_domains
            .iter()
            .any(|domain| host_in_domain(host, domain));

        if allowed {
            Ok(())
        } else {
            Err(FetchError::DomainNotAllowed(host.to_string()))
        }
    }
}

/// Returns true if `host` is `domain` itself or one of its subdomains.
pub fn host_in_domain(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

#[async_trait]
impl Transport for HttpClient {
    #[instrument(skip(self), fields(url = %url))]
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        self.is_domain_allowed(url)?;
        debug!("GET request");

        let response = self
            .inner
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, &e))?;
        debug!(status = %response.status(), "Response received");

        if response.is_rate_limited() {
            return Err(FetchError::RateLimited {
                url: url.to_string(),
                retry_after: response.retry_after_secs(),
            });
        }
        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, &e))
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.5"),
    );
    headers.insert(header::DNT, HeaderValue::from_static("1"));
    headers.insert(
        header::UPGRADE_INSECURE_REQUESTS,
        HeaderValue::from_static("1"),
    );
    headers
}

// ============================================================================
// Response Extensions
// ============================================================================

/// Extension trait for Response handling.
pub trait ResponseExt {
    /// Check if the response indicates rate limiting.
    fn is_rate_limited(&self) -> bool;

    /// Get the Retry-After header value in seconds.
    fn retry_after_secs(&self) -> Option<u64>;
}

impl ResponseExt for Response {
    fn is_rate_limited(&self) -> bool {
        self.status() == reqwest::StatusCode::TOO_MANY_REQUESTS
    }

    fn retry_after_secs(&self) -> Option<u64> {
        self.headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn client(domains: &[&str]) -> HttpClient {
        let settings = FetchSettings::default()
            .with_allowed_domains(domains.iter().map(ToString::to_string).collect());
        HttpClient::new(&settings).unwrap()
    }

    #[test]
    fn test_domain_allowlist() {
        let client = client(&["github.com"]);

        assert!(client.is_domain_allowed("https://github.com/trending").is_ok());
        assert!(client.is_domain_allowed("https://www.github.com/rust-lang/rust").is_ok());

        assert!(matches!(
            client.is_domain_allowed("https://evil.com/github.com"),
            Err(FetchError::DomainNotAllowed(_))
        ));
        assert!(client.is_domain_allowed("https://notgithub.com/").is_err());
    }

    #[test]
    fn test_host_in_domain() {
        assert!(host_in_domain("github.com", "github.com"));
        assert!(host_in_domain("api.github.com", "github.com"));
        assert!(!host_in_domain("notgithub.com", "github.com"));
        assert!(!host_in_domain("github.com.evil.io", "github.com"));
        assert!(host_in_domain("[::1]", "[::1]"));
    }

    #[test]
    fn test_empty_allowlist_allows_all() {
        let client = client(&[]);
        assert!(client.is_domain_allowed("http://127.0.0.1:8080/trending").is_ok());
    }

    #[test]
    fn test_invalid_url() {
        let client = client(&["github.com"]);
        assert!(matches!(
            client.is_domain_allowed("not-a-valid-url"),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_disallowed_domain_is_not_requested() {
        let client = client(&["github.com"]);
        let err = client.get("https://example.com/").await.unwrap_err();
        assert!(matches!(err, FetchError::DomainNotAllowed(_)));
        assert!(!err.is_retryable());
    }
}
