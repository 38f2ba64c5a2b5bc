//! Fetch error types.

use thiserror::Error;

/// Error type for fetch operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request exceeded the configured timeout.
    #[error("Request to {url} timed out")]
    Timeout {
        /// Requested URL.
        url: String,
    },

    /// Connection could not be established (DNS, refused, TLS).
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Any other transport-level failure (reset, body decode).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Rate limited by the server.
    #[error("Rate limited by {url}, retry after {retry_after:?} seconds")]
    RateLimited {
        /// Requested URL.
        url: String,
        /// Seconds to wait before retrying, from `Retry-After`.
        retry_after: Option<u64>,
    },

    /// Non-success HTTP status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// URL could not be parsed or is not allowed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Domain not in the allowlist.
    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),

    /// HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    /// All attempts failed; carries the last error.
    #[error("Request failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// Error of the final attempt.
        last: Box<FetchError>,
    },
}

impl FetchError {
    /// Returns true if another attempt might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. }
            | Self::Connect(_)
            | Self::Transport(_)
            | Self::RateLimited { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            Self::InvalidUrl(_)
            | Self::DomainNotAllowed(_)
            | Self::Client(_)
            | Self::RetriesExhausted { .. } => false,
        }
    }

    /// Returns the error of the final attempt (unwrapping `RetriesExhausted`).
    pub fn root(&self) -> &FetchError {
        match self {
            Self::RetriesExhausted { last, .. } => last.root(),
            other => other,
        }
    }

    /// Classifies a reqwest error for `url`.
    pub fn from_reqwest(url: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
                url: url.to_string(),
            }
        } else if err.is_builder() {
            Self::InvalidUrl(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(FetchError::Timeout { url: "u".into() }.is_retryable());
        assert!(FetchError::Connect("refused".into()).is_retryable());
        assert!(FetchError::Status { status: 502, url: "u".into() }.is_retryable());
        assert!(FetchError::RateLimited { url: "u".into(), retry_after: None }.is_retryable());

        assert!(!FetchError::Status { status: 404, url: "u".into() }.is_retryable());
        assert!(!FetchError::DomainNotAllowed("evil.com".into()).is_retryable());
    }

    #[test]
    fn test_root_unwraps_exhausted() {
        let err = FetchError::RetriesExhausted {
            attempts: 3,
            last: Box::new(FetchError::Connect("refused".into())),
        };
        assert!(matches!(err.root(), FetchError::Connect(_)));
        assert!(err.to_string().contains("3 attempts"));
    }
}
