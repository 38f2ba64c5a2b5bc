//! Retrying, throttled page fetcher.
//!
//! Requests are strictly serial: every call awaits its attempts, backoff
//! waits, and politeness pauses before returning. The only state shared
//! between calls is the instant the throttle saw the last request finish.

use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use crate::error::FetchError;
use crate::http::HttpClient;
use crate::retry::RetryStrategy;
use crate::settings::FetchSettings;
use crate::throttle::Throttle;
use crate::transport::Transport;

// ============================================================================
// Fetch Attempt
// ============================================================================

/// Record of a single request attempt.
#[derive(Debug, Clone)]
pub struct FetchAttempt {
    /// 1-based attempt number.
    pub number: u32,
    /// Whether the attempt succeeded.
    pub success: bool,
    /// Error if the attempt failed.
    pub error: Option<String>,
    /// How long the request took (pauses excluded).
    pub duration: Duration,
}

impl FetchAttempt {
    /// Creates a successful attempt record.
    pub fn success(number: u32, duration: Duration) -> Self {
        Self {
            number,
            success: true,
            error: None,
            duration,
        }
    }

    /// Creates a failed attempt record.
    pub fn failure(number: u32, error: impl Into<String>, duration: Duration) -> Self {
        Self {
            number,
            success: false,
            error: Some(error.into()),
            duration,
        }
    }
}

// ============================================================================
// Fetch Outcome
// ============================================================================

/// The outcome of fetching one URL.
#[derive(Debug)]
pub struct FetchOutcome {
    /// The page body or the final error.
    pub result: Result<String, FetchError>,
    /// All attempts made.
    pub attempts: Vec<FetchAttempt>,
    /// Total duration including waits.
    pub duration: Duration,
}

impl FetchOutcome {
    /// Returns true if the fetch succeeded.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Returns the number of attempts made.
    pub fn attempts_count(&self) -> usize {
        self.attempts.len()
    }

    /// Returns all errors that occurred.
    pub fn errors(&self) -> Vec<&str> {
        self.attempts
            .iter()
            .filter_map(|a| a.error.as_deref())
            .collect()
    }
}

// ============================================================================
// Fetcher
// ============================================================================

/// Fetches pages with retries, exponential backoff, and a politeness pause.
#[derive(Debug)]
pub struct Fetcher<T: Transport = HttpClient> {
    transport: T,
    retry: RetryStrategy,
    throttle: Throttle,
}

impl Fetcher<HttpClient> {
    /// Creates a fetcher over a reqwest client.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Client` if the HTTP client cannot be built.
    pub fn new(settings: &FetchSettings) -> Result<Self, FetchError> {
        Ok(Self::with_transport(HttpClient::new(settings)?, settings))
    }
}

impl<T: Transport> Fetcher<T> {
    /// Creates a fetcher over any transport.
    pub fn with_transport(transport: T, settings: &FetchSettings) -> Self {
        Self {
            transport,
            retry: RetryStrategy::from_settings(settings),
            throttle: Throttle::new(settings.min_pause, settings.max_pause),
        }
    }

    /// Replaces the retry strategy.
    pub fn with_retry(mut self, retry: RetryStrategy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the retry strategy.
    pub fn retry(&self) -> &RetryStrategy {
        &self.retry
    }

    /// Returns the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches `url`, returning the body.
    ///
    /// # Errors
    ///
    /// Non-retryable failures (e.g. 404) are returned as-is after one
    /// attempt. Retryable failures that persist through every attempt are
    /// returned as `FetchError::RetriesExhausted`.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.execute(url).await.result
    }

    /// Fetches `url`, recording every attempt.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn execute(&self, url: &str) -> FetchOutcome {
        let start = Instant::now();
        let mut attempts = Vec::new();
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 0;

        let result = loop {
            attempt += 1;
            self.throttle.wait().await;

            let attempt_start = Instant::now();
            debug!(attempt, max_attempts, "Requesting page");

            let response = self.transport.get(url).await;
            self.throttle.finish().await;

            match response {
                Ok(body) => {
                    attempts.push(FetchAttempt::success(attempt, attempt_start.elapsed()));
                    info!(attempt, bytes = body.len(), "Page fetched");
                    break Ok(body);
                }
                Err(e) => {
                    attempts.push(FetchAttempt::failure(
                        attempt,
                        e.to_string(),
                        attempt_start.elapsed(),
                    ));

                    if !e.is_retryable() {
                        warn!(attempt, error = %e, "Request failed, not retrying");
                        break Err(e);
                    }
                    if attempt >= max_attempts {
                        warn!(attempts = attempt, error = %e, "Request failed, giving up");
                        break Err(FetchError::RetriesExhausted {
                            attempts: attempt,
                            last: Box::new(e),
                        });
                    }

                    let delay = self.retry.delay_for_error(attempt, &e);
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis(),
                        error = %e,
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        };

        FetchOutcome {
            result,
            attempts,
            duration: start.elapsed(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Transport replaying scripted responses; repeats the last one.
    struct ScriptedTransport {
        script: Mutex<VecDeque<Result<String, FetchError>>>,
        calls: AtomicU32,
    }

    impl ScriptedTransport {
        fn new(script: Vec<Result<String, FetchError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn get(&self, url: &str) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock().unwrap();
            match script.pop_front() {
                Some(next) => next,
                None => Err(FetchError::Connect(format!("no response scripted for {url}"))),
            }
        }
    }

    fn settings() -> FetchSettings {
        FetchSettings::default().without_delays()
    }

    fn connect_error() -> FetchError {
        FetchError::Connect("connection refused".into())
    }

    #[tokio::test]
    async fn test_success_first_try() {
        let fetcher = Fetcher::with_transport(
            ScriptedTransport::new(vec![Ok("<html></html>".into())]),
            &settings(),
        );

        let outcome = fetcher.execute("https://github.com/trending").await;
        assert!(outcome.is_success());
        assert_eq!(outcome.attempts_count(), 1);
        assert_eq!(fetcher.transport().calls(), 1);
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failure() {
        let fetcher = Fetcher::with_transport(
            ScriptedTransport::new(vec![
                Err(connect_error()),
                Err(FetchError::Status { status: 503, url: "u".into() }),
                Ok("body".into()),
            ]),
            &settings(),
        );

        let outcome = fetcher.execute("https://github.com/trending").await;
        assert_eq!(outcome.result.as_ref().unwrap(), "body");
        assert_eq!(outcome.attempts.len(), 3);
        assert_eq!(outcome.errors().len(), 2);
        assert!(outcome.attempts[2].success);
    }

    #[tokio::test]
    async fn test_exhausts_after_three_failures() {
        let fetcher = Fetcher::with_transport(
            ScriptedTransport::new(vec![
                Err(connect_error()),
                Err(connect_error()),
                Err(connect_error()),
                Ok("never reached".into()),
            ]),
            &settings(),
        );

        let err = fetcher.fetch("https://github.com/trending").await.unwrap_err();
        match err {
            FetchError::RetriesExhausted { attempts, last } => {
                assert_eq!(attempts, 3);
                assert!(matches!(*last, FetchError::Connect(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(fetcher.transport().calls(), 3);
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let fetcher = Fetcher::with_transport(
            ScriptedTransport::new(vec![
                Err(FetchError::Status { status: 404, url: "u".into() }),
                Ok("never reached".into()),
            ]),
            &settings(),
        );

        let err = fetcher.fetch("https://github.com/nobody/nothing").await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
        assert_eq!(fetcher.transport().calls(), 1);
    }

    #[tokio::test]
    async fn test_single_attempt_strategy() {
        let fetcher = Fetcher::with_transport(
            ScriptedTransport::new(vec![Err(connect_error()), Ok("body".into())]),
            &settings(),
        )
        .with_retry(RetryStrategy::no_retry());

        let err = fetcher.fetch("https://github.com/trending").await.unwrap_err();
        assert!(matches!(err, FetchError::RetriesExhausted { attempts: 1, .. }));
    }

    /// Transport taking a fixed time per request and logging when each ran.
    struct SlowTransport {
        latency: Duration,
        spans: Mutex<Vec<(Instant, Instant)>>,
    }

    #[async_trait]
    impl Transport for SlowTransport {
        async fn get(&self, _url: &str) -> Result<String, FetchError> {
            let began = Instant::now();
            tokio::time::sleep(self.latency).await;
            self.spans.lock().unwrap().push((began, Instant::now()));
            Ok("body".into())
        }
    }

    #[tokio::test]
    async fn test_pause_follows_slow_response() {
        let settings = FetchSettings::default();
        let fetcher = Fetcher::with_transport(
            SlowTransport {
                latency: Duration::from_millis(400),
                spans: Mutex::new(Vec::new()),
            },
            &settings,
        );

        fetcher.fetch("https://github.com/trending").await.unwrap();
        fetcher.fetch("https://github.com/rust-lang/rust").await.unwrap();

        let spans = fetcher.transport().spans.lock().unwrap().clone();
        assert_eq!(spans.len(), 2);
        let gap = spans[1].0.duration_since(spans[0].1);
        assert!(gap >= settings.min_pause, "gap between requests was {gap:?}");
    }
}
