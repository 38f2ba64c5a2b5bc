//! Politeness pause between consecutive requests.

use std::time::Duration;

use rand::Rng;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::trace;

/// Spaces requests by a random pause drawn from `[min, max]`.
///
/// The pause is measured from the end of the previous request, which the
/// caller marks with [`Throttle::finish`]. The first request is not delayed.
#[derive(Debug)]
pub struct Throttle {
    min_pause: Duration,
    max_pause: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl Throttle {
    /// Creates a throttle with the given pause range.
    pub fn new(min_pause: Duration, max_pause: Duration) -> Self {
        Self {
            min_pause,
            max_pause: max_pause.max(min_pause),
            last_request: Mutex::new(None),
        }
    }

    /// Creates a throttle that never waits.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Waits until the pause since the previous request finished has elapsed.
    pub async fn wait(&self) {
        let last = *self.last_request.lock().await;
        if let Some(finished) = last {
            let pause = self.pick_pause();
            let ready_at = finished + pause;
            if ready_at > Instant::now() {
                trace!(pause_ms = pause.as_millis(), "Throttling request");
                tokio::time::sleep_until(ready_at).await;
            }
        }
    }

    /// Marks the end of a request; the next [`wait`](Self::wait) counts from here.
    pub async fn finish(&self) {
        *self.last_request.lock().await = Some(Instant::now());
    }

    /// Draws a pause from the configured range.
    pub fn pick_pause(&self) -> Duration {
        if self.max_pause <= self.min_pause {
            return self.min_pause;
        }
        rand::thread_rng().gen_range(self.min_pause..=self.max_pause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pause_within_range() {
        let throttle = Throttle::new(Duration::from_millis(100), Duration::from_millis(300));
        for _ in 0..50 {
            let pause = throttle.pick_pause();
            assert!(pause >= Duration::from_millis(100));
            assert!(pause <= Duration::from_millis(300));
        }
    }

    #[test]
    fn test_degenerate_range() {
        let throttle = Throttle::new(Duration::from_millis(200), Duration::from_millis(200));
        assert_eq!(throttle.pick_pause(), Duration::from_millis(200));
        assert_eq!(Throttle::disabled().pick_pause(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_second_request_is_spaced() {
        let throttle = Throttle::new(Duration::from_millis(30), Duration::from_millis(40));
        let start = std::time::Instant::now();
        throttle.wait().await;
        throttle.finish().await;
        assert!(start.elapsed() < Duration::from_millis(30));
        throttle.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_pause_counts_from_request_end() {
        let throttle = Throttle::new(Duration::from_millis(50), Duration::from_millis(60));
        throttle.wait().await;
        // A request slower than the whole pause range.
        tokio::time::sleep(Duration::from_millis(80)).await;
        throttle.finish().await;

        let before = std::time::Instant::now();
        throttle.wait().await;
        assert!(before.elapsed() >= Duration::from_millis(50));
    }
}
