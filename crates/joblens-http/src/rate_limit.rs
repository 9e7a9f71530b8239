use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Process-wide pacing gate.
///
/// `wait()` returns only once at least `interval` has passed since the
/// previous caller was released. The lock is held across the sleep, so
/// concurrent callers queue up and are released one interval apart.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    last_release: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_release: Mutex::new(None),
        }
    }

    /// Wait until it's safe to make another request.
    pub async fn wait(&self) {
        let mut last_release = self.last_release.lock().await;

        if let Some(last) = *last_release {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                let wait_time = self.interval - elapsed;
                tracing::debug!("Rate limiter: waiting {:.1}s", wait_time.as_secs_f64());
                tokio::time::sleep(wait_time).await;
            }
        }

        *last_release = Some(Instant::now());
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}
