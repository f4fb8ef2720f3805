use http::HeaderMap;
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration, Instant};

/// Rate limit state reported in `x-rate-limit-*` response headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimitInfo {
    pub limit: Option<u32>,
    pub remaining: Option<u32>,
    /// Unix timestamp (seconds) when the window resets
    pub reset: Option<u64>,
}

impl RateLimitInfo {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let parse = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
        RateLimitInfo {
            limit: parse("x-rate-limit-limit").and_then(|v| v.parse().ok()),
            remaining: parse("x-rate-limit-remaining").and_then(|v| v.parse().ok()),
            reset: parse("x-rate-limit-reset").and_then(|v| v.parse().ok()),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    pub fn time_until_reset(&self) -> Option<Duration> {
        self.time_until_reset_from(chrono::Utc::now().timestamp())
    }

    fn time_until_reset_from(&self, now: i64) -> Option<Duration> {
        let reset = i64::try_from(self.reset?).ok()?;
        (reset > now).then(|| Duration::from_secs((reset - now) as u64))
    }
}

/// Spaces out consecutive requests and sleeps through exhausted windows.
pub struct RateLimiter {
    min_delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_delay_ms: u64) -> Self {
        RateLimiter {
            min_delay: Duration::from_millis(min_delay_ms),
            last_request: Mutex::new(None),
        }
    }

    /// Waits until at least `min_delay` has passed since the previous call.
    pub async fn acquire(&self) {
        let mut last_request = self.last_request.lock().await;
        if let Some(last) = *last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_delay {
                let wait_time = self.min_delay - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait_time);
                sleep(wait_time).await;
            }
        }
        *last_request = Some(Instant::now());
    }

    /// Sleeps until `wait` has elapsed, padded by one second so the window
    /// has rolled over when the request is retried. Zero waits return at once.
    pub async fn wait_for_reset(&self, wait: Duration) {
        if wait.is_zero() {
            return;
        }
        let padded = wait + Duration::from_secs(1);
        tracing::warn!("Rate limit reached. Sleeping for {} seconds", padded.as_secs());
        sleep(padded).await;
    }
}
