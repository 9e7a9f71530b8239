//! Rate-limited, retrying page fetch.
//!
//! `Fetcher::fetch_html` is the only way pages leave this crate. Every
//! upstream failure mode collapses to `None`; callers decide whether a
//! missing page ends the scrape or only skips one record.

use crate::fingerprint::BrowserIdentity;
use crate::rate_limit::RateLimiter;
use crate::transport::{HttpTransport, PageRequest};
use crate::HttpError;
use joblens_core::{HttpConfig, QueryParams};
use std::sync::Arc;
use std::time::Duration;

/// What to do with a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    /// 200: hand the body back.
    Success,
    /// 429/403: blocked or throttled, back off exponentially.
    Throttled,
    /// 5xx: back off linearly.
    ServerError,
    /// 400 (offset past the serving limit), 404, anything else: give up.
    Terminal,
}

impl StatusAction {
    pub fn for_status(status: u16) -> Self {
        match status {
            200 => Self::Success,
            429 | 403 => Self::Throttled,
            s if s >= 500 => Self::ServerError,
            _ => Self::Terminal,
        }
    }
}

/// Attempt budget and backoff schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_retries: u32,
    /// Exponential base for throttling statuses
    pub base_delay: Duration,
    /// Linear step for server and transport errors
    pub server_error_delay: Duration,
}

impl RetryPolicy {
    /// Delay after a throttled attempt: `base_delay * 2^attempt`.
    pub fn throttle_delay(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Delay after a server or transport error: `server_error_delay * (attempt + 1)`.
    pub fn error_delay(&self, attempt: u32) -> Duration {
        self.server_error_delay.saturating_mul(attempt.saturating_add(1))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&HttpConfig::default())
    }
}

impl From<&HttpConfig> for RetryPolicy {
    fn from(config: &HttpConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: config.retry_base_delay(),
            server_error_delay: config.server_error_delay(),
        }
    }
}

/// Issues GETs through the shared rate gate with bounded retries.
pub struct Fetcher {
    transport: Arc<dyn HttpTransport>,
    rate_limiter: Arc<RateLimiter>,
    policy: RetryPolicy,
    timeout: Duration,
}

impl Fetcher {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        rate_limiter: Arc<RateLimiter>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            rate_limiter,
            policy,
            timeout: HttpConfig::default().timeout(),
        }
    }

    /// Build a fetcher with its own rate gate from HTTP settings.
    pub fn from_config(config: &HttpConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(config.request_interval()));
        Self::new(transport, rate_limiter, RetryPolicy::from(config)).with_timeout(config.timeout())
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch a page's HTML, or `None` if it could not be obtained.
    ///
    /// Every attempt takes one rate-gate slot and presents a freshly drawn
    /// browser identity. No delay follows the final attempt.
    pub async fn fetch_html(&self, url: &str, params: &QueryParams) -> Option<String> {
        let max_retries = self.policy.max_retries;

        for attempt in 0..max_retries {
            self.rate_limiter.wait().await;

            let request = PageRequest {
                url: url.to_string(),
                params: params.clone(),
                headers: BrowserIdentity::randomized().headers(),
                timeout: self.timeout,
            };

            let delay = match self.transport.get(&request).await {
                Ok(response) => match StatusAction::for_status(response.status) {
                    StatusAction::Success => return Some(response.body),
                    StatusAction::Throttled => {
                        let delay = self.policy.throttle_delay(attempt);
                        if response.status == 403 {
                            tracing::warn!(
                                "Forbidden (403) on {}. IP may be blocked (attempt {}/{})",
                                url,
                                attempt + 1,
                                max_retries
                            );
                        } else {
                            tracing::warn!(
                                "Rate limited (429) on {} (attempt {}/{})",
                                url,
                                attempt + 1,
                                max_retries
                            );
                        }
                        delay
                    }
                    StatusAction::ServerError => {
                        tracing::warn!(
                            "Server error ({}) on {} (attempt {}/{})",
                            response.status,
                            url,
                            attempt + 1,
                            max_retries
                        );
                        self.policy.error_delay(attempt)
                    }
                    StatusAction::Terminal => {
                        match response.status {
                            400 => tracing::info!(
                                "Bad request (400) on {} -- likely pagination limit reached",
                                url
                            ),
                            404 => tracing::warn!("Not found (404): {}", url),
                            status => tracing::warn!("Unexpected status {} on {}", status, url),
                        }
                        return None;
                    }
                },
                Err(HttpError::Timeout(e)) => {
                    tracing::warn!(
                        "Timeout on {}: {} (attempt {}/{})",
                        url,
                        e,
                        attempt + 1,
                        max_retries
                    );
                    self.policy.error_delay(attempt)
                }
                Err(e) => {
                    tracing::warn!(
                        "HTTP error on {}: {} (attempt {}/{})",
                        url,
                        e,
                        attempt + 1,
                        max_retries
                    );
                    self.policy.error_delay(attempt)
                }
            };

            if attempt + 1 < max_retries {
                tracing::debug!("Retrying {} in {:?}", url, delay);
                tokio::time::sleep(delay).await;
            }
        }

        tracing::error!("All {} attempts exhausted for {}", max_retries, url);
        None
    }
}
