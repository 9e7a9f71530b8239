use crate::error::{HttpError, Result};
use async_trait::async_trait;
use joblens_core::{HttpConfig, QueryParams};
use reqwest::header::HeaderMap;
use reqwest::redirect::Policy;
use reqwest::{Client, Proxy};
use std::time::Duration;

/// Maximum redirect hops followed per request.
const MAX_REDIRECTS: usize = 10;

/// One outbound GET.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub url: String,
    pub params: QueryParams,
    pub headers: HeaderMap,
    pub timeout: Duration,
}

/// Status and body of a completed request, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    pub status: u16,
    pub body: String,
}

impl PageResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Single outbound HTTP path.
///
/// Non-2xx statuses are responses, not errors. Errors are reserved for
/// requests that produced no response at all (timeouts, connection failures).
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, request: &PageRequest) -> Result<PageResponse>;
}

/// reqwest-backed transport, optionally tunneled through one proxy.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a client from HTTP settings, following redirects automatically.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .redirect(Policy::limited(MAX_REDIRECTS))
            .timeout(config.timeout());

        if let Some(proxy_url) = config.proxy_url.as_deref() {
            let proxy =
                Proxy::all(proxy_url).map_err(|e| HttpError::InvalidProxy(e.to_string()))?;
            builder = builder.proxy(proxy);
            tracing::debug!("Routing requests through configured proxy");
        }

        let client = builder
            .build()
            .map_err(|e| HttpError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, request: &PageRequest) -> Result<PageResponse> {
        let response = self
            .client
            .get(&request.url)
            .query(&request.params)
            .headers(request.headers.clone())
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|e| HttpError::from_reqwest(&e))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();
        let body = response
            .text()
            .await
            .map_err(|e| HttpError::from_reqwest(&e))?;

        tracing::debug!(
            "{} | url={} | length={} | content_type={}",
            status,
            request.url,
            body.len(),
            content_type
        );

        Ok(PageResponse { status, body })
    }
}
