use async_trait::async_trait;
use joblens_core::QueryParams;
use joblens_http::{
    Fetcher, HttpError, HttpTransport, PageRequest, PageResponse, RateLimiter, RetryPolicy,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// Replays a fixed sequence of outcomes and records when each request arrived.
struct ScriptedTransport {
    script: Mutex<VecDeque<Result<PageResponse, HttpError>>>,
    calls: Mutex<Vec<(Instant, PageRequest)>>,
}

impl ScriptedTransport {
    fn new(script: Vec<Result<PageResponse, HttpError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn call_offsets(&self, start: Instant) -> Vec<Duration> {
        self.calls
            .lock()
            .expect("calls lock")
            .iter()
            .map(|(at, _)| *at - start)
            .collect()
    }

    fn requests(&self) -> Vec<PageRequest> {
        self.calls
            .lock()
            .expect("calls lock")
            .iter()
            .map(|(_, req)| req.clone())
            .collect()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, request: &PageRequest) -> Result<PageResponse, HttpError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((Instant::now(), request.clone()));
        self.script
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or_else(|| Ok(PageResponse::new(500, "")))
    }
}

fn fetcher(transport: Arc<ScriptedTransport>, interval_secs: u64) -> Fetcher {
    Fetcher::new(
        transport,
        Arc::new(RateLimiter::new(Duration::from_secs(interval_secs))),
        RetryPolicy::default(),
    )
}

fn ok(body: &str) -> Result<PageResponse, HttpError> {
    Ok(PageResponse::new(200, body))
}

fn status(code: u16) -> Result<PageResponse, HttpError> {
    Ok(PageResponse::new(code, "blocked"))
}

#[tokio::test(start_paused = true)]
async fn test_success_returns_body_after_single_gate() {
    let transport = ScriptedTransport::new(vec![ok("<html>jobs</html>")]);
    let fetcher = fetcher(Arc::clone(&transport), 5);
    let start = Instant::now();

    let html = fetcher
        .fetch_html("https://example.com/jobs/search", &QueryParams::new())
        .await;

    assert_eq!(html.as_deref(), Some("<html>jobs</html>"));
    assert_eq!(transport.call_offsets(start), vec![Duration::ZERO]);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_consecutive_successes_are_paced() {
    let transport = ScriptedTransport::new(vec![ok("a"), ok("b")]);
    let fetcher = fetcher(Arc::clone(&transport), 5);
    let start = Instant::now();

    let params = QueryParams::new();
    let first = fetcher.fetch_html("https://example.com/a", &params).await;
    let second = fetcher.fetch_html("https://example.com/b", &params).await;
    assert_eq!(first.as_deref(), Some("a"));
    assert_eq!(second.as_deref(), Some("b"));

    assert_eq!(
        transport.call_offsets(start),
        vec![Duration::ZERO, Duration::from_secs(5)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_throttling_backs_off_exponentially_then_gives_up() {
    let transport = ScriptedTransport::new(vec![status(429), status(403), status(429)]);
    let fetcher = fetcher(Arc::clone(&transport), 5);
    let start = Instant::now();

    let html = fetcher
        .fetch_html("https://example.com/jobs/search", &QueryParams::new())
        .await;

    assert!(html.is_none());
    // Retry delays of 15s then 30s; nothing after the last attempt
    assert_eq!(
        transport.call_offsets(start),
        vec![
            Duration::ZERO,
            Duration::from_secs(15),
            Duration::from_secs(45)
        ]
    );
    assert_eq!(start.elapsed(), Duration::from_secs(45));
}

#[tokio::test(start_paused = true)]
async fn test_throttling_then_success() {
    let transport = ScriptedTransport::new(vec![status(429), ok("recovered")]);
    let fetcher = fetcher(Arc::clone(&transport), 5);

    let html = fetcher
        .fetch_html("https://example.com/jobs/search", &QueryParams::new())
        .await;

    assert_eq!(html.as_deref(), Some("recovered"));
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_bad_request_is_terminal() {
    let transport = ScriptedTransport::new(vec![status(400), ok("never reached")]);
    let fetcher = fetcher(Arc::clone(&transport), 5);
    let start = Instant::now();

    let html = fetcher
        .fetch_html("https://example.com/jobs-guest", &QueryParams::new())
        .await;

    assert!(html.is_none());
    assert_eq!(transport.requests().len(), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_not_found_and_unexpected_statuses_are_terminal() {
    for code in [404, 301, 418] {
        let transport = ScriptedTransport::new(vec![status(code), ok("never reached")]);
        let fetcher = fetcher(Arc::clone(&transport), 0);

        let html = fetcher
            .fetch_html("https://example.com/jobs/view/1", &QueryParams::new())
            .await;

        assert!(html.is_none(), "status {code} should be terminal");
        assert_eq!(transport.requests().len(), 1, "status {code} retried");
    }
}

#[tokio::test(start_paused = true)]
async fn test_server_errors_back_off_linearly() {
    let transport = ScriptedTransport::new(vec![status(502), status(500), ok("finally")]);
    let fetcher = fetcher(Arc::clone(&transport), 0);
    let start = Instant::now();

    let html = fetcher
        .fetch_html("https://example.com/jobs/search", &QueryParams::new())
        .await;

    assert_eq!(html.as_deref(), Some("finally"));
    assert_eq!(
        transport.call_offsets(start),
        vec![
            Duration::ZERO,
            Duration::from_secs(10),
            Duration::from_secs(30)
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_transport_errors_are_retried() {
    let transport = ScriptedTransport::new(vec![
        Err(HttpError::Timeout("read timed out".to_string())),
        Err(HttpError::Transport("connection reset".to_string())),
        Err(HttpError::Timeout("read timed out".to_string())),
    ]);
    let fetcher = fetcher(Arc::clone(&transport), 0);
    let start = Instant::now();

    let html = fetcher
        .fetch_html("https://example.com/jobs/search", &QueryParams::new())
        .await;

    assert!(html.is_none());
    assert_eq!(
        transport.call_offsets(start),
        vec![
            Duration::ZERO,
            Duration::from_secs(10),
            Duration::from_secs(30)
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_request_carries_params_identity_and_timeout() {
    let transport = ScriptedTransport::new(vec![ok("ok")]);
    let fetcher = fetcher(Arc::clone(&transport), 0).with_timeout(Duration::from_secs(30));

    let mut params = QueryParams::new();
    params.insert("keywords".to_string(), "rust".to_string());
    params.insert("start".to_string(), "25".to_string());

    fetcher
        .fetch_html("https://example.com/jobs-guest", &params)
        .await;

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, "https://example.com/jobs-guest");
    assert_eq!(requests[0].params, params);
    assert_eq!(requests[0].timeout, Duration::from_secs(30));
    let ua = requests[0]
        .headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .expect("user agent header");
    assert!(ua.starts_with("Mozilla/5.0"));
}

#[tokio::test(start_paused = true)]
async fn test_failed_attempts_consume_rate_gate() {
    // Interval longer than the backoff: the gate, not the backoff, spaces the retries
    let transport = ScriptedTransport::new(vec![status(500), ok("ok")]);
    let fetcher = fetcher(Arc::clone(&transport), 20);
    let start = Instant::now();

    fetcher
        .fetch_html("https://example.com/jobs/search", &QueryParams::new())
        .await;

    assert_eq!(
        transport.call_offsets(start),
        vec![Duration::ZERO, Duration::from_secs(20)]
    );
}
