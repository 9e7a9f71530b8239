use anyhow::{bail, Result};
use async_trait::async_trait;
use joblens_cli::limits::Tier;
use joblens_cli::runner::{run_scrape, RunSettings};
use joblens_cli::sink::RecordSink;
use joblens_cli::state::RunState;
use joblens_core::{OutputRecord, SearchQuery};
use joblens_http::{
    Fetcher, HttpError, HttpTransport, PageRequest, PageResponse, RateLimiter, RetryPolicy,
};
use joblens_scanner::{Endpoints, JobScraper, ScrapeOptions};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const BASE: &str = "https://jobs.test";

/// Serves one search page with `cards` cards; everything else is a 404.
struct SearchPage {
    cards: u32,
}

#[async_trait]
impl HttpTransport for SearchPage {
    async fn get(&self, request: &PageRequest) -> Result<PageResponse, HttpError> {
        if request.url != format!("{BASE}/jobs/search") {
            return Ok(PageResponse::new(404, ""));
        }
        let cards: String = (1..=self.cards)
            .map(|id| {
                format!(
                    r#"<div class="job-search-card" data-entity-urn="urn:li:jobPosting:{id}">
                         <h3 class="base-search-card__title">Job {id}</h3></div>"#
                )
            })
            .collect();
        Ok(PageResponse::new(200, format!("<html><body>{cards}</body></html>")))
    }
}

/// Collects batches; optionally fails on one push.
#[derive(Default)]
struct RecordingSink {
    batches: Vec<Vec<String>>,
    fail_on_push: Option<usize>,
    pushes: usize,
}

impl RecordSink for RecordingSink {
    fn push(&mut self, batch: &[OutputRecord]) -> Result<()> {
        self.pushes += 1;
        if self.fail_on_push == Some(self.pushes) {
            bail!("dataset unavailable");
        }
        self.batches
            .push(batch.iter().map(|r| r.job_id.clone()).collect());
        Ok(())
    }
}

fn scraper(cards: u32, max_results: usize) -> JobScraper {
    let fetcher = Fetcher::new(
        Arc::new(SearchPage { cards }),
        Arc::new(RateLimiter::new(Duration::ZERO)),
        RetryPolicy::default(),
    );
    JobScraper::new(
        Arc::new(fetcher),
        Endpoints::new(BASE),
        ScrapeOptions {
            fetch_job_details: false,
            max_results,
        },
    )
}

fn settings(max_results: usize, batch_size: usize, state_path: Option<&Path>) -> RunSettings<'_> {
    RunSettings {
        max_results,
        batch_size,
        state_path,
        tier: Tier::Local,
        free_tier_limit: 25,
    }
}

fn query() -> SearchQuery {
    SearchQuery {
        keywords: Some("rust".to_string()),
        ..SearchQuery::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_records_delivered_in_batches() {
    let scraper = scraper(7, 100);
    let mut sink = RecordingSink::default();
    let mut state = RunState::default();

    let settings = settings(100, 3, None);
    let report = run_scrape(&scraper, &query(), &mut sink, &mut state, &settings).await;

    assert_eq!(report.scraped, 7);
    assert_eq!(report.failed, 0);
    assert_eq!(report.message, "Done. Scraped 7 jobs.");
    let sizes: Vec<usize> = sink.batches.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![3, 3, 1]);
    assert_eq!(state.scraped, 7);
}

#[tokio::test(start_paused = true)]
async fn test_resume_counts_toward_cap_and_persists() {
    let dir = TempDir::new().expect("temp dir");
    let state_path = dir.path().join("state.json");

    let mut state = RunState {
        scraped: 8,
        ..RunState::default()
    };
    let scraper = scraper(25, 10);
    let mut sink = RecordingSink::default();

    let report = run_scrape(
        &scraper,
        &query(),
        &mut sink,
        &mut state,
        &settings(10, 25, Some(&state_path)),
    )
    .await;

    assert_eq!(report.scraped, 10);
    assert_eq!(sink.batches, vec![vec!["1".to_string(), "2".to_string()]]);

    let saved = RunState::load(&state_path).expect("load state");
    assert_eq!(saved.scraped, 10);
    assert!(saved.updated_at.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_cap_already_reached_fetches_nothing() {
    let mut state = RunState {
        scraped: 10,
        ..RunState::default()
    };
    let scraper = scraper(25, 10);
    let mut sink = RecordingSink::default();

    let settings = settings(10, 25, None);
    let report = run_scrape(&scraper, &query(), &mut sink, &mut state, &settings).await;

    assert_eq!(report.scraped, 10);
    assert!(sink.batches.is_empty());
    assert_eq!(sink.pushes, 0);
}

#[tokio::test(start_paused = true)]
async fn test_sink_failure_is_counted_and_buffer_flushed() {
    let scraper = scraper(10, 100);
    let mut sink = RecordingSink {
        fail_on_push: Some(2),
        ..RecordingSink::default()
    };
    let mut state = RunState::default();

    let settings = settings(100, 3, None);
    let report = run_scrape(&scraper, &query(), &mut sink, &mut state, &settings).await;

    assert_eq!(report.failed, 1);
    assert_eq!(state.failed, 1);
    // Second batch failed once, then went out on the final flush; no more records pulled
    assert_eq!(
        sink.batches,
        vec![
            vec!["1".to_string(), "2".to_string(), "3".to_string()],
            vec!["4".to_string(), "5".to_string(), "6".to_string()],
        ]
    );
    assert_eq!(report.scraped, 6);
    assert_eq!(
        report.message,
        "Done. Scraped 6 jobs. 1 errors encountered."
    );
}

#[tokio::test(start_paused = true)]
async fn test_free_tier_message() {
    let scraper = scraper(30, 25);
    let mut sink = RecordingSink::default();
    let mut state = RunState::default();
    let settings = RunSettings {
        tier: Tier::Free,
        ..settings(25, 25, None)
    };

    let report = run_scrape(&scraper, &query(), &mut sink, &mut state, &settings).await;

    assert_eq!(report.scraped, 25);
    assert!(report
        .message
        .ends_with("Free tier limit (25) reached. Subscribe for unlimited results."));
}

#[tokio::test(start_paused = true)]
async fn test_report_failed_includes_earlier_runs() {
    let scraper = scraper(3, 100);
    let mut sink = RecordingSink::default();
    let mut state = RunState {
        failed: 2,
        ..RunState::default()
    };

    let settings = settings(100, 25, None);
    let report = run_scrape(&scraper, &query(), &mut sink, &mut state, &settings).await;

    assert_eq!(report.scraped, 3);
    assert_eq!(report.failed, 2);
    assert_eq!(report.message, "Done. Scraped 3 jobs. 2 errors encountered.");
}
