//! Scrape orchestration: primary page, guest-API pagination, enrichment.
//!
//! [`JobScraper::scrape`] returns a lazy stream. Each poll performs at most
//! the fetches needed for the next record; dropping the stream stops all
//! work, since nothing runs ahead of the consumer.

use crate::parser::{CardExtractor, DetailExtractor, ResultsPage};
use crate::url_builder::{
    build_search_params, with_offset, Endpoints, PRIMARY_PAGE_SIZE, SECONDARY_PAGE_SIZE,
    UPSTREAM_CEILING,
};
use async_stream::stream;
use futures::stream::BoxStream;
use joblens_core::{JobRecord, JobSummary, QueryParams, SearchQuery};
use joblens_http::Fetcher;
use std::sync::Arc;

/// Per-scrape knobs supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeOptions {
    /// Fetch each posting's detail page and merge its fields
    pub fetch_job_details: bool,
    /// Upper bound on emitted records
    pub max_results: usize,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            fetch_job_details: true,
            max_results: 100,
        }
    }
}

/// Why secondary pagination stopped before fetching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    UpstreamCeiling,
    EstimateReached,
}

/// Offset into the result set for the next secondary page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PageCursor {
    offset: usize,
}

impl PageCursor {
    /// Positioned at the primary page.
    fn new() -> Self {
        Self { offset: 0 }
    }

    /// Skip the rows the primary page already covered.
    fn advance_past_primary(&mut self) {
        self.offset = PRIMARY_PAGE_SIZE;
    }

    fn advance(&mut self) {
        self.offset += SECONDARY_PAGE_SIZE;
    }

    /// Whether another secondary fetch is off limits.
    fn stop_reason(&self, total_results: Option<usize>) -> Option<StopReason> {
        if self.offset >= UPSTREAM_CEILING {
            return Some(StopReason::UpstreamCeiling);
        }
        match total_results {
            Some(total) if self.offset >= total => Some(StopReason::EstimateReached),
            _ => None,
        }
    }
}

/// Drives one search through both result endpoints.
pub struct JobScraper {
    fetcher: Arc<Fetcher>,
    endpoints: Endpoints,
    cards: CardExtractor,
    options: ScrapeOptions,
}

impl JobScraper {
    /// Scraper over `endpoints`, fetching every page through `fetcher`.
    pub fn new(fetcher: Arc<Fetcher>, endpoints: Endpoints, options: ScrapeOptions) -> Self {
        Self {
            cards: CardExtractor::new(endpoints.clone()),
            fetcher,
            endpoints,
            options,
        }
    }

    /// Stream merged records for `query`, at most `max_results` of them.
    ///
    /// The stream ends early, without error, when the primary page cannot be
    /// fetched, a page has no cards, a secondary fetch fails, or the offset
    /// reaches the total estimate or the upstream ceiling. Its length is
    /// best-effort.
    pub fn scrape(&self, query: &SearchQuery) -> BoxStream<'_, JobRecord> {
        let params = build_search_params(query);
        let max_results = self.options.max_results;

        Box::pin(stream! {
            if max_results == 0 {
                return;
            }

            tracing::info!("Starting job search: {:?}", params);

            let search_url = self.endpoints.search_url();
            let html = match self.fetcher.fetch_html(&search_url, &params).await {
                Some(html) => html,
                None => {
                    tracing::error!("Failed to fetch first search page");
                    return;
                }
            };

            let ResultsPage { total_results, cards } = self.cards.extract_page(&html);
            match total_results {
                Some(total) => tracing::info!("Total results available: {}", total),
                None => tracing::info!("Could not determine total results count"),
            }
            tracing::info!("First page: found {} job cards", cards.len());
            if cards.is_empty() {
                tracing::info!("No job cards found on first page");
                return;
            }

            let mut emitted = 0usize;
            for summary in cards {
                if emitted >= max_results {
                    return;
                }
                yield self.enrich(summary).await;
                emitted += 1;
            }

            let guest_url = self.endpoints.guest_api_url();
            let mut cursor = PageCursor::new();
            cursor.advance_past_primary();

            while emitted < max_results {
                match cursor.stop_reason(total_results) {
                    Some(StopReason::UpstreamCeiling) => {
                        tracing::info!("Reached pagination limit (start={})", UPSTREAM_CEILING);
                        break;
                    }
                    Some(StopReason::EstimateReached) => {
                        tracing::info!("Reached end of available results");
                        break;
                    }
                    None => {}
                }

                let page_params = with_offset(&params, cursor.offset);
                let html = match self.fetcher.fetch_html(&guest_url, &page_params).await {
                    Some(html) => html,
                    None => {
                        tracing::info!("No more results at start={}", cursor.offset);
                        break;
                    }
                };

                let cards = self.cards.extract(&html);
                if cards.is_empty() {
                    tracing::info!("No job cards found at start={}", cursor.offset);
                    break;
                }
                tracing::info!("Page start={}: found {} job cards", cursor.offset, cards.len());

                for summary in cards {
                    if emitted >= max_results {
                        return;
                    }
                    yield self.enrich(summary).await;
                    emitted += 1;
                }

                cursor.advance();
            }
        })
    }

    /// Merge detail-page fields onto a summary when enrichment is enabled.
    ///
    /// A detail page that cannot be fetched leaves the summary as it was.
    async fn enrich(&self, summary: JobSummary) -> JobRecord {
        if !self.options.fetch_job_details {
            return JobRecord::from_summary(summary);
        }

        let url = self.endpoints.job_view_url(&summary.job_id);
        match self.fetcher.fetch_html(&url, &QueryParams::new()).await {
            Some(html) => {
                let detail = DetailExtractor::extract(&html, summary.salary.is_some());
                JobRecord::merge(summary, detail)
            }
            None => {
                tracing::warn!("Failed to fetch details for job {}", summary.job_id);
                JobRecord::from_summary(summary)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_sequence() {
        let mut cursor = PageCursor::new();
        assert_eq!(cursor.offset, 0);

        cursor.advance_past_primary();
        assert_eq!(cursor.offset, 25);

        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.offset, 45);
    }

    #[test]
    fn test_cursor_stop_reasons() {
        let mut cursor = PageCursor::new();
        cursor.advance_past_primary();

        assert_eq!(cursor.stop_reason(None), None);
        assert_eq!(cursor.stop_reason(Some(100)), None);
        assert_eq!(cursor.stop_reason(Some(25)), Some(StopReason::EstimateReached));
        assert_eq!(cursor.stop_reason(Some(10)), Some(StopReason::EstimateReached));

        while cursor.offset < UPSTREAM_CEILING {
            cursor.advance();
        }
        assert_eq!(cursor.offset, 1005);
        assert_eq!(cursor.stop_reason(None), Some(StopReason::UpstreamCeiling));
        // Ceiling is checked before the estimate
        assert_eq!(
            cursor.stop_reason(Some(5000)),
            Some(StopReason::UpstreamCeiling)
        );
    }

    #[test]
    fn test_default_options() {
        let options = ScrapeOptions::default();
        assert!(options.fetch_job_details);
        assert_eq!(options.max_results, 100);
    }
}
