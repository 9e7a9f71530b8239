//! Drives one scrape into a sink, keeping run state current.

use crate::limits::Tier;
use crate::sink::{BatchWriter, RecordSink};
use crate::state::RunState;
use futures::StreamExt;
use joblens_core::{OutputRecord, SearchQuery};
use joblens_scanner::JobScraper;
use std::path::Path;

/// Settings for delivering one run's records.
#[derive(Debug, Clone)]
pub struct RunSettings<'a> {
    /// Result cap after tier limits
    pub max_results: usize,
    /// Records per sink push
    pub batch_size: usize,
    /// Where to persist progress, if anywhere
    pub state_path: Option<&'a Path>,
    /// Hosting tier, for the final message
    pub tier: Tier,
    /// Cap applied to free-tier hosted runs
    pub free_tier_limit: usize,
}

/// Outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Total delivered, including records from earlier runs
    pub scraped: usize,
    /// Delivery failures, including earlier runs
    pub failed: usize,
    /// Final status message
    pub message: String,
}

/// Pull records from `scraper` into `sink` until the cap is reached.
///
/// The stored `scraped` count counts toward `max_results`. A sink failure
/// is recorded in `state.failed`, whatever is still buffered is flushed,
/// and the run ends.
pub async fn run_scrape(
    scraper: &JobScraper,
    query: &SearchQuery,
    sink: &mut dyn RecordSink,
    state: &mut RunState,
    settings: &RunSettings<'_>,
) -> RunReport {
    let max_results = settings.max_results;
    let mut count = state.scraped;
    let mut writer = BatchWriter::new(sink, settings.batch_size);

    if count >= max_results {
        tracing::info!("Result cap already reached by an earlier run ({} jobs)", count);
    } else {
        let mut records = scraper.scrape(query);
        let mut delivery_error = None;

        while count < max_results {
            let Some(record) = records.next().await else {
                break;
            };

            count += 1;
            state.scraped = count;

            match writer.push(OutputRecord::from(record)) {
                Ok(true) => {
                    tracing::info!("Scraped {}/{} jobs", count, max_results);
                    persist(state, settings.state_path);
                }
                Ok(false) => {}
                Err(e) => {
                    delivery_error = Some(e);
                    break;
                }
            }
        }

        let flushed = match delivery_error {
            Some(e) => Err(e),
            None => writer.flush(),
        };
        if let Err(e) = flushed {
            state.failed += 1;
            tracing::error!("Scraping error: {:#}", e);
            if let Err(e) = writer.flush() {
                tracing::error!("Failed to deliver {} buffered records: {:#}", writer.pending(), e);
            }
        }
    }

    persist(state, settings.state_path);

    let message = final_message(count, state.failed, settings);
    tracing::info!("{}", message);

    RunReport {
        scraped: count,
        failed: state.failed,
        message,
    }
}

fn persist(state: &mut RunState, path: Option<&Path>) {
    if let Some(path) = path {
        if let Err(e) = state.save(path) {
            tracing::warn!("Failed to save run state: {:#}", e);
        }
    }
}

fn final_message(count: usize, failed: usize, settings: &RunSettings<'_>) -> String {
    let mut msg = format!("Done. Scraped {count} jobs.");
    if failed > 0 {
        msg.push_str(&format!(" {failed} errors encountered."));
    }
    if settings.tier.limit_reached(count, settings.free_tier_limit) {
        msg.push_str(&format!(
            " Free tier limit ({}) reached. Subscribe for unlimited results.",
            settings.free_tier_limit
        ));
    }
    msg
}
