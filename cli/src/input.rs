//! Run input: the JSON document describing one search.

use anyhow::{Context, Result};
use joblens_core::{DatePosted, ScrapingConfig, SearchQuery};
use joblens_scanner::ScrapeOptions;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Proxy section of the run input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProxyConfiguration {
    /// Candidate proxy URLs; only the first is used
    pub proxy_urls: Vec<String>,
}

/// Search input, camelCase keys as delivered by the hosting harness.
///
/// Unknown keys are ignored. Blank strings are treated as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActorInput {
    pub keywords: Option<String>,
    pub location: Option<String>,
    pub geo_id: Option<String>,
    /// `past_24_hours`, `past_week` or `past_month`
    pub date_posted: Option<String>,
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    pub work_type: Option<String>,
    pub salary: Option<String>,
    pub fetch_job_details: Option<bool>,
    pub max_results: Option<usize>,
    pub proxy_configuration: Option<ProxyConfiguration>,
}

impl ActorInput {
    /// Parse an input document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid input JSON")
    }

    /// Read and parse an input document.
    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut json = String::new();
        reader
            .read_to_string(&mut json)
            .context("Failed to read input")?;
        Self::from_json(&json)
    }

    /// Search filters, with blank values dropped.
    ///
    /// An unrecognised `datePosted` bucket is dropped with a warning.
    #[must_use]
    pub fn to_query(&self) -> SearchQuery {
        let date_posted = non_blank(&self.date_posted).and_then(|name| {
            let bucket = DatePosted::from_name(&name);
            if bucket.is_none() {
                tracing::warn!("Ignoring unknown datePosted value '{}'", name);
            }
            bucket
        });

        SearchQuery {
            keywords: non_blank(&self.keywords),
            location: non_blank(&self.location),
            geo_id: non_blank(&self.geo_id),
            date_posted,
            job_type: non_blank(&self.job_type),
            experience_level: non_blank(&self.experience_level),
            work_type: non_blank(&self.work_type),
            salary: non_blank(&self.salary),
        }
    }

    /// Scrape options, falling back to configured defaults for unset values.
    #[must_use]
    pub fn options(&self, defaults: &ScrapingConfig) -> ScrapeOptions {
        ScrapeOptions {
            fetch_job_details: self.fetch_job_details.unwrap_or(defaults.fetch_job_details),
            max_results: self.max_results.unwrap_or(defaults.max_results),
        }
    }

    /// First non-blank proxy URL, if any.
    #[must_use]
    pub fn proxy_url(&self) -> Option<String> {
        self.proxy_configuration
            .as_ref()?
            .proxy_urls
            .iter()
            .map(|url| url.trim())
            .find(|url| !url.is_empty())
            .map(str::to_string)
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
