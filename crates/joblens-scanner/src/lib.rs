//! Joblens Scanner - search-result pagination and listing extraction.
//!
//! This crate drives a scrape from a [`SearchQuery`](joblens_core::SearchQuery)
//! to a lazy stream of merged job records. It fetches the primary search page,
//! follows the guest pagination endpoint, and optionally enriches each card
//! from its detail page, one request at a time through a shared
//! [`Fetcher`](joblens_http::Fetcher).
//!
//! # Features
//!
//! - Two-endpoint pagination with estimate, ceiling and result-cap termination
//! - Declarative, ordered extraction rules per field with markup-drift fallbacks
//! - Pull-driven output: nothing is fetched ahead of the consumer
//!
//! # Example
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use joblens_scanner::{Endpoints, JobScraper, ScrapeOptions};
//! use std::sync::Arc;
//!
//! let scraper = JobScraper::new(
//!     Arc::new(fetcher),
//!     Endpoints::default(),
//!     ScrapeOptions { fetch_job_details: true, max_results: 50 },
//! );
//!
//! let mut records = scraper.scrape(&query);
//! while let Some(record) = records.next().await {
//!     println!("{}", record.job_id());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod orchestrator;
#[allow(missing_docs)]
pub mod parser;
#[allow(missing_docs)]
pub mod url_builder;

// Re-export commonly used types
pub use orchestrator::{JobScraper, ScrapeOptions};
pub use parser::{CardExtractor, DetailExtractor, ResultsPage};
pub use url_builder::{build_search_params, Endpoints};
