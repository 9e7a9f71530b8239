//! Joblens Core - Foundation crate for the Joblens job-listing scraper.
//!
//! This crate provides the shared record types, error handling and
//! configuration management that the fetch, scanner and CLI crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Search queries and job records (`SearchQuery`, `JobId`, `JobSummary`, `JobDetail`)
//!
//! # Example
//!
//! ```rust
//! use joblens_core::{AppConfig, SearchQuery};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert_eq!(config.http.max_retries, 3);
//!
//! let query = SearchQuery {
//!     keywords: Some("rust developer".to_string()),
//!     ..SearchQuery::default()
//! };
//! query.validate()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, HttpConfig, OutputConfig, ScrapingConfig};
pub use error::{ConfigError, ConfigResult, JoblensError, Result};
pub use types::{
    DatePosted, JobDetail, JobId, JobRecord, JobSummary, OutputRecord, QueryParams, SearchQuery,
    Timestamp,
};
