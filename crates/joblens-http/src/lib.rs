//! Outbound HTML fetching for job-search pages.
//!
//! Provides a process-wide pacing gate, rotated browser identities and a
//! bounded retry policy on top of a pluggable HTTP transport.

pub mod error;
pub mod fetcher;
pub mod fingerprint;
pub mod rate_limit;
pub mod transport;

pub use error::{HttpError, Result};
pub use fetcher::{Fetcher, RetryPolicy, StatusAction};
pub use fingerprint::BrowserIdentity;
pub use rate_limit::RateLimiter;
pub use transport::{HttpTransport, PageRequest, PageResponse, ReqwestTransport};
