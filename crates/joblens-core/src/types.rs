//! Shared types used across the Joblens workspace.
//!
//! Search input, the job records produced by a scrape, and the flat output
//! shape handed to record sinks.

use crate::error::JoblensError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Query-string parameters sent to the search endpoints.
///
/// Ordered so that the same query always serializes the same way.
pub type QueryParams = BTreeMap<String, String>;

/// Marker preceding the posting identifier inside an entity URN.
const JOB_POSTING_MARKER: &str = "jobPosting:";

/// Newtype for the site's opaque job posting identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(String);

impl JobId {
    /// Create a new `JobId` from a string.
    ///
    /// # Errors
    /// Returns error if the ID is empty after trimming.
    pub fn new(id: impl Into<String>) -> Result<Self, JoblensError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(JoblensError::Validation(
                "invalid job ID: must not be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Extract the identifier from an entity URN such as
    /// `urn:li:jobPosting:3812345678`.
    ///
    /// Returns `None` when the URN carries no `jobPosting:` segment or
    /// nothing follows it.
    #[must_use]
    pub fn from_urn(urn: &str) -> Option<Self> {
        let (_, id) = urn.rsplit_once(JOB_POSTING_MARKER)?;
        Self::new(id).ok()
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Posted-date filter buckets understood by the search endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePosted {
    /// Posted within the last 24 hours
    Past24Hours,
    /// Posted within the last week
    PastWeek,
    /// Posted within the last month
    PastMonth,
}

impl DatePosted {
    /// Parse a bucket name (`past_24_hours`, `past_week`, `past_month`).
    ///
    /// Unknown names yield `None`; the filter is then simply not sent.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "past_24_hours" => Some(Self::Past24Hours),
            "past_week" => Some(Self::PastWeek),
            "past_month" => Some(Self::PastMonth),
            _ => None,
        }
    }

    /// The "seconds ago" code sent as the `f_TPR` parameter.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Past24Hours => "r86400",
            Self::PastWeek => "r604800",
            Self::PastMonth => "r2592000",
        }
    }
}

/// Immutable set of search filters for one scrape.
///
/// Unset or empty fields are left out of the request entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text keywords
    pub keywords: Option<String>,
    /// Location text
    pub location: Option<String>,
    /// Geographic region identifier
    pub geo_id: Option<String>,
    /// Posted-date bucket
    pub date_posted: Option<DatePosted>,
    /// Job type code (`F`, `P`, `C`, ...)
    pub job_type: Option<String>,
    /// Experience level code
    pub experience_level: Option<String>,
    /// Work type code (on-site, remote, hybrid)
    pub work_type: Option<String>,
    /// Salary bucket code
    pub salary: Option<String>,
}

impl SearchQuery {
    /// Check that the query names at least a keyword or a location.
    ///
    /// # Errors
    /// Returns a validation error when both are missing or blank.
    pub fn validate(&self) -> Result<(), JoblensError> {
        if is_blank(self.keywords.as_deref()) && is_blank(self.location.as_deref()) {
            return Err(JoblensError::Validation(
                "At least one of 'keywords' or 'location' is required.".to_string(),
            ));
        }
        Ok(())
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Summary of one job, extracted from a search-results card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    /// Posting identifier
    pub job_id: JobId,
    /// Job title
    pub title: Option<String>,
    /// Hiring company name
    pub company: Option<String>,
    /// Company profile URL, query string stripped
    pub company_url: Option<String>,
    /// Location text
    pub location: Option<String>,
    /// Posted date as displayed ("2 days ago")
    pub posted_date: Option<String>,
    /// Posted date in machine-readable form ("2024-01-15")
    pub posted_date_timestamp: Option<String>,
    /// Salary text shown on the card
    pub salary: Option<String>,
    /// Canonical listing URL
    pub url: String,
}

impl JobSummary {
    /// Create a summary with only the identifier and listing URL set.
    #[must_use]
    pub fn new(job_id: JobId, url: impl Into<String>) -> Self {
        Self {
            job_id,
            title: None,
            company: None,
            company_url: None,
            location: None,
            posted_date: None,
            posted_date_timestamp: None,
            salary: None,
            url: url.into(),
        }
    }
}

/// Enrichment fields taken from a job's detail page.
///
/// Every field is independently optional; `None` means the page didn't have it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDetail {
    /// Full description, line breaks preserved
    pub description: Option<String>,
    /// Salary text, only looked up when the card had none
    pub salary: Option<String>,
    /// Seniority level criterion
    pub seniority_level: Option<String>,
    /// Employment type criterion
    pub employment_type: Option<String>,
    /// Job function criterion
    pub job_function: Option<String>,
    /// Industries criterion
    pub industries: Option<String>,
    /// Applicant count text
    pub applicant_count: Option<String>,
}

impl JobDetail {
    /// Whether no field was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A summary merged with its (possibly empty) detail fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Card data
    pub summary: JobSummary,
    /// Detail-page data
    pub detail: JobDetail,
}

impl JobRecord {
    /// Wrap a summary that was not enriched.
    #[must_use]
    pub fn from_summary(summary: JobSummary) -> Self {
        Self {
            summary,
            detail: JobDetail::default(),
        }
    }

    /// Merge detail-page fields onto a summary.
    ///
    /// A detail-page salary only fills in a salary the card lacked.
    #[must_use]
    pub fn merge(mut summary: JobSummary, mut detail: JobDetail) -> Self {
        if summary.salary.is_none() {
            summary.salary = detail.salary.take();
        } else {
            detail.salary = None;
        }
        Self { summary, detail }
    }

    /// The posting identifier.
    #[must_use]
    pub fn job_id(&self) -> &JobId {
        &self.summary.job_id
    }
}

/// Flat record in the shape delivered to record sinks.
///
/// Absent values become empty strings; field order is fixed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRecord {
    /// Posting identifier
    pub job_id: String,
    /// Job title
    pub title: String,
    /// Hiring company name
    pub company: String,
    /// Company profile URL
    pub company_url: String,
    /// Location text
    pub location: String,
    /// Posted date as displayed
    pub posted_date: String,
    /// Posted date, machine-readable
    pub posted_date_timestamp: String,
    /// Salary text
    pub salary: String,
    /// Listing URL
    pub url: String,
    /// Full description
    pub description: String,
    /// Seniority level
    pub seniority_level: String,
    /// Employment type
    pub employment_type: String,
    /// Job function
    pub job_function: String,
    /// Industries
    pub industries: String,
    /// Applicant count
    pub applicant_count: String,
}

impl From<JobRecord> for OutputRecord {
    fn from(record: JobRecord) -> Self {
        let JobRecord { summary, detail } = record;
        Self {
            job_id: summary.job_id.0,
            title: summary.title.unwrap_or_default(),
            company: summary.company.unwrap_or_default(),
            company_url: summary.company_url.unwrap_or_default(),
            location: summary.location.unwrap_or_default(),
            posted_date: summary.posted_date.unwrap_or_default(),
            posted_date_timestamp: summary.posted_date_timestamp.unwrap_or_default(),
            salary: summary.salary.or(detail.salary).unwrap_or_default(),
            url: summary.url,
            description: detail.description.unwrap_or_default(),
            seniority_level: detail.seniority_level.unwrap_or_default(),
            employment_type: detail.employment_type.unwrap_or_default(),
            job_function: detail.job_function.unwrap_or_default(),
            industries: detail.industries.unwrap_or_default(),
            applicant_count: detail.applicant_count.unwrap_or_default(),
        }
    }
}

/// Wrapper around `chrono::DateTime<Utc>` for consistent timestamp handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp representing the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Format as RFC3339 string.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
