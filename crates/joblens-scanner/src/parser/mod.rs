//! HTML extraction for search-result pages and job detail pages.
//!
//! Parsing is synchronous and owns its `Html` document for the duration of
//! one call; only owned records leave this module.

mod cards;
mod detail;
pub mod rules;
mod total;

pub use cards::{CardExtractor, ResultsPage};
pub use detail::DetailExtractor;
pub use total::parse_total_results;

use scraper::ElementRef;

/// Text content with runs of whitespace collapsed to single spaces.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text content with each non-blank text fragment on its own line.
pub(crate) fn element_lines(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Drop the query string (tracking parameters) from a URL.
pub(crate) fn strip_query(href: &str) -> String {
    href.split('?').next().unwrap_or_default().trim().to_string()
}
