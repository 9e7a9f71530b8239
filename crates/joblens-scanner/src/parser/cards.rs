use super::rules::{first_value, locate_first, Extract, Locator, Rule};
use super::{element_text, parse_total_results};
use crate::url_builder::Endpoints;
use joblens_core::{JobId, JobSummary};
use scraper::{ElementRef, Html};

const URN_ATTR: &str = "data-entity-urn";

/// Result cards carry this class on both endpoints when markup is current.
const CARD: Locator = Locator::tag("div").class_token("job-search-card");

/// Fallback discovery: list items wrapping an element that carries the URN.
const FALLBACK_ITEM: Locator = Locator::tag("li");
const FALLBACK_CARD: Locator = Locator::tag("div").with_attr(URN_ATTR);

const URN_CARRIER: Locator = Locator::any().with_attr(URN_ATTR);

const TITLE: &[Rule] = &[
    Rule::new(
        Locator::tag("h3").class_contains("base-search-card__title"),
        Extract::Text,
    ),
    Rule::new(Locator::tag("h3"), Extract::Text),
];

const COMPANY: &[Locator] = &[
    Locator::tag("h4").class_contains("base-search-card__subtitle"),
    Locator::tag("h4"),
];

/// Applied inside the located company element.
const COMPANY_URL: &[Rule] = &[Rule::new(Locator::tag("a"), Extract::Href)];

const LOCATION: &[Rule] = &[Rule::new(
    Locator::tag("span").class_contains("job-search-card__location"),
    Extract::Text,
)];

const POSTED: Locator = Locator::tag("time");

const SALARY: &[Rule] = &[Rule::new(
    Locator::tag("span").class_contains("job-search-card__salary"),
    Extract::Text,
)];

const LISTING_URL: &[Rule] = &[
    Rule::new(
        Locator::tag("a").class_contains("base-card__full-link"),
        Extract::Href,
    ),
    Rule::new(Locator::tag("a").href_contains("/jobs/view/"), Extract::Href),
];

/// Cards and the optional total-count hint from one results page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultsPage {
    pub total_results: Option<usize>,
    pub cards: Vec<JobSummary>,
}

/// Turns a search-results page (either endpoint) into job summaries.
#[derive(Debug, Clone, Default)]
pub struct CardExtractor {
    endpoints: Endpoints,
}

impl CardExtractor {
    pub fn new(endpoints: Endpoints) -> Self {
        Self { endpoints }
    }

    /// Cards in document order. Cards without an identifier are dropped;
    /// duplicates are kept.
    pub fn extract(&self, html: &str) -> Vec<JobSummary> {
        let document = Html::parse_document(html);
        self.extract_cards(&document)
    }

    /// Cards plus the total-results hint, parsing the document once.
    pub fn extract_page(&self, html: &str) -> ResultsPage {
        let document = Html::parse_document(html);
        ResultsPage {
            total_results: parse_total_results(&document),
            cards: self.extract_cards(&document),
        }
    }

    fn extract_cards(&self, document: &Html) -> Vec<JobSummary> {
        discover_cards(document)
            .into_iter()
            .filter_map(|card| self.parse_card(card))
            .collect()
    }

    fn parse_card(&self, card: ElementRef<'_>) -> Option<JobSummary> {
        let job_id = card_job_id(card)?;

        let url = first_value(LISTING_URL, card)
            .unwrap_or_else(|| self.endpoints.job_view_url(&job_id));
        let mut summary = JobSummary::new(job_id, url);

        summary.title = first_value(TITLE, card);

        if let Some(company) = locate_first(COMPANY, card) {
            let name = element_text(company);
            summary.company = (!name.is_empty()).then_some(name);
            summary.company_url = first_value(COMPANY_URL, company);
        }

        summary.location = first_value(LOCATION, card);

        if let Some(time) = POSTED.first_in(card) {
            summary.posted_date_timestamp = Extract::Attr("datetime").apply(time);
            summary.posted_date = Extract::Text.apply(time);
        }

        summary.salary = first_value(SALARY, card);

        Some(summary)
    }
}

/// Find card elements, tolerating markup drift.
///
/// The marker class is tried first; only when no element carries it are
/// generic list items scanned and unwrapped to their URN-carrying child.
fn discover_cards(document: &Html) -> Vec<ElementRef<'_>> {
    let root = document.root_element();

    let cards: Vec<_> = CARD.all_in(root).collect();
    if !cards.is_empty() {
        return cards;
    }

    FALLBACK_ITEM
        .all_in(root)
        .filter_map(|item| FALLBACK_CARD.first_in(item))
        .collect()
}

/// Identifier from the card's own URN, else from the first descendant carrying one.
fn card_job_id(card: ElementRef<'_>) -> Option<JobId> {
    if let Some(id) = card.value().attr(URN_ATTR).and_then(JobId::from_urn) {
        return Some(id);
    }
    URN_CARRIER
        .first_in(card)
        .and_then(|el| el.value().attr(URN_ATTR))
        .and_then(JobId::from_urn)
}
