use super::element_text;
use super::rules::Locator;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

static RESULTS_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([\d,]+)\s+results?").expect("results phrase regex is hardcoded and valid")
});

/// How the count is written inside a located element.
#[derive(Debug, Clone, Copy)]
enum CountFormat {
    /// The whole text is the number, possibly with thousands separators.
    Bare,
    /// A phrase such as "1,234 results".
    ResultsPhrase,
    /// A number that may carry a trailing "+" ("1,000+").
    Capped,
}

/// Places the total result count has been seen, most reliable first.
const TOTAL_RESULTS: [(Locator, CountFormat); 3] = [
    (Locator::tag("code").with_id("totalResults"), CountFormat::Bare),
    (
        Locator::tag("div").class_token("results-context-header"),
        CountFormat::ResultsPhrase,
    ),
    (
        Locator::tag("span").class_token("results-context-header__job-count"),
        CountFormat::Capped,
    ),
];

/// Best-effort total result count from a primary search page.
///
/// The figure is only a hint for ending pagination early.
pub fn parse_total_results(document: &Html) -> Option<usize> {
    let root = document.root_element();
    TOTAL_RESULTS.iter().find_map(|(locator, format)| {
        let text = element_text(locator.first_in(root)?);
        parse_count(&text, *format)
    })
}

fn parse_count(text: &str, format: CountFormat) -> Option<usize> {
    match format {
        CountFormat::Bare => text.replace(',', "").trim().parse().ok(),
        CountFormat::ResultsPhrase => {
            let digits = RESULTS_PHRASE.captures(text)?.get(1)?.as_str().replace(',', "");
            digits.parse().ok()
        }
        CountFormat::Capped => text.replace([',', '+'], "").trim().parse().ok(),
    }
}
