use super::element_text;
use super::rules::{first_value, Extract, Locator, Rule};
use joblens_core::JobDetail;
use scraper::Html;

const DESCRIPTION: &[Rule] = &[Rule::new(
    Locator::tag("div").class_contains("show-more-less-html__markup"),
    Extract::Lines,
)];

const SALARY: &[Rule] = &[Rule::new(
    Locator::tag("div").class_contains("salary"),
    Extract::Text,
)];

const CRITERIA_LIST: Locator = Locator::tag("ul").class_contains("description__job-criteria-list");
const CRITERIA_ITEM: Locator = Locator::tag("li");
const CRITERIA_HEADING: Locator = Locator::tag("h3");
const CRITERIA_VALUE: Locator =
    Locator::tag("span").class_contains("description__job-criteria-text");

const APPLICANTS: &[Rule] = &[
    Rule::new(
        Locator::tag("figcaption").class_contains("num-applicants"),
        Extract::Text,
    ),
    Rule::new(
        Locator::tag("span").class_contains("num-applicants"),
        Extract::Text,
    ),
];

/// Criteria field a heading routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Criterion {
    Seniority,
    EmploymentType,
    JobFunction,
    Industries,
}

/// Heading keyword routes, checked in order; the first keyword found in the
/// lower-cased heading decides the field.
const CRITERIA_ROUTES: &[(&str, Criterion)] = &[
    ("seniority", Criterion::Seniority),
    ("employment", Criterion::EmploymentType),
    ("type", Criterion::EmploymentType),
    ("function", Criterion::JobFunction),
    ("industr", Criterion::Industries),
];

impl Criterion {
    fn route(heading: &str) -> Option<Self> {
        CRITERIA_ROUTES
            .iter()
            .find(|(keyword, _)| heading.contains(keyword))
            .map(|&(_, criterion)| criterion)
    }

    fn slot(self, detail: &mut JobDetail) -> &mut Option<String> {
        match self {
            Self::Seniority => &mut detail.seniority_level,
            Self::EmploymentType => &mut detail.employment_type,
            Self::JobFunction => &mut detail.job_function,
            Self::Industries => &mut detail.industries,
        }
    }
}

/// Parses a job detail page into enrichment fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetailExtractor;

impl DetailExtractor {
    /// Extract whatever enrichment fields the page carries.
    ///
    /// The salary is only looked up when `salary_known` is false.
    pub fn extract(html: &str, salary_known: bool) -> JobDetail {
        let document = Html::parse_document(html);
        let root = document.root_element();

        let mut detail = JobDetail {
            description: first_value(DESCRIPTION, root),
            applicant_count: first_value(APPLICANTS, root),
            ..JobDetail::default()
        };

        if !salary_known {
            detail.salary = first_value(SALARY, root);
        }

        if let Some(list) = CRITERIA_LIST.first_in(root) {
            for item in CRITERIA_ITEM.all_in(list) {
                let (Some(heading), Some(value)) =
                    (CRITERIA_HEADING.first_in(item), CRITERIA_VALUE.first_in(item))
                else {
                    continue;
                };

                let heading = element_text(heading).to_lowercase();
                let value = element_text(value);
                if value.is_empty() {
                    continue;
                }

                // Later items overwrite earlier ones on the same route
                if let Some(criterion) = Criterion::route(&heading) {
                    *criterion.slot(&mut detail) = Some(value);
                }
            }
        }

        detail
    }
}
