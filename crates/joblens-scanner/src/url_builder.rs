use joblens_core::{JobId, QueryParams, SearchQuery};

/// Cards on the primary search page; also the first secondary offset.
pub const PRIMARY_PAGE_SIZE: usize = 25;

/// Cards per guest-API page; the offset stride between secondary fetches.
pub const SECONDARY_PAGE_SIZE: usize = 10;

/// Offset at which the site stops serving pages (answers 400).
pub const UPSTREAM_CEILING: usize = 1000;

/// Offset parameter understood by the guest API.
pub const OFFSET_PARAM: &str = "start";

const DEFAULT_BASE_URL: &str = "https://www.linkedin.com";

/// URLs of the three page shapes a scrape touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Primary search page.
    pub fn search_url(&self) -> String {
        format!("{}/jobs/search", self.base_url)
    }

    /// Secondary (guest API) pagination endpoint.
    pub fn guest_api_url(&self) -> String {
        format!(
            "{}/jobs-guest/jobs/api/seeMoreJobPostings/search",
            self.base_url
        )
    }

    /// Detail page, which doubles as the canonical listing URL.
    pub fn job_view_url(&self, job_id: &JobId) -> String {
        format!("{}/jobs/view/{}", self.base_url, job_id)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Build the search parameter set, leaving out every unset or empty filter.
pub fn build_search_params(query: &SearchQuery) -> QueryParams {
    let mut params = QueryParams::new();

    let text_filters = [
        ("keywords", &query.keywords),
        ("location", &query.location),
        ("geoId", &query.geo_id),
        ("f_JT", &query.job_type),
        ("f_E", &query.experience_level),
        ("f_WT", &query.work_type),
        ("f_SB2", &query.salary),
    ];
    for (key, value) in text_filters {
        if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            params.insert(key.to_string(), value.to_string());
        }
    }

    if let Some(bucket) = query.date_posted {
        params.insert("f_TPR".to_string(), bucket.code().to_string());
    }

    params
}

/// Copy of `params` with the pagination offset set.
pub fn with_offset(params: &QueryParams, offset: usize) -> QueryParams {
    let mut page_params = params.clone();
    page_params.insert(OFFSET_PARAM.to_string(), offset.to_string());
    page_params
}

#[cfg(test)]
mod tests {
    use super::*;
    use joblens_core::DatePosted;

    #[test]
    fn test_build_params_omits_unset_fields() {
        let query = SearchQuery {
            keywords: Some("python developer".to_string()),
            location: Some(String::new()),
            ..SearchQuery::default()
        };

        let params = build_search_params(&query);
        assert_eq!(params.len(), 1);
        assert_eq!(params["keywords"], "python developer");
        assert!(!params.contains_key("location"));
    }

    #[test]
    fn test_build_params_full_vocabulary() {
        let query = SearchQuery {
            keywords: Some("data engineer".to_string()),
            location: Some("Remote".to_string()),
            geo_id: Some("103644278".to_string()),
            date_posted: Some(DatePosted::PastWeek),
            job_type: Some("F".to_string()),
            experience_level: Some("4".to_string()),
            work_type: Some("2".to_string()),
            salary: Some("5".to_string()),
        };

        let params = build_search_params(&query);
        let keys: Vec<&str> = params.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["f_E", "f_JT", "f_SB2", "f_TPR", "f_WT", "geoId", "keywords", "location"]
        );
        assert_eq!(params["f_TPR"], "r604800");
        assert_eq!(params["geoId"], "103644278");
    }

    #[test]
    fn test_with_offset() {
        let mut params = QueryParams::new();
        params.insert("keywords".to_string(), "rust".to_string());

        let page = with_offset(&params, 35);
        assert_eq!(page["start"], "35");
        assert_eq!(page["keywords"], "rust");
        assert!(!params.contains_key("start"));
    }

    #[test]
    fn test_endpoints() {
        let endpoints = Endpoints::new("http://127.0.0.1:8080/");
        let id = JobId::new("3812345678").expect("valid job ID");

        assert_eq!(endpoints.search_url(), "http://127.0.0.1:8080/jobs/search");
        assert_eq!(
            endpoints.guest_api_url(),
            "http://127.0.0.1:8080/jobs-guest/jobs/api/seeMoreJobPostings/search"
        );
        assert_eq!(
            endpoints.job_view_url(&id),
            "http://127.0.0.1:8080/jobs/view/3812345678"
        );
        assert_eq!(
            Endpoints::default().search_url(),
            "https://www.linkedin.com/jobs/search"
        );
    }
}
