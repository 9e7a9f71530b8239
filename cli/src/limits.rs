//! Result caps for hosted runs.

/// Who is running the scrape, as reported by the hosting platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Not on the hosting platform; no cap
    Local,
    /// Hosted, non-paying user; capped
    Free,
    /// Hosted, paying user; no cap
    Paying,
}

impl Tier {
    /// Detect the tier from `APIFY_IS_AT_HOME` and `APIFY_USER_IS_PAYING`.
    pub fn detect<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str| lookup(key).is_some_and(|v| v.trim() == "1");

        match (flag("APIFY_IS_AT_HOME"), flag("APIFY_USER_IS_PAYING")) {
            (false, _) => Self::Local,
            (true, true) => Self::Paying,
            (true, false) => Self::Free,
        }
    }

    /// Detect the tier from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::detect(|key| std::env::var(key).ok())
    }

    /// The result cap in effect for `requested` results.
    #[must_use]
    pub fn effective_max(self, requested: usize, free_tier_limit: usize) -> usize {
        match self {
            Self::Free => requested.min(free_tier_limit),
            Self::Local | Self::Paying => requested,
        }
    }

    /// Whether the free-tier cap was hit after `scraped` results.
    #[must_use]
    pub fn limit_reached(self, scraped: usize, free_tier_limit: usize) -> bool {
        self == Self::Free && scraped >= free_tier_limit
    }
}
