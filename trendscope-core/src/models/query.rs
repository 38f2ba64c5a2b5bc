//! Query and identifier types.
//!
//! - [`TimeRange`] - Trending window (daily, weekly, monthly)
//! - [`LanguageFilter`] - Language slug or "all"
//! - [`TrendingQuery`] - Parameters of one trending scrape (also the cache key)
//! - [`RepoId`] - `owner/repo` identifier with canonical URL

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::CoreError;

/// Base URL every canonical repository URL starts with.
pub const GITHUB_BASE_URL: &str = "https://github.com";

// ============================================================================
// Time Range
// ============================================================================

/// Time window of a trending page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    /// Stars gained today.
    #[default]
    Daily,
    /// Stars gained this week.
    Weekly,
    /// Stars gained this month.
    Monthly,
}

impl TimeRange {
    /// Returns all time ranges.
    pub fn all() -> &'static [TimeRange] {
        &[Self::Daily, Self::Weekly, Self::Monthly]
    }

    /// Value of the `since` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Phrase GitHub uses next to the star delta (e.g. "stars today").
    pub fn period_phrase(&self) -> &'static str {
        match self {
            Self::Daily => "today",
            Self::Weekly => "this week",
            Self::Monthly => "this month",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" | "today" => Ok(Self::Daily),
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            other => Err(CoreError::InvalidTimeRange(other.to_string())),
        }
    }
}

// ============================================================================
// Language Filter
// ============================================================================

/// Language filter of a trending page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageFilter {
    /// All languages.
    #[default]
    All,
    /// A single language, stored as GitHub's URL slug (e.g. `c++`, `rust`).
    Language(String),
}

impl LanguageFilter {
    /// Parses a user-supplied filter; empty or "all" means no filter.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Language(trimmed.to_lowercase().replace(' ', "-"))
        }
    }

    /// Returns the language slug, or `None` for all languages.
    pub fn slug(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Language(slug) => Some(slug),
        }
    }

    /// Returns true if a display language (e.g. "C++") matches this filter.
    pub fn matches(&self, language: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Language(slug) => language
                .is_some_and(|l| Self::parse(l).slug() == Some(slug.as_str())),
        }
    }
}

impl fmt::Display for LanguageFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug().unwrap_or("all"))
    }
}

// ============================================================================
// Trending Query
// ============================================================================

/// Parameters of one trending scrape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TrendingQuery {
    /// Language filter.
    pub language: LanguageFilter,
    /// Time window.
    pub time_range: TimeRange,
}

impl TrendingQuery {
    /// Creates a new query.
    pub fn new(language: LanguageFilter, time_range: TimeRange) -> Self {
        Self {
            language,
            time_range,
        }
    }

    /// Builds the trending page URL relative to `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');
        match self.language.slug() {
            Some(slug) => format!(
                "{base}/trending/{}?since={}",
                encode_slug(slug),
                self.time_range
            ),
            None => format!("{base}/trending?since={}", self.time_range),
        }
    }
}

/// Percent-encodes the characters GitHub slugs may carry (`c++`, `c#`).
fn encode_slug(slug: &str) -> String {
    let mut out = String::with_capacity(slug.len());
    for ch in slug.chars() {
        match ch {
            '+' => out.push_str("%2B"),
            '#' => out.push_str("%23"),
            ' ' => out.push('-'),
            _ => out.push(ch),
        }
    }
    out
}

impl fmt::Display for TrendingQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.language, self.time_range)
    }
}

// ============================================================================
// Repository Identifier
// ============================================================================

/// A GitHub repository identifier (`owner/name`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepoId {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl RepoId {
    /// Creates an identifier from validated parts.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidRepository` if either part is not a valid
    /// GitHub path segment.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self, CoreError> {
        let owner = owner.into();
        let name = name.into();
        let name = name.strip_suffix(".git").map(str::to_string).unwrap_or(name);

        if !is_valid_segment(&owner) || !is_valid_segment(&name) {
            return Err(CoreError::InvalidRepository(format!("{owner}/{name}")));
        }
        Ok(Self { owner, name })
    }

    /// Parses `owner/repo`, `/owner/repo`, `github.com/owner/repo`, or any
    /// `http(s)://github.com/owner/repo/...` URL.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidRepository` when no owner/name pair can be
    /// found or the host is not GitHub.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let trimmed = input.trim();
        let invalid = || CoreError::InvalidRepository(trimmed.to_string());

        let path = if trimmed.contains("://") {
            let url = Url::parse(trimmed).map_err(|_| invalid())?;
            let host = url.host_str().ok_or_else(invalid)?;
            if !is_github_host(host) {
                return Err(invalid());
            }
            url.path().to_string()
        } else {
            let lower = trimmed.to_ascii_lowercase();
            let rest = ["www.github.com/", "github.com/"]
                .iter()
                .find(|prefix| lower.starts_with(*prefix))
                .map_or(trimmed, |prefix| &trimmed[prefix.len()..]);
            rest.split(['?', '#']).next().unwrap_or_default().to_string()
        };

        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let owner = segments.next().ok_or_else(invalid)?;
        let name = segments.next().ok_or_else(invalid)?;
        Self::new(owner, name).map_err(|_| invalid())
    }

    /// Returns `owner/name`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Returns the canonical URL `https://github.com/<owner>/<name>`.
    pub fn url(&self) -> String {
        format!("{GITHUB_BASE_URL}/{}/{}", self.owner, self.name)
    }

    /// Returns the URL of a sub-page (e.g. `commits`) relative to `base_url`.
    pub fn page_url(&self, base_url: &str, page: &str) -> String {
        let base = base_url.trim_end_matches('/');
        if page.is_empty() {
            format!("{base}/{}/{}", self.owner, self.name)
        } else {
            format!("{base}/{}/{}/{page}", self.owner, self.name)
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn is_github_host(host: &str) -> bool {
    host.eq_ignore_ascii_case("github.com") || host.eq_ignore_ascii_case("www.github.com")
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_range_parse() {
        assert_eq!("daily".parse::<TimeRange>().unwrap(), TimeRange::Daily);
        assert_eq!(" Weekly ".parse::<TimeRange>().unwrap(), TimeRange::Weekly);
        assert_eq!("month".parse::<TimeRange>().unwrap(), TimeRange::Monthly);
        assert!("yearly".parse::<TimeRange>().is_err());
    }

    #[test]
    fn test_language_filter_parse() {
        assert_eq!(LanguageFilter::parse("all"), LanguageFilter::All);
        assert_eq!(LanguageFilter::parse("  "), LanguageFilter::All);
        assert_eq!(
            LanguageFilter::parse("Rust"),
            LanguageFilter::Language("rust".to_string())
        );
        assert_eq!(
            LanguageFilter::parse("Jupyter Notebook").slug(),
            Some("jupyter-notebook")
        );
    }

    #[test]
    fn test_language_filter_matches_display_names() {
        let filter = LanguageFilter::parse("python");
        assert!(filter.matches(Some("Python")));
        assert!(!filter.matches(Some("Rust")));
        assert!(!filter.matches(None));
        assert!(LanguageFilter::All.matches(None));
    }

    #[test]
    fn test_query_url() {
        let base = "https://github.com";
        let all = TrendingQuery::default();
        assert_eq!(all.url(base), "https://github.com/trending?since=daily");

        let cpp = TrendingQuery::new(LanguageFilter::parse("c++"), TimeRange::Weekly);
        assert_eq!(cpp.url(base), "https://github.com/trending/c%2B%2B?since=weekly");
    }

    #[test]
    fn test_repo_id_forms() {
        let expected = RepoId::new("rust-lang", "rust").unwrap();
        for input in [
            "rust-lang/rust",
            "/rust-lang/rust",
            "github.com/rust-lang/rust",
            "https://github.com/rust-lang/rust",
            "https://github.com/rust-lang/rust/",
            "https://www.github.com/rust-lang/rust/tree/master/src",
            "https://github.com/rust-lang/rust.git",
            "http://github.com/rust-lang/rust?tab=readme",
        ] {
            assert_eq!(RepoId::parse(input).unwrap(), expected, "input: {input}");
        }
    }

    #[test]
    fn test_repo_id_rejects_bad_input() {
        for input in ["", "rust-lang", "https://gitlab.com/a/b", "a b/c", "/", "not a url://x"] {
            assert!(RepoId::parse(input).is_err(), "input: {input}");
        }
    }

    #[test]
    fn test_repo_id_urls() {
        let id = RepoId::parse("tokio-rs/tokio").unwrap();
        assert_eq!(id.full_name(), "tokio-rs/tokio");
        assert_eq!(id.url(), "https://github.com/tokio-rs/tokio");
        assert_eq!(
            id.page_url("https://github.com/", "commits"),
            "https://github.com/tokio-rs/tokio/commits"
        );
    }
}
