//! The scraping facade: fetch, extract, normalize, score.

use chrono::Utc;
use tracing::{info, instrument, warn};
use trendscope_core::{
    GITHUB_BASE_URL, RepoId, RepositoryProfile, TrendingQuery, TrendingReport,
};
use trendscope_fetch::{FetchSettings, Fetcher, HttpClient, Transport};

use crate::analysis::{analyze_commits, analyze_contributors};
use crate::error::ScrapeError;
use crate::extract::{
    MAX_COMMITS, MAX_CONTRIBUTORS, extract_commits_limited, extract_contributors_limited,
    extract_issue_count, extract_repository, extract_trending,
};
use crate::metrics::{MetricsInput, compute_metrics};
use crate::normalize::{
    clean_text, estimate_contributors, normalize, normalize_commits, normalize_contributors,
};
use crate::numbers::{parse_count, parse_size_kb};

// ============================================================================
// Settings
// ============================================================================

/// Scraper settings.
#[derive(Debug, Clone)]
pub struct ScraperSettings {
    /// Site root every page URL is built from.
    pub base_url: String,
    /// Commits sampled per repository.
    pub max_commits: usize,
    /// Contributors sampled per repository.
    pub max_contributors: usize,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            base_url: GITHUB_BASE_URL.to_string(),
            max_commits: MAX_COMMITS,
            max_contributors: MAX_CONTRIBUTORS,
        }
    }
}

impl ScraperSettings {
    /// Sets the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the commit sample size.
    pub fn with_max_commits(mut self, max: usize) -> Self {
        self.max_commits = max;
        self
    }

    /// Sets the contributor sample size.
    pub fn with_max_contributors(mut self, max: usize) -> Self {
        self.max_contributors = max;
        self
    }
}

// ============================================================================
// Scraper
// ============================================================================

/// Scrapes GitHub trending pages and repository pages.
///
/// Holds no scraped data; repeated calls re-fetch. Use
/// `trendscope_store::SessionCache` to reuse results within a session.
#[derive(Debug)]
pub struct GitHubScraper<T: Transport = HttpClient> {
    fetcher: Fetcher<T>,
    settings: ScraperSettings,
}

impl GitHubScraper<HttpClient> {
    /// Creates a scraper over a reqwest client.
    ///
    /// # Errors
    ///
    /// Returns `ScrapeError::Network` if the HTTP client cannot be built.
    pub fn new(fetch: &FetchSettings, settings: ScraperSettings) -> Result<Self, ScrapeError> {
        Ok(Self::with_fetcher(Fetcher::new(fetch)?, settings))
    }
}

impl<T: Transport> GitHubScraper<T> {
    /// Creates a scraper over any fetcher.
    pub fn with_fetcher(fetcher: Fetcher<T>, settings: ScraperSettings) -> Self {
        Self { fetcher, settings }
    }

    /// Returns the settings.
    pub fn settings(&self) -> &ScraperSettings {
        &self.settings
    }

    /// Returns the fetcher.
    pub fn fetcher(&self) -> &Fetcher<T> {
        &self.fetcher
    }

    /// Scrapes one trending page.
    ///
    /// # Errors
    ///
    /// `ScrapeError::Network` if the page cannot be fetched and
    /// `ScrapeError::EmptyResult` if it holds no valid entries.
    #[instrument(skip(self, query), fields(query = %query))]
    pub async fn scrape_trending(&self, query: &TrendingQuery) -> Result<TrendingReport, ScrapeError> {
        let url = query.url(&self.settings.base_url);
        let html = self.fetcher.fetch(&url).await?;

        let raw = extract_trending(&html);
        let normalized = normalize(&raw);
        if normalized.entries.is_empty() {
            warn!(skipped = normalized.skipped, "No valid trending entries");
            return Err(ScrapeError::EmptyResult {
                skipped: normalized.skipped,
            });
        }

        info!(
            entries = normalized.entries.len(),
            skipped = normalized.skipped,
            "Scraped trending page"
        );
        Ok(TrendingReport::new(
            query.clone(),
            normalized.entries,
            normalized.skipped,
        ))
    }

    /// Builds a profile of one repository.
    ///
    /// Accepts `owner/repo` or any GitHub repository URL. The landing page
    /// is required; the commit, contributor, and issue pages are fetched
    /// afterwards, one at a time, and a failure there only leaves the
    /// corresponding fields empty.
    ///
    /// # Errors
    ///
    /// `ScrapeError::InvalidRepository` for an unparseable identifier and
    /// `ScrapeError::Network` if the landing page cannot be fetched.
    #[instrument(skip(self))]
    pub async fn analyze_repository(&self, repository: &str) -> Result<RepositoryProfile, ScrapeError> {
        let id = RepoId::parse(repository)
            .map_err(|_| ScrapeError::InvalidRepository(repository.trim().to_string()))?;
        let base = &self.settings.base_url;

        let html = self.fetcher.fetch(&id.page_url(base, "")).await?;
        let page = extract_repository(&html);
        drop(html);

        let commits = match self.fetch_optional(&id, "commits").await {
            Some(html) => normalize_commits(&extract_commits_limited(&html, self.settings.max_commits)),
            None => Vec::new(),
        };

        let mut contributors = match self.fetch_optional(&id, "graphs/contributors").await {
            Some(html) => normalize_contributors(&extract_contributors_limited(
                &html,
                self.settings.max_contributors,
            )),
            None => Vec::new(),
        };
        if contributors.is_empty() {
            contributors = estimate_contributors(&commits, self.settings.max_contributors);
        }

        let open_issues = match page.open_issues.as_deref() {
            Some(text) => parse_count(text),
            None => self
                .fetch_optional(&id, "issues")
                .await
                .and_then(|html| extract_issue_count(&html))
                .map_or(0, |text| parse_count(&text)),
        };

        let stars = page.stars.as_deref().map_or(0, parse_count);
        let forks = page.forks.as_deref().map_or(0, parse_count);
        let activity_metrics = compute_metrics(&MetricsInput {
            stars,
            forks,
            open_issues,
            commits: &commits,
            contributors: &contributors,
            as_of: Utc::now(),
        });

        info!(
            repository = %id,
            commits = commits.len(),
            contributors = contributors.len(),
            health = activity_metrics.health_score,
            "Analyzed repository"
        );

        Ok(RepositoryProfile {
            full_name: id.full_name(),
            url: id.url(),
            description: clean_text(page.description.as_deref()),
            language: clean_text(page.language.as_deref()),
            stars,
            forks,
            watchers: page.watchers.as_deref().map_or(0, parse_count),
            open_issues,
            size_kb: page.size.as_deref().and_then(parse_size_kb),
            commit_analysis: analyze_commits(&commits),
            contributor_analysis: analyze_contributors(&contributors),
            recent_commits: commits,
            top_contributors: contributors,
            activity_metrics,
        })
    }

    async fn fetch_optional(&self, id: &RepoId, page: &str) -> Option<String> {
        let url = id.page_url(&self.settings.base_url, page);
        match self.fetcher.fetch(&url).await {
            Ok(html) => Some(html),
            Err(e) => {
                warn!(repository = %id, page, error = %e, "Optional page unavailable");
                None
            }
        }
    }
}
