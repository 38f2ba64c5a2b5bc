//! Session cache for scrape results.
//!
//! Scrapes are not cached implicitly; callers opt in by routing requests
//! through a [`SessionCache`]. Nothing here touches disk.

use std::collections::HashMap;
use std::future::Future;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use trendscope_core::{RepoId, RepositoryProfile, TrendingQuery, TrendingReport};

/// A cached value with its insertion time.
#[derive(Debug, Clone)]
struct Cached<T> {
    value: T,
    stored_at: DateTime<Utc>,
}

/// In-memory cache keyed by [`TrendingQuery`] and [`RepoId`].
#[derive(Debug, Default)]
pub struct SessionCache {
    trending: RwLock<HashMap<TrendingQuery, Cached<TrendingReport>>>,
    repositories: RwLock<HashMap<RepoId, Cached<RepositoryProfile>>>,
    max_age: Option<Duration>,
}

impl SessionCache {
    /// Creates a cache whose entries never expire.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache whose entries expire after `max_age`.
    pub fn with_max_age(max_age: Duration) -> Self {
        Self {
            max_age: Some(max_age),
            ..Self::default()
        }
    }

    /// Returns the configured max age.
    pub fn max_age(&self) -> Option<Duration> {
        self.max_age
    }

    fn is_fresh<T>(&self, entry: &Cached<T>, now: DateTime<Utc>) -> bool {
        self.max_age.is_none_or(|max| now - entry.stored_at <= max)
    }

    // ========================================================================
    // Trending
    // ========================================================================

    /// Returns a fresh cached report.
    pub async fn get_trending(&self, query: &TrendingQuery) -> Option<TrendingReport> {
        let map = self.trending.read().await;
        map.get(query)
            .filter(|e| self.is_fresh(e, Utc::now()))
            .map(|e| e.value.clone())
    }

    /// Stores a report under its query.
    pub async fn put_trending(&self, report: TrendingReport) {
        let key = report.query.clone();
        let entry = Cached {
            value: report,
            stored_at: Utc::now(),
        };
        self.trending.write().await.insert(key, entry);
    }

    /// Removes a report; returns true if one was cached.
    pub async fn invalidate_trending(&self, query: &TrendingQuery) -> bool {
        self.trending.write().await.remove(query).is_some()
    }

    /// Returns the cached report, or runs `fetch` and caches its result.
    ///
    /// `force` skips the lookup and replaces any cached report. Errors are
    /// returned without touching the cache.
    pub async fn trending_or_fetch<F, Fut, E>(
        &self,
        query: &TrendingQuery,
        force: bool,
        fetch: F,
    ) -> Result<TrendingReport, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<TrendingReport, E>>,
    {
        if !force {
            if let Some(report) = self.get_trending(query).await {
                debug!(query = %query, "Trending cache hit");
                return Ok(report);
            }
        }
        debug!(query = %query, force, "Trending cache miss");
        let report = fetch().await?;
        self.put_trending(report.clone()).await;
        Ok(report)
    }

    // ========================================================================
    // Repositories
    // ========================================================================

    /// Returns a fresh cached profile.
    pub async fn get_repository(&self, id: &RepoId) -> Option<RepositoryProfile> {
        let map = self.repositories.read().await;
        map.get(id)
            .filter(|e| self.is_fresh(e, Utc::now()))
            .map(|e| e.value.clone())
    }

    /// Stores a profile.
    pub async fn put_repository(&self, id: RepoId, profile: RepositoryProfile) {
        let entry = Cached {
            value: profile,
            stored_at: Utc::now(),
        };
        self.repositories.write().await.insert(id, entry);
    }

    /// Removes a profile; returns true if one was cached.
    pub async fn invalidate_repository(&self, id: &RepoId) -> bool {
        self.repositories.write().await.remove(id).is_some()
    }

    /// Returns the cached profile, or runs `fetch` and caches its result.
    pub async fn repository_or_fetch<F, Fut, E>(
        &self,
        id: &RepoId,
        force: bool,
        fetch: F,
    ) -> Result<RepositoryProfile, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<RepositoryProfile, E>>,
    {
        if !force {
            if let Some(profile) = self.get_repository(id).await {
                debug!(repository = %id, "Repository cache hit");
                return Ok(profile);
            }
        }
        debug!(repository = %id, force, "Repository cache miss");
        let profile = fetch().await?;
        self.put_repository(id.clone(), profile.clone()).await;
        Ok(profile)
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Removes everything.
    pub async fn clear(&self) {
        self.trending.write().await.clear();
        self.repositories.write().await.clear();
    }

    /// Drops expired entries; returns how many were removed.
    pub async fn purge_stale(&self) -> usize {
        let now = Utc::now();
        let mut removed = 0;

        let mut trending = self.trending.write().await;
        let before = trending.len();
        trending.retain(|_, e| self.is_fresh(e, now));
        removed += before - trending.len();
        drop(trending);

        let mut repositories = self.repositories.write().await;
        let before = repositories.len();
        repositories.retain(|_, e| self.is_fresh(e, now));
        removed += before - repositories.len();

        removed
    }

    /// Returns the number of cached entries.
    pub async fn len(&self) -> usize {
        self.trending.read().await.len() + self.repositories.read().await.len()
    }

    /// Returns true if nothing is cached.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use trendscope_core::{ActivityMetrics, LanguageFilter, TimeRange};

    fn report(query: &TrendingQuery) -> TrendingReport {
        TrendingReport::new(query.clone(), Vec::new(), 0)
    }

    fn profile(id: &RepoId) -> RepositoryProfile {
        RepositoryProfile {
            full_name: id.full_name(),
            url: id.url(),
            description: None,
            language: None,
            stars: 1,
            forks: 0,
            watchers: 0,
            open_issues: 0,
            size_kb: None,
            recent_commits: Vec::new(),
            top_contributors: Vec::new(),
            activity_metrics: ActivityMetrics::default(),
            commit_analysis: None,
            contributor_analysis: None,
        }
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let cache = SessionCache::new();
        let daily = TrendingQuery::default();
        let weekly = TrendingQuery::new(LanguageFilter::All, TimeRange::Weekly);

        cache.put_trending(report(&daily)).await;
        assert!(cache.get_trending(&daily).await.is_some());
        assert!(cache.get_trending(&weekly).await.is_none());

        assert!(cache.invalidate_trending(&daily).await);
        assert!(!cache.invalidate_trending(&daily).await);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_or_fetch_and_force() {
        let cache = SessionCache::new();
        let query = TrendingQuery::default();
        let calls = AtomicUsize::new(0);
        let (calls_ref, query_ref) = (&calls, &query);
        let fetch = move || async move {
            calls_ref.fetch_add(1, Ordering::SeqCst);
            Ok::<_, String>(report(query_ref))
        };

        cache.trending_or_fetch(&query, false, fetch).await.unwrap();
        cache.trending_or_fetch(&query, false, fetch).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        cache.trending_or_fetch(&query, true, fetch).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = SessionCache::new();
        let id = RepoId::new("acme", "widget").unwrap();

        let err = cache
            .repository_or_fetch(&id, false, || async { Err::<RepositoryProfile, _>("offline") })
            .await
            .unwrap_err();
        assert_eq!(err, "offline");
        assert!(cache.get_repository(&id).await.is_none());

        let expected = profile(&id);
        let fetched = cache
            .repository_or_fetch(&id, false, move || async move { Ok::<_, &str>(expected) })
            .await
            .unwrap();
        assert_eq!(fetched.full_name, "acme/widget");
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_max_age_expiry() {
        let cache = SessionCache::with_max_age(Duration::zero() - Duration::seconds(1));
        let id = RepoId::new("acme", "widget").unwrap();

        cache.put_repository(id.clone(), profile(&id)).await;
        assert!(cache.get_repository(&id).await.is_none());
        assert_eq!(cache.purge_stale().await, 1);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = SessionCache::with_max_age(Duration::hours(1));
        let id = RepoId::new("acme", "widget").unwrap();
        cache.put_repository(id.clone(), profile(&id)).await;
        cache.put_trending(report(&TrendingQuery::default())).await;
        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.purge_stale().await, 0);

        cache.clear().await;
        assert!(cache.is_empty().await);
    }
}
