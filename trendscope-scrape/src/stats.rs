//! Statistics over a list of trending entries.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use trendscope_core::{ActivityLevel, LanguageFilter, TrendingEntry};

/// Weight of total stars in the popularity score.
pub const POPULARITY_STARS_WEIGHT: f64 = 0.7;
/// Weight of total forks in the popularity score.
pub const POPULARITY_FORKS_WEIGHT: f64 = 0.2;
/// Weight of period stars in the popularity score.
pub const POPULARITY_STARS_TODAY_WEIGHT: f64 = 0.1;

/// Language label used for entries without one.
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// Field to rank entries by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Total stars.
    #[default]
    Stars,
    /// Total forks.
    Forks,
    /// Stars gained in the period.
    StarsToday,
}

impl SortKey {
    fn value(self, entry: &TrendingEntry) -> u64 {
        match self {
            Self::Stars => entry.stars,
            Self::Forks => entry.forks,
            Self::StarsToday => entry.stars_today,
        }
    }
}

/// Language breakdown of a trending list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageStats {
    /// Number of distinct languages (unknown counts as one).
    pub total_languages: usize,
    /// Entries per language, most common first.
    pub distribution: Vec<(String, usize)>,
    /// The most common language.
    pub most_popular: Option<String>,
    /// Total stars per language, highest first.
    pub stars_by_language: Vec<(String, u64)>,
}

/// Popularity score (0-100) of each entry relative to the list maxima.
///
/// Each component is divided by its maximum in the list; a component whose
/// maximum is 0 contributes nothing.
#[allow(clippy::cast_precision_loss)]
pub fn popularity_scores(entries: &[TrendingEntry]) -> Vec<f64> {
    let max = |key: SortKey| entries.iter().map(|e| key.value(e)).max().unwrap_or(0);
    let max_stars = max(SortKey::Stars);
    let max_forks = max(SortKey::Forks);
    let max_today = max(SortKey::StarsToday);

    let ratio = |value: u64, max: u64| {
        if max == 0 {
            0.0
        } else {
            value as f64 / max as f64
        }
    };

    entries
        .iter()
        .map(|e| {
            100.0
                * (POPULARITY_STARS_WEIGHT * ratio(e.stars, max_stars)
                    + POPULARITY_FORKS_WEIGHT * ratio(e.forks, max_forks)
                    + POPULARITY_STARS_TODAY_WEIGHT * ratio(e.stars_today, max_today))
        })
        .collect()
}

/// Buckets period stars at 100/50/20/5.
pub fn activity_level_for_stars_today(stars_today: u64) -> ActivityLevel {
    match stars_today {
        100.. => ActivityLevel::VeryHigh,
        50..=99 => ActivityLevel::High,
        20..=49 => ActivityLevel::Medium,
        5..=19 => ActivityLevel::Low,
        _ => ActivityLevel::VeryLow,
    }
}

/// Entries matching a language filter.
pub fn filter_by_language<'a>(
    entries: &'a [TrendingEntry],
    filter: &LanguageFilter,
) -> Vec<&'a TrendingEntry> {
    entries
        .iter()
        .filter(|e| filter.matches(e.language.as_deref()))
        .collect()
}

/// Entries with `min <= stars` and, if given, `stars <= max`.
pub fn filter_by_stars(entries: &[TrendingEntry], min: u64, max: Option<u64>) -> Vec<&TrendingEntry> {
    entries
        .iter()
        .filter(|e| e.stars >= min && max.is_none_or(|max| e.stars <= max))
        .collect()
}

/// The `n` highest entries by `key`; ties keep list order.
pub fn top_repositories(entries: &[TrendingEntry], n: usize, key: SortKey) -> Vec<&TrendingEntry> {
    let mut ranked: Vec<&TrendingEntry> = entries.iter().collect();
    ranked.sort_by(|a, b| key.value(b).cmp(&key.value(a)));
    ranked.truncate(n);
    ranked
}

/// Language breakdown; ties are ordered by name.
pub fn language_statistics(entries: &[TrendingEntry]) -> LanguageStats {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut stars: HashMap<&str, u64> = HashMap::new();
    for entry in entries {
        let language = entry.language.as_deref().unwrap_or(UNKNOWN_LANGUAGE);
        *counts.entry(language).or_default() += 1;
        *stars.entry(language).or_default() += entry.stars;
    }

    let mut distribution: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(l, c)| (l.to_string(), c))
        .collect();
    distribution.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut stars_by_language: Vec<(String, u64)> = stars
        .into_iter()
        .map(|(l, s)| (l.to_string(), s))
        .collect();
    stars_by_language.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    LanguageStats {
        total_languages: distribution.len(),
        most_popular: distribution.first().map(|(l, _)| l.clone()),
        distribution,
        stars_by_language,
    }
}
