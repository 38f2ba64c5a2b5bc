//! CSV output formatting.
//!
//! One header row, then one row per record. List-valued fields are joined
//! with ", " so every row has the same columns.

use anyhow::Result;
use serde::Serialize;
use trendscope_core::{RepositoryProfile, TrendingQuery};
use trendscope_scrape::LanguageStats;

use super::json::round2;
use super::{TrendingRow, percent_of};

// ============================================================================
// Row Types
// ============================================================================

/// One trending entry as a CSV row.
#[derive(Debug, Serialize)]
pub struct TrendingCsvRow<'a> {
    pub rank: usize,
    pub full_name: &'a str,
    pub url: &'a str,
    pub description: &'a str,
    pub language: &'a str,
    pub stars: u64,
    pub forks: u64,
    pub stars_today: u64,
    pub contributors: String,
    pub popularity_score: f64,
    pub activity_level: &'static str,
}

/// One repository profile as a CSV row.
#[derive(Debug, Serialize)]
pub struct ProfileCsvRow<'a> {
    pub full_name: &'a str,
    pub url: &'a str,
    pub language: &'a str,
    pub stars: u64,
    pub forks: u64,
    pub watchers: u64,
    pub open_issues: u64,
    pub size_kb: Option<u64>,
    pub health_score: f64,
    pub community_engagement: f64,
    pub development_velocity: f64,
    pub activity_level: &'static str,
    pub commits_sampled: usize,
    pub contributors_sampled: usize,
    pub top_contributor: &'a str,
}

/// One language share as a CSV row.
#[derive(Debug, Serialize)]
pub struct LanguageCsvRow<'a> {
    pub filter: String,
    pub since: &'static str,
    pub language: &'a str,
    pub repositories: usize,
    pub percent: f64,
    pub stars: u64,
}

// ============================================================================
// CSV Formatter
// ============================================================================

/// CSV formatter.
#[derive(Debug, Default)]
pub struct CsvFormatter;

impl CsvFormatter {
    /// Creates a new CSV formatter.
    pub fn new() -> Self {
        Self
    }

    /// Formats a trending list.
    pub fn format_trending(&self, rows: &[TrendingRow<'_>]) -> Result<String> {
        write_rows(rows.iter().map(|row| TrendingCsvRow {
            rank: row.rank,
            full_name: &row.entry.full_name,
            url: &row.entry.url,
            description: row.entry.description.as_deref().unwrap_or_default(),
            language: row.entry.language.as_deref().unwrap_or_default(),
            stars: row.entry.stars,
            forks: row.entry.forks,
            stars_today: row.entry.stars_today,
            contributors: row.entry.contributors_joined(),
            popularity_score: round2(row.popularity),
            activity_level: row.activity.label(),
        }))
    }

    /// Formats repository profiles.
    pub fn format_profiles(&self, profiles: &[RepositoryProfile]) -> Result<String> {
        write_rows(profiles.iter().map(|p| {
            let metrics = &p.activity_metrics;
            ProfileCsvRow {
                full_name: &p.full_name,
                url: &p.url,
                language: p.language.as_deref().unwrap_or_default(),
                stars: p.stars,
                forks: p.forks,
                watchers: p.watchers,
                open_issues: p.open_issues,
                size_kb: p.size_kb,
                health_score: round2(metrics.health_score),
                community_engagement: round2(metrics.community_engagement),
                development_velocity: round2(metrics.development_velocity),
                activity_level: metrics.activity_level.label(),
                commits_sampled: p.recent_commits.len(),
                contributors_sampled: p.top_contributors.len(),
                top_contributor: p
                    .top_contributors
                    .first()
                    .map_or("", |c| c.name.as_str()),
            }
        }))
    }

    /// Formats language breakdowns.
    pub fn format_languages(&self, pages: &[(TrendingQuery, LanguageStats)]) -> Result<String> {
        write_rows(pages.iter().flat_map(|(query, stats)| {
            let total: usize = stats.distribution.iter().map(|(_, count)| count).sum();
            stats.distribution.iter().map(move |(language, count)| LanguageCsvRow {
                filter: query.language.to_string(),
                since: query.time_range.as_str(),
                language,
                repositories: *count,
                percent: round2(percent_of(*count, total)),
                stars: stats
                    .stars_by_language
                    .iter()
                    .find(|(l, _)| l == language)
                    .map_or(0, |(_, s)| *s),
            })
        }))
    }
}

fn write_rows<T: Serialize>(rows: impl IntoIterator<Item = T>) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!("{}", e.error()))?;
    Ok(String::from_utf8(bytes)?)
}
