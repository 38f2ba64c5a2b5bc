//! JSON output formatting.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use trendscope_core::{ActivityLevel, RepositoryProfile, TimeRange, TrendingQuery, TrendingReport};
use trendscope_scrape::LanguageStats;

use super::{TrendingRow, percent_of};

// ============================================================================
// Output Types
// ============================================================================

/// A trending list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingOutput {
    pub language: String,
    pub since: TimeRange,
    #[serde(serialize_with = "serialize_datetime")]
    pub fetched_at: DateTime<Utc>,
    pub total: usize,
    pub skipped: usize,
    pub repositories: Vec<TrendingEntryOutput>,
}

/// One trending entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingEntryOutput {
    pub rank: usize,
    pub full_name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub stars_today: u64,
    pub contributors: Vec<String>,
    pub popularity_score: f64,
    pub activity_level: ActivityLevel,
}

/// Language breakdown of one trending page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguagesOutput {
    pub language: String,
    pub since: TimeRange,
    pub total_languages: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_popular: Option<String>,
    pub distribution: Vec<LanguageShareOutput>,
}

/// One language's share.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageShareOutput {
    pub name: String,
    pub repositories: usize,
    pub percent: f64,
    pub stars: u64,
}

// ============================================================================
// Serialization helpers
// ============================================================================

fn serialize_datetime<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&dt.to_rfc3339())
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize + ?Sized>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats a trending list.
    pub fn format_trending(&self, report: &TrendingReport, rows: &[TrendingRow<'_>]) -> Result<String> {
        self.format(&Self::trending_output(report, rows))
    }

    /// Formats repository profiles; a single profile is not wrapped in an array.
    pub fn format_profiles(&self, profiles: &[RepositoryProfile]) -> Result<String> {
        match profiles {
            [single] => self.format(single),
            _ => self.format(profiles),
        }
    }

    /// Formats language breakdowns; a single one is not wrapped in an array.
    pub fn format_languages(&self, pages: &[(TrendingQuery, LanguageStats)]) -> Result<String> {
        let outputs: Vec<LanguagesOutput> = pages
            .iter()
            .map(|(query, stats)| Self::languages_output(query, stats))
            .collect();

        match outputs.as_slice() {
            [single] => self.format(single),
            _ => self.format(&outputs),
        }
    }

    /// Converts a report to output.
    pub(crate) fn trending_output(report: &TrendingReport, rows: &[TrendingRow<'_>]) -> TrendingOutput {
        TrendingOutput {
            language: report.query.language.to_string(),
            since: report.query.time_range,
            fetched_at: report.fetched_at,
            total: report.len(),
            skipped: report.skipped,
            repositories: rows
                .iter()
                .map(|row| TrendingEntryOutput {
                    rank: row.rank,
                    full_name: row.entry.full_name.clone(),
                    url: row.entry.url.clone(),
                    description: row.entry.description.clone(),
                    language: row.entry.language.clone(),
                    stars: row.entry.stars,
                    forks: row.entry.forks,
                    stars_today: row.entry.stars_today,
                    contributors: row.entry.contributors.clone(),
                    popularity_score: round2(row.popularity),
                    activity_level: row.activity,
                })
                .collect(),
        }
    }

    fn languages_output(query: &TrendingQuery, stats: &LanguageStats) -> LanguagesOutput {
        let total: usize = stats.distribution.iter().map(|(_, count)| count).sum();
        LanguagesOutput {
            language: query.language.to_string(),
            since: query.time_range,
            total_languages: stats.total_languages,
            most_popular: stats.most_popular.clone(),
            distribution: stats
                .distribution
                .iter()
                .map(|(name, count)| LanguageShareOutput {
                    name: name.clone(),
                    repositories: *count,
                    percent: round2(percent_of(*count, total)),
                    stars: stats
                        .stars_by_language
                        .iter()
                        .find(|(l, _)| l == name)
                        .map_or(0, |(_, s)| *s),
                })
                .collect(),
        }
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
