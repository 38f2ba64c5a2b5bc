//! Output formatting for CLI.

mod json;
mod tabular;
mod text;

pub use json::JsonFormatter;
pub use tabular::CsvFormatter;
pub use text::TextFormatter;

use trendscope_core::{ActivityLevel, TrendingEntry, TrendingReport};
use trendscope_scrape::stats::{activity_level_for_stars_today, popularity_scores};

/// One trending entry prepared for display.
#[derive(Debug, Clone)]
pub struct TrendingRow<'a> {
    /// 1-based position on the trending page.
    pub rank: usize,
    /// The entry itself.
    pub entry: &'a TrendingEntry,
    /// Popularity relative to the displayed list (0-100).
    pub popularity: f64,
    /// Bucket of the period star gain.
    pub activity: ActivityLevel,
}

/// Builds display rows for `selected`, a subset of `report.entries`.
pub fn trending_rows<'a>(report: &TrendingReport, selected: &'a [TrendingEntry]) -> Vec<TrendingRow<'a>> {
    let scores = popularity_scores(selected);
    selected
        .iter()
        .zip(scores)
        .map(|(entry, popularity)| TrendingRow {
            rank: report
                .entries
                .iter()
                .position(|e| e.full_name == entry.full_name)
                .map_or(0, |i| i + 1),
            entry,
            popularity,
            activity: activity_level_for_stars_today(entry.stars_today),
        })
        .collect()
}

/// Share of `count` in `total` as a percentage.
#[allow(clippy::cast_precision_loss)]
pub fn percent_of(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests;
