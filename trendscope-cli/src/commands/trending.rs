//! Trending command - list trending repositories.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use tracing::info;
use trendscope_core::{LanguageFilter, TimeRange, TrendingEntry, TrendingQuery};
use trendscope_scrape::SortKey;
use trendscope_scrape::stats::{filter_by_stars, top_repositories};
use trendscope_store::ExportKind;

use super::{build_scraper, load_config, write_export};
use crate::output::{CsvFormatter, JsonFormatter, TextFormatter, trending_rows};
use crate::{Cli, OutputFormat};

/// Arguments for the trending command.
#[derive(Args, Debug)]
pub struct TrendingArgs {
    /// Language slug (e.g. rust, python, c++) or "all".
    #[arg(long, short, default_value = "all")]
    pub language: String,

    /// Time range (daily, weekly, monthly).
    #[arg(long, short, default_value = "daily")]
    pub since: TimeRange,

    /// Only repositories with at least this many stars.
    #[arg(long, default_value_t = 0)]
    pub min_stars: u64,

    /// Only repositories with at most this many stars.
    #[arg(long)]
    pub max_stars: Option<u64>,

    /// Keep the N highest repositories by --sort.
    #[arg(long, short)]
    pub top: Option<usize>,

    /// Ranking used with --top.
    #[arg(long, default_value = "stars")]
    pub sort: SortBy,

    /// Also write the list to an export file.
    #[arg(long, short)]
    pub export: Option<ExportFormat>,

    /// Directory for the export file.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

/// Ranking options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortBy {
    /// Total stars.
    Stars,
    /// Total forks.
    Forks,
    /// Stars gained in the time range.
    StarsToday,
}

impl From<SortBy> for SortKey {
    fn from(sort: SortBy) -> Self {
        match sort {
            SortBy::Stars => Self::Stars,
            SortBy::Forks => Self::Forks,
            SortBy::StarsToday => Self::StarsToday,
        }
    }
}

/// Export file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// JSON document.
    Json,
    /// CSV rows.
    Csv,
}

/// Runs the trending command.
pub async fn run(args: &TrendingArgs, cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let scraper = build_scraper(&config)?;

    let query = TrendingQuery::new(LanguageFilter::parse(&args.language), args.since);
    info!(query = %query, "Fetching trending repositories");

    let report = scraper.scrape_trending(&query).await?;
    let selected = select(&report.entries, args);
    let rows = trending_rows(&report, &selected);

    let rendered = match cli.format {
        OutputFormat::Text => TextFormatter::new(!cli.no_color).format_trending(&report, &rows),
        OutputFormat::Json => JsonFormatter::new(cli.pretty).format_trending(&report, &rows)?,
        OutputFormat::Csv => CsvFormatter::new().format_trending(&rows)?,
    };
    println!("{}", rendered.trim_end());

    if let Some(format) = args.export {
        let (extension, contents) = match format {
            ExportFormat::Json => ("json", JsonFormatter::new(true).format_trending(&report, &rows)?),
            ExportFormat::Csv => ("csv", CsvFormatter::new().format_trending(&rows)?),
        };
        let path = write_export(
            &config,
            args.output_dir.as_deref(),
            ExportKind::Trending,
            extension,
            contents.as_bytes(),
        )
        .await?;
        if !cli.quiet {
            eprintln!("Exported {} repositories to {}", rows.len(), path.display());
        }
    }

    Ok(())
}

/// Applies the star range and the optional top-N ranking; page order is
/// kept when no top-N is requested.
pub fn select(entries: &[TrendingEntry], args: &TrendingArgs) -> Vec<TrendingEntry> {
    let in_range: Vec<TrendingEntry> = filter_by_stars(entries, args.min_stars, args.max_stars)
        .into_iter()
        .cloned()
        .collect();

    match args.top {
        Some(n) => top_repositories(&in_range, n, args.sort.into())
            .into_iter()
            .cloned()
            .collect(),
        None => in_range,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, stars: u64, today: u64) -> TrendingEntry {
        TrendingEntry {
            full_name: name.to_string(),
            url: format!("https://github.com/{name}"),
            description: None,
            language: Some("Rust".to_string()),
            stars,
            forks: 0,
            stars_today: today,
            contributors: Vec::new(),
        }
    }

    fn args() -> TrendingArgs {
        TrendingArgs {
            language: "all".to_string(),
            since: TimeRange::Daily,
            min_stars: 0,
            max_stars: None,
            top: None,
            sort: SortBy::Stars,
            export: None,
            output_dir: None,
        }
    }

    fn names(entries: &[TrendingEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.full_name.as_str()).collect()
    }

    #[test]
    fn test_select_keeps_page_order_without_top() {
        let entries = vec![entry("a/a", 10, 5), entry("b/b", 300, 1), entry("c/c", 50, 90)];
        let mut filter = args();
        filter.min_stars = 20;
        assert_eq!(names(&select(&entries, &filter)), vec!["b/b", "c/c"]);
    }

    #[test]
    fn test_select_top_by_sort_key() {
        let entries = vec![entry("a/a", 10, 5), entry("b/b", 300, 1), entry("c/c", 50, 90)];
        let mut filter = args();
        filter.top = Some(2);
        filter.sort = SortBy::StarsToday;
        assert_eq!(names(&select(&entries, &filter)), vec!["c/c", "a/a"]);

        filter.sort = SortBy::Stars;
        filter.max_stars = Some(100);
        assert_eq!(names(&select(&entries, &filter)), vec!["c/c", "a/a"]);
    }
}
