//! Languages command - language breakdown of trending pages.

use anyhow::Result;
use clap::Args;
use tracing::info;
use trendscope_core::{LanguageFilter, TimeRange, TrendingQuery};
use trendscope_scrape::LanguageStats;
use trendscope_scrape::stats::language_statistics;

use super::{build_cache, build_scraper, load_config};
use crate::output::{CsvFormatter, JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the languages command.
#[derive(Args, Debug)]
pub struct LanguagesArgs {
    /// Time ranges, comma-separated (e.g. daily,weekly).
    #[arg(long, short, value_delimiter = ',', default_value = "daily")]
    pub since: Vec<TimeRange>,

    /// Break down the trending page of one language slug instead of the overall page.
    #[arg(long, short, default_value = "all")]
    pub language: String,
}

/// Runs the languages command.
///
/// Pages are fetched one after another; a time range named twice is
/// served from the session cache. With `--language`, the per-language
/// trending page is fetched.
pub async fn run(args: &LanguagesArgs, cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let scraper = build_scraper(&config)?;
    let cache = build_cache(&config);
    let filter = LanguageFilter::parse(&args.language);

    let mut pages: Vec<(TrendingQuery, LanguageStats)> = Vec::new();
    for query in page_queries(&filter, &args.since) {
        let report = cache
            .trending_or_fetch(&query, false, || scraper.scrape_trending(&query))
            .await?;

        let stats = language_statistics(&report.entries);
        info!(
            query = %query,
            languages = stats.total_languages,
            "Computed language statistics"
        );

        pages.push((query, stats));
    }

    let rendered = match cli.format {
        OutputFormat::Text => {
            let text = TextFormatter::new(!cli.no_color);
            pages
                .iter()
                .map(|(query, stats)| text.format_language_stats(query, stats))
                .collect::<Vec<_>>()
                .join("\n\n")
        }
        OutputFormat::Json => JsonFormatter::new(cli.pretty).format_languages(&pages)?,
        OutputFormat::Csv => CsvFormatter::new().format_languages(&pages)?,
    };
    println!("{}", rendered.trim_end());

    Ok(())
}

fn page_queries(filter: &LanguageFilter, since: &[TimeRange]) -> Vec<TrendingQuery> {
    since
        .iter()
        .map(|time_range| TrendingQuery::new(filter.clone(), *time_range))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_selects_language_page() {
        let queries = page_queries(
            &LanguageFilter::parse("rust"),
            &[TimeRange::Daily, TimeRange::Weekly],
        );

        assert_eq!(queries.len(), 2);
        assert_eq!(
            queries[0].url("https://github.com"),
            "https://github.com/trending/rust?since=daily"
        );
        assert_eq!(
            queries[1].url("https://github.com"),
            "https://github.com/trending/rust?since=weekly"
        );
    }

    #[test]
    fn test_all_languages_uses_overall_page() {
        let queries = page_queries(&LanguageFilter::All, &[TimeRange::Monthly]);
        assert_eq!(
            queries[0].url("https://github.com"),
            "https://github.com/trending?since=monthly"
        );
    }
}
