//! Analyze command - repository profiles with activity scores.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::{debug, info, warn};
use trendscope_core::{RepoId, RepositoryProfile};
use trendscope_scrape::{GitHubScraper, ScrapeError};
use trendscope_store::{ExportKind, SessionCache};

use super::{build_cache, build_scraper, load_config, write_export};
use crate::output::{CsvFormatter, JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the analyze command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Repositories as `owner/repo` or GitHub URLs.
    #[arg(required = true, num_args = 1..)]
    pub repositories: Vec<String>,

    /// Also write the profiles to a JSON export file.
    #[arg(long, short)]
    pub export: bool,

    /// Directory for the export file.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

/// Runs the analyze command.
///
/// Repositories are analyzed one after another. A repository named twice
/// is served from the session cache. Failures are reported per repository;
/// the command fails only if none succeeded.
pub async fn run(args: &AnalyzeArgs, cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let scraper = build_scraper(&config)?;
    let cache = build_cache(&config);
    let text = TextFormatter::new(!cli.no_color);

    let mut profiles = Vec::new();
    let mut first_error: Option<ScrapeError> = None;

    for input in &args.repositories {
        match analyze_one(input, &scraper, &cache).await {
            Ok(profile) => profiles.push(profile),
            Err(e) => {
                warn!(repository = %input, error = %e, "Analysis failed");
                if !cli.quiet {
                    eprintln!("{}", text.format_error(input, &e.to_string()));
                }
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    if profiles.is_empty() {
        if let Some(e) = first_error {
            return Err(e.into());
        }
    }

    let rendered = match cli.format {
        OutputFormat::Text => profiles
            .iter()
            .map(|p| text.format_profile(p))
            .collect::<Vec<_>>()
            .join("\n\n"),
        OutputFormat::Json => JsonFormatter::new(cli.pretty).format_profiles(&profiles)?,
        OutputFormat::Csv => CsvFormatter::new().format_profiles(&profiles)?,
    };
    println!("{}", rendered.trim_end());

    if args.export {
        let contents = JsonFormatter::new(true).format_profiles(&profiles)?;
        let path = write_export(
            &config,
            args.output_dir.as_deref(),
            ExportKind::RepositoryAnalysis,
            "json",
            contents.as_bytes(),
        )
        .await?;
        if !cli.quiet {
            eprintln!("Exported {} profiles to {}", profiles.len(), path.display());
        }
    }

    Ok(())
}

async fn analyze_one(
    input: &str,
    scraper: &GitHubScraper,
    cache: &SessionCache,
) -> Result<RepositoryProfile, ScrapeError> {
    let id = RepoId::parse(input).map_err(|_| ScrapeError::InvalidRepository(input.trim().to_string()))?;
    let full_name = id.full_name();
    debug!(repository = %id, "Analyzing repository");

    let profile = cache
        .repository_or_fetch(&id, false, || scraper.analyze_repository(&full_name))
        .await?;

    info!(
        repository = %id,
        health = profile.activity_metrics.health_score,
        "Repository analyzed"
    );
    Ok(profile)
}
