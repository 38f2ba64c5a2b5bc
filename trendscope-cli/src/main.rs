// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Trendscope CLI - GitHub trending repositories from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Today's trending repositories, all languages
//! trendscope trending
//!
//! # Weekly Rust repositories, top 10 by stars gained
//! trendscope trending --language rust --since weekly --top 10 --sort stars-today
//!
//! # Export as CSV
//! trendscope trending --export csv
//!
//! # Analyze repositories
//! trendscope analyze rust-lang/rust https://github.com/tokio-rs/tokio
//!
//! # Language breakdown across all time ranges
//! trendscope languages --since daily,weekly,monthly
//!
//! # JSON output
//! trendscope --format json --pretty trending
//! ```

mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use trendscope_core::CoreError;
use trendscope_scrape::ScrapeError;
use trendscope_store::StoreError;

use commands::{analyze, languages, trending};

// ============================================================================
// CLI Definition
// ============================================================================

/// Trendscope CLI - GitHub trending repositories.
#[derive(Parser)]
#[command(name = "trendscope")]
#[command(about = "GitHub trending scraper with repository activity scoring")]
#[command(long_about = r#"
Trendscope reads GitHub's public trending pages and repository pages
and turns them into typed records with activity scores.

Examples:
  trendscope trending                          # Today, all languages
  trendscope trending -l rust -s weekly        # This week, Rust only
  trendscope trending --export csv             # Write a CSV export
  trendscope analyze rust-lang/rust            # Repository profile
  trendscope languages                         # Language breakdown
  trendscope --format json trending            # JSON output
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text, json, or csv).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Configuration file (defaults to the user config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// List trending repositories.
    #[command(visible_alias = "t")]
    Trending(trending::TrendingArgs),

    /// Analyze one or more repositories.
    #[command(visible_alias = "a")]
    Analyze(analyze::AnalyzeArgs),

    /// Show the language breakdown of trending pages.
    #[command(visible_alias = "l")]
    Languages(languages::LanguagesArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
    /// CSV rows.
    Csv,
}

/// CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// GitHub could not be reached.
    Network = 2,
    /// The page held no valid repositories.
    EmptyResult = 3,
    /// Bad repository identifier, time range, or configuration.
    InvalidInput = 4,
}

impl ExitCode {
    /// Maps an error chain to an exit code.
    pub fn for_error(err: &anyhow::Error) -> Self {
        if let Some(scrape) = err.downcast_ref::<ScrapeError>() {
            return match scrape {
                ScrapeError::Network(_) => Self::Network,
                ScrapeError::EmptyResult { .. } => Self::EmptyResult,
                ScrapeError::InvalidRepository(_) | ScrapeError::Core(_) => Self::InvalidInput,
            };
        }
        if err.downcast_ref::<CoreError>().is_some() {
            return Self::InvalidInput;
        }
        if let Some(StoreError::Config(_)) = err.downcast_ref::<StoreError>() {
            return Self::InvalidInput;
        }
        Self::Error
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("trendscope=debug,info")
    } else {
        EnvFilter::new("trendscope=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Trending(args) => trending::run(args, &cli).await,
        Commands::Analyze(args) => analyze::run(args, &cli).await,
        Commands::Languages(args) => languages::run(args, &cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(ExitCode::for_error(&e) as i32);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trendscope_fetch::FetchError;

    #[test]
    fn test_exit_code_for_scrape_errors() {
        let network = anyhow::Error::from(ScrapeError::Network(FetchError::Timeout {
            url: "https://github.com/trending".into(),
        }));
        assert_eq!(ExitCode::for_error(&network), ExitCode::Network);

        let empty = anyhow::Error::from(ScrapeError::EmptyResult { skipped: 2 });
        assert_eq!(ExitCode::for_error(&empty), ExitCode::EmptyResult);

        let invalid = anyhow::Error::from(ScrapeError::InvalidRepository("nope".into()));
        assert_eq!(ExitCode::for_error(&invalid), ExitCode::InvalidInput);
    }

    #[test]
    fn test_exit_code_for_other_errors() {
        let config = anyhow::Error::from(StoreError::Config("bad".into()));
        assert_eq!(ExitCode::for_error(&config), ExitCode::InvalidInput);

        let core = anyhow::Error::from(CoreError::InvalidTimeRange("yearly".into()));
        assert_eq!(ExitCode::for_error(&core), ExitCode::InvalidInput);

        assert_eq!(ExitCode::for_error(&anyhow::anyhow!("boom")), ExitCode::Error);
        assert_eq!(ExitCode::Success as i32, 0);
    }

    #[test]
    fn test_cli_parses_trending_flags() {
        let cli = Cli::try_parse_from([
            "trendscope",
            "--format",
            "csv",
            "trending",
            "--language",
            "rust",
            "--since",
            "weekly",
            "--top",
            "5",
            "--sort",
            "stars-today",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Csv);
        let Commands::Trending(args) = cli.command else {
            panic!("expected trending command");
        };
        assert_eq!(args.language, "rust");
        assert_eq!(args.since, trendscope_core::TimeRange::Weekly);
        assert_eq!(args.top, Some(5));
    }

    #[test]
    fn test_cli_rejects_unknown_time_range() {
        assert!(Cli::try_parse_from(["trendscope", "trending", "--since", "yearly"]).is_err());
    }
}
