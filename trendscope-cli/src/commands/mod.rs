//! CLI command implementations.

pub mod analyze;
pub mod languages;
pub mod trending;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info};
use trendscope_scrape::GitHubScraper;
use trendscope_store::{Config, ExportKind, SessionCache, export_file_name, write_atomic};

use crate::Cli;

/// Loads the configuration named by `--config`, or the default one.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    debug!(config = ?config, "Configuration loaded");
    Ok(config)
}

/// Builds a scraper from configuration.
pub fn build_scraper(config: &Config) -> Result<GitHubScraper> {
    Ok(GitHubScraper::new(
        &config.fetch_settings(),
        config.scraper_settings(),
    )?)
}

/// Builds the session cache from configuration.
pub fn build_cache(config: &Config) -> SessionCache {
    config
        .cache_max_age()
        .map_or_else(SessionCache::new, SessionCache::with_max_age)
}

/// Writes an export file and returns its path.
///
/// The directory is `dir` if given, else the configured export directory,
/// else the current directory.
pub async fn write_export(
    config: &Config,
    dir: Option<&Path>,
    kind: ExportKind,
    extension: &str,
    contents: &[u8],
) -> Result<PathBuf> {
    let directory = dir
        .map(Path::to_path_buf)
        .or_else(|| config.export.directory.clone())
        .unwrap_or_default();
    let path = directory.join(export_file_name(kind, Utc::now(), extension));

    write_atomic(&path, contents)
        .await
        .with_context(|| format!("failed to write export {}", path.display()))?;

    info!(path = %path.display(), bytes = contents.len(), "Export written");
    Ok(path)
}
