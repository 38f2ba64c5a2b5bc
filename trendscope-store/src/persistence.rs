//! File helpers: default paths, atomic writes, and export naming.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::StoreError;

// ============================================================================
// Default Paths
// ============================================================================

/// Returns the configuration directory (`<config_dir>/trendscope`).
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("trendscope")
}

/// Returns the default config file path.
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.json")
}

// ============================================================================
// Export Naming
// ============================================================================

/// Kind of exported document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// A trending list.
    Trending,
    /// A repository profile.
    RepositoryAnalysis,
}

impl ExportKind {
    /// File name prefix.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Trending => "github_trending_realtime",
            Self::RepositoryAnalysis => "repo_analysis",
        }
    }
}

/// Builds `<prefix>_<YYYYmmdd_HHMMSS>.<extension>`.
pub fn export_file_name(kind: ExportKind, at: DateTime<Utc>, extension: &str) -> String {
    format!(
        "{}_{}.{}",
        kind.prefix(),
        at.format("%Y%m%d_%H%M%S"),
        extension.trim_start_matches('.')
    )
}

// ============================================================================
// File Operations
// ============================================================================

/// Writes bytes atomically (temp file + rename), creating parent directories.
pub async fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!(path = %parent.display(), "Creating directory");
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let mut temp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    tokio::fs::write(&temp_path, contents).await?;
    tokio::fs::rename(&temp_path, path).await?;

    debug!(path = %path.display(), bytes = contents.len(), "File written");
    Ok(())
}

/// Loads data from a JSON file.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    debug!(path = %path.display(), "Loading JSON file");
    let content = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}

// ============================================================================
// Tests
// ============================================================================
