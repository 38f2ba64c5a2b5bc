//! Core error types for Trendscope.

use thiserror::Error;

/// Core error type for Trendscope operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Repository identifier could not be parsed.
    #[error("Invalid repository identifier: {0}")]
    InvalidRepository(String),

    /// Unknown time range value.
    #[error("Invalid time range: {0} (expected daily, weekly, or monthly)")]
    InvalidTimeRange(String),

    /// Invalid data in a record.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
