//! Ingest error types
//!
//! Defines all errors that can occur while turning external data into
//! readings.

use thiserror::Error;

/// Errors that can occur while reading input data
#[derive(Error, Debug)]
pub enum IngestError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV structure could not be read
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON document could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Timestamp did not match any supported format
    #[error("Could not parse timestamp: {0}")]
    InvalidTimestamp(String),

    /// Value column was not numeric
    #[error("Invalid value '{value}' in column {column}")]
    InvalidValue { column: usize, value: String },

    /// A required column was absent from a row or header
    #[error("Missing column: {0}")]
    MissingColumn(String),
}

/// Result type alias for ingest operations
pub type IngestResult<T> = Result<T, IngestError>;
