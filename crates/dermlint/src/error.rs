//! Error types for the dermlint library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for dermlint operations.
#[derive(Debug, Error)]
pub enum DermlintError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no data to validate.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// The named column is not present in the table.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Error reported by the accession store.
    #[error("Store error: {0}")]
    Store(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for dermlint operations.
pub type Result<T> = std::result::Result<T, DermlintError>;
