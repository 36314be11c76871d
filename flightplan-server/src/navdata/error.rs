//! Navigation data error types.

use std::path::PathBuf;

/// Errors from navigation data providers.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// A data file could not be read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A CSV data file is malformed
    #[error("CSV error in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    /// Base URL cannot carry path segments
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),
}
