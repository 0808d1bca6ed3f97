//! Error types for output generation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while persisting the reconciled table.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Destination (or its parent directory) could not be created.
    #[error("failed to create {path}: {source}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Record could not be encoded or written.
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    /// A frame column could not be read as strings.
    #[error("DataFrame operation failed: {message}")]
    Polars { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<polars::prelude::PolarsError> for OutputError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::Polars {
            message: err.to_string(),
        }
    }
}

/// Result type for output operations.
pub type Result<T> = std::result::Result<T, OutputError>;
