//! Error types for transformation stages.

use thiserror::Error;

/// Errors raised while reshaping tables.
///
/// Value-level failures never surface here; they degrade inside the
/// normalizers. These cover structural faults only.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Table invariant violated (duplicate name, length mismatch).
    #[error(transparent)]
    Model(#[from] recon_model::ModelError),

    /// Failed to assemble the output frame.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for transformation operations.
pub type Result<T> = std::result::Result<T, TransformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("test".into());
        let err: TransformError = polars_err.into();
        assert!(matches!(err, TransformError::DataFrame { .. }));
    }

    #[test]
    fn test_error_from_model() {
        let err: TransformError = recon_model::ModelError::DuplicateColumn {
            name: "ID".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "duplicate column 'ID'");
    }
}
