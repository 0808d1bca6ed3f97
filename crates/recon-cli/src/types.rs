use std::path::PathBuf;

use serde::Serialize;

use recon_model::SourceShape;
use recon_transform::{ColumnReport, IdentifierOrigin, MergeStrategy};

/// What one run of the pipeline did.
#[derive(Debug, Clone, Serialize)]
pub struct CleanReport {
    pub users: SourceSummary,
    pub transactions: SourceSummary,
    pub merge: MergeStrategy,
    pub identifier: IdentifierOrigin,
    pub rows: usize,
    pub columns: Vec<ColumnReport>,
    /// `None` for a dry run.
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceSummary {
    pub path: PathBuf,
    /// `None` when no records were recognised.
    pub shape: Option<SourceShape>,
    pub rows: usize,
    pub columns: usize,
}
