//! CLI library components for the reconciliation pipeline.

pub mod logging;
pub mod pipeline;
pub mod types;
