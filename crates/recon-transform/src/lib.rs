//! Reconciliation transforms.
//!
//! Provides every stage between loading and persisting:
//! - **Classification**: name-driven semantic class per column
//! - **Normalization**: one pure function per class, raw value to canonical string
//! - **Join**: join key resolution and the left outer merge (or union fallback)
//! - **Identifier**: the single `ID` column, renamed or synthesized, placed first
//! - **Executor**: classify and normalize a whole table into a string `DataFrame`
//!
//! # Design Principles
//!
//! - **Total**: no input value aborts a stage; failures degrade to documented defaults
//! - **Stateless functions**: normalizers are pure and independent per value
//! - **Order preserving**: transaction row order survives every stage

mod error;
mod executor;
mod identifier;
mod join;

pub mod classification;
pub mod normalization;

// Error type
pub use error::{Result, TransformError};

// Classification
pub use classification::{classify_column, classify_name, is_pii_name};

// Join and merge
pub use join::{MergeOutcome, MergeStrategy, USER_SUFFIX, merge, resolve_join_key};

// Identifier column
pub use identifier::{
    IDENTIFIER_COLUMN, IdentifierOrigin, adopt_transaction_identifier, adopt_user_identifier,
    ensure_identifier, synthesize_identifiers,
};

// Execution
pub use executor::{ColumnReport, NormalizedTable, normalize_table};
