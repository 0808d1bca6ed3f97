//! Data model for the record reconciliation pipeline.
//!
//! - **value**: [`RawValue`], the closed set of shapes a loaded cell can take
//! - **table**: [`Table`] (named, equal-length columns) and [`RecordSet`]
//! - **class**: [`ColumnClass`], the semantic bucket a column is normalized under

pub mod class;
pub mod error;
pub mod table;
pub mod value;

pub use class::ColumnClass;
pub use error::{ModelError, Result};
pub use table::{Column, RecordSet, SourceShape, Table, TableBuilder};
pub use value::RawValue;
