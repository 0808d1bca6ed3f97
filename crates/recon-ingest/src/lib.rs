//! Record ingestion for the reconciliation pipeline.
//!
//! Turns a text blob of unknown JSON shape into a [`Table`](recon_model::Table):
//!
//! - **Newline-delimited**: one JSON value per line, unparseable lines dropped
//! - **Document**: an array of records, an object wrapping the records in its
//!   first list-valued member, or a single object taken as one row
//! - **Stream**: concatenated JSON values as a last resort
//!
//! Nested objects are flattened into dotted column names. Loading never fails
//! on content; a source that yields nothing is reported as [`LoadOutcome::Empty`].
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use recon_ingest::load_source;
//!
//! let outcome = load_source(Path::new("data/users.json"))?;
//! let table = outcome.into_table();
//! ```

mod error;
mod flatten;
mod loader;

// === Error Types ===
pub use error::{IngestError, Result};

// === Loading ===
pub use flatten::{VALUE_COLUMN, flatten_record};
pub use loader::{LoadOutcome, load_source, load_text};
