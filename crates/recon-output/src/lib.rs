//! Persistence of the reconciled table.
//!
//! The cleaned frame holds only string columns; it is written as UTF-8 CSV
//! with a header row and no index column.

mod error;
mod writer;

// === Error Types ===
pub use error::{OutputError, Result};

// === CSV ===
pub use writer::{to_csv_string, write_csv, write_csv_to};
