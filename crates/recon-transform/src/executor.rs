//! Classify and normalize a whole table.

use polars::prelude::{Column as FrameColumn, DataFrame};
use serde::Serialize;
use tracing::{debug, warn};

use recon_model::{ColumnClass, Table};

use crate::classification::{classify_column, is_pii_name};
use crate::error::Result;
use crate::normalization::normalize_value;

/// Classification outcome for one output column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnReport {
    pub name: String,
    pub class: ColumnClass,
    /// Non-null inputs that normalized to an empty string.
    pub blanked: usize,
}

/// The normalized frame (every column a string column) and its column reports.
#[derive(Debug, Clone)]
pub struct NormalizedTable {
    pub frame: DataFrame,
    pub columns: Vec<ColumnReport>,
}

/// Classifies each column and normalizes every value to a string.
///
/// Column order and row order are kept.
pub fn normalize_table(table: Table) -> Result<NormalizedTable> {
    let mut frame_columns = Vec::with_capacity(table.width());
    let mut reports = Vec::with_capacity(table.width());

    for column in table.into_columns() {
        let class = classify_column(&column.name, &column.values);
        let mut blanked = 0usize;
        let values: Vec<String> = column
            .values
            .iter()
            .map(|value| {
                let normalized = normalize_value(class, value);
                if normalized.is_empty() && !value.is_null() {
                    blanked += 1;
                }
                normalized
            })
            .collect();

        debug!(
            column = %column.name,
            class = %class,
            pii = is_pii_name(&column.name),
            blanked,
            "column normalized"
        );
        if blanked > 0 && matches!(class, ColumnClass::Datetime | ColumnClass::PiiEmail) {
            warn!(column = %column.name, class = %class, blanked, "values could not be normalized");
        }

        frame_columns.push(FrameColumn::new(column.name.as_str().into(), values));
        reports.push(ColumnReport {
            name: column.name,
            class,
            blanked,
        });
    }

    let frame = DataFrame::new(frame_columns)?;
    Ok(NormalizedTable {
        frame,
        columns: reports,
    })
}
