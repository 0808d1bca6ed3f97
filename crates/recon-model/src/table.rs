//! Tabular structure shared by every pipeline stage.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::value::RawValue;

/// A named column of raw values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<RawValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<RawValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// A column holding `height` nulls.
    pub fn nulls(name: impl Into<String>, height: usize) -> Self {
        Self::new(name, vec![RawValue::Null; height])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Ordered, uniquely named columns of equal length.
///
/// The row count is tracked separately so a table can hold rows without
/// columns (a source of empty JSON objects).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    height: usize,
}

impl Table {
    /// A table with `height` rows and no columns.
    pub fn with_height(height: usize) -> Self {
        Self {
            columns: Vec::new(),
            height,
        }
    }

    /// Builds a table from columns, taking the row count from the first one.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let height = columns.first().map_or(0, Column::len);
        let mut table = Self::with_height(height);
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// True when the table has neither rows nor columns.
    pub fn is_empty(&self) -> bool {
        self.height == 0 && self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Appends a column after the existing ones.
    pub fn push_column(&mut self, column: Column) -> Result<()> {
        let at = self.columns.len();
        self.insert_column(at, column)
    }

    /// Inserts a column at `index` (clamped to the current width).
    pub fn insert_column(&mut self, index: usize, column: Column) -> Result<()> {
        if column.len() != self.height {
            return Err(ModelError::LengthMismatch {
                column: column.name,
                expected: self.height,
                actual: column.values.len(),
            });
        }
        if self.contains(&column.name) {
            return Err(ModelError::DuplicateColumn { name: column.name });
        }
        let index = index.min(self.columns.len());
        self.columns.insert(index, column);
        Ok(())
    }

    /// Renames `from` to `to`. Returns `Ok(false)` when `from` does not exist.
    pub fn rename_column(&mut self, from: &str, to: &str) -> Result<bool> {
        if from == to {
            return Ok(self.contains(from));
        }
        let Some(index) = self.position(from) else {
            return Ok(false);
        };
        if self.contains(to) {
            return Err(ModelError::DuplicateColumn {
                name: to.to_string(),
            });
        }
        self.columns[index].name = to.to_string();
        Ok(true)
    }

    /// Moves the named column to index 0. Returns false when it does not exist.
    pub fn move_to_front(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(index) => {
                let column = self.columns.remove(index);
                self.columns.insert(0, column);
                true
            }
            None => false,
        }
    }

    /// Derives a free column name from `base` and `suffix`.
    ///
    /// Tries `base{suffix}` first, then `base{suffix}_2`, `base{suffix}_3`, ...
    pub fn unique_name(&self, base: &str, suffix: &str) -> String {
        let candidate = format!("{base}{suffix}");
        if !self.contains(&candidate) {
            return candidate;
        }
        let mut n = 2usize;
        loop {
            let name = format!("{candidate}_{n}");
            if !self.contains(&name) {
                return name;
            }
            n += 1;
        }
    }
}

/// Accumulates rows of `(name, value)` pairs into a [`Table`].
///
/// Columns appear in order of first appearance across rows; rows that lack a
/// column hold nulls there. A name repeated within one row keeps its last value.
#[derive(Debug, Default)]
pub struct TableBuilder {
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    height: usize,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_row<I>(&mut self, row: I)
    where
        I: IntoIterator<Item = (String, RawValue)>,
    {
        let row_index = self.height;
        self.height += 1;
        for (name, value) in row {
            let slot = match self.index.get(&name) {
                Some(&slot) => slot,
                None => {
                    let slot = self.columns.len();
                    self.columns.push(Column::nulls(name.clone(), row_index));
                    self.index.insert(name, slot);
                    slot
                }
            };
            let values = &mut self.columns[slot].values;
            if values.len() > row_index {
                values[row_index] = value;
            } else {
                values.push(value);
            }
        }
        for column in &mut self.columns {
            column.values.resize(self.height, RawValue::Null);
        }
    }

    pub fn finish(self) -> Table {
        Table {
            columns: self.columns,
            height: self.height,
        }
    }
}

/// How a source was recognised by the loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceShape {
    /// One JSON value per line.
    NewlineDelimited { parsed: usize, skipped: usize },
    /// A top-level JSON array.
    Array,
    /// A top-level object whose named member holds the rows.
    Wrapped { member: String },
    /// A top-level object taken as the single row.
    SingleObject,
    /// Concatenated JSON values not separated per line.
    Stream,
}

impl fmt::Display for SourceShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceShape::NewlineDelimited { parsed, skipped } => {
                write!(f, "newline-delimited ({parsed} parsed, {skipped} skipped)")
            }
            SourceShape::Array => f.write_str("array"),
            SourceShape::Wrapped { member } => write!(f, "wrapped in '{member}'"),
            SourceShape::SingleObject => f.write_str("single object"),
            SourceShape::Stream => f.write_str("value stream"),
        }
    }
}

/// One loaded source: its table, where it came from and how it was read.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    pub source: String,
    pub shape: SourceShape,
    pub table: Table,
}
