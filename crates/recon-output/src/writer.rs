//! CSV rendering of a string `DataFrame`.
//!
//! One header row, one line per frame row, no index column, `\n` line
//! endings. Fields are quoted only when they contain a delimiter, a quote or
//! a line break; empty strings are written bare.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use polars::prelude::{Column, DataFrame, StringChunked};
use tracing::info;

use crate::error::{OutputError, Result};

/// Writes `frame` as CSV to any writer.
///
/// Every column must be a string column; missing values are written empty.
pub fn write_csv_to<W: Write>(frame: &DataFrame, writer: W) -> Result<()> {
    let columns: Vec<&StringChunked> = frame
        .get_columns()
        .iter()
        .map(Column::str)
        .collect::<std::result::Result<_, _>>()?;

    let mut csv = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    csv.write_record(frame.get_column_names().iter().map(|name| name.as_str()))?;
    for row in 0..frame.height() {
        csv.write_record(columns.iter().map(|column| column.get(row).unwrap_or("")))?;
    }
    csv.flush()?;
    Ok(())
}

/// Renders `frame` as a CSV string.
pub fn to_csv_string(frame: &DataFrame) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv_to(frame, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Writes `frame` to `path`, creating parent directories as needed.
///
/// An existing file is overwritten.
pub fn write_csv(frame: &DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| OutputError::CreateFile {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let file = File::create(path).map_err(|source| OutputError::CreateFile {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    write_csv_to(frame, &mut writer)?;
    writer.flush()?;
    info!(
        path = %path.display(),
        rows = frame.height(),
        columns = frame.width(),
        "CSV written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(columns: Vec<(&str, Vec<&str>)>) -> DataFrame {
        DataFrame::new(
            columns
                .into_iter()
                .map(|(name, values)| Column::new(name.into(), values))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_quotes_only_when_needed() {
        let df = frame(vec![
            ("ID", vec!["TXN000001", "TXN000002"]),
            ("note", vec!["a, b", ""]),
            ("quote", vec!["say \"hi\"", "line\nbreak"]),
        ]);
        let csv = to_csv_string(&df).unwrap();
        assert_eq!(
            csv,
            "ID,note,quote\nTXN000001,\"a, b\",\"say \"\"hi\"\"\"\nTXN000002,,\"line\nbreak\"\n"
        );
    }

    #[test]
    fn test_header_only_for_empty_frame() {
        let df = frame(vec![("ID", vec![]), ("amount", vec![])]);
        assert_eq!(to_csv_string(&df).unwrap(), "ID,amount\n");
    }

    #[test]
    fn test_non_string_column_is_an_error() {
        let df = DataFrame::new(vec![Column::new("n".into(), vec![1i64, 2])]).unwrap();
        let err = to_csv_string(&df).unwrap_err();
        assert!(matches!(err, OutputError::Polars { .. }));
    }
}
