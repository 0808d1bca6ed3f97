//! Shape detection and loading of JSON sources.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde_json::{Deserializer, Value};
use tracing::{debug, info, warn};

use recon_model::{RecordSet, SourceShape, Table, TableBuilder};

use crate::error::{IngestError, Result};
use crate::flatten::flatten_record;

/// Result of loading one source.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The source was recognised; the table may still have zero rows (`[]`).
    Loaded(RecordSet),
    /// No shape produced any records.
    Empty { source: String },
}

impl LoadOutcome {
    pub fn is_empty(&self) -> bool {
        matches!(self, LoadOutcome::Empty { .. })
    }

    pub fn source(&self) -> &str {
        match self {
            LoadOutcome::Loaded(set) => &set.source,
            LoadOutcome::Empty { source } => source,
        }
    }

    pub fn shape(&self) -> Option<&SourceShape> {
        match self {
            LoadOutcome::Loaded(set) => Some(&set.shape),
            LoadOutcome::Empty { .. } => None,
        }
    }

    /// The loaded table, or a table with no rows and no columns.
    pub fn into_table(self) -> Table {
        match self {
            LoadOutcome::Loaded(set) => set.table,
            LoadOutcome::Empty { .. } => Table::default(),
        }
    }
}

/// Reads a source file and loads it with [`load_text`].
///
/// The bytes are decoded as UTF-8; a byte-order mark is stripped and invalid
/// sequences are replaced.
///
/// # Errors
///
/// Returns an error only when the file cannot be read.
pub fn load_source(path: &Path) -> Result<LoadOutcome> {
    let bytes = fs::read(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let (text, _, had_errors) = encoding_rs::UTF_8.decode(&bytes);
    if had_errors {
        warn!(source = %path.display(), "source is not valid UTF-8, replaced invalid bytes");
    }
    Ok(load_text(&path.display().to_string(), &text))
}

/// Loads records from text of unknown JSON shape.
///
/// Shapes are tried in order:
/// 1. a complete JSON document (array, wrapping object or single object)
/// 2. newline-delimited values, when the text spans several lines
/// 3. a stream of concatenated values
///
/// A complete document is tried first because a multi-line document can
/// contain lines that parse on their own (`{"a": 1}` inside a pretty-printed
/// array); true newline-delimited input never parses as one document.
pub fn load_text(source: &str, text: &str) -> LoadOutcome {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        warn!(source, "source is empty");
        return LoadOutcome::Empty {
            source: source.to_string(),
        };
    }

    let detected = match serde_json::from_str::<Value>(trimmed) {
        Ok(document) => records_from_document(document),
        Err(error) => {
            debug!(source, %error, "not a single JSON document");
            records_from_lines(trimmed).or_else(|| records_from_stream(trimmed))
        }
    };

    match detected {
        Some((shape, records)) => {
            let table = build_table(records);
            info!(
                source,
                shape = %shape,
                rows = table.height(),
                columns = table.width(),
                "source loaded"
            );
            LoadOutcome::Loaded(RecordSet {
                source: source.to_string(),
                shape,
                table,
            })
        }
        None => {
            warn!(source, "no records recognised, using empty table");
            LoadOutcome::Empty {
                source: source.to_string(),
            }
        }
    }
}

fn records_from_document(document: Value) -> Option<(SourceShape, Vec<Value>)> {
    match document {
        Value::Array(items) => Some((SourceShape::Array, items)),
        Value::Object(map) => {
            let wrapped = map
                .iter()
                .find(|(_, value)| value.is_array())
                .map(|(member, _)| member.clone());
            match wrapped {
                Some(member) => {
                    let mut map = map;
                    let items = match map.remove(&member) {
                        Some(Value::Array(items)) => items,
                        _ => Vec::new(),
                    };
                    Some((SourceShape::Wrapped { member }, items))
                }
                None => Some((SourceShape::SingleObject, vec![Value::Object(map)])),
            }
        }
        // A bare scalar carries no records.
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => None,
    }
}

fn records_from_lines(text: &str) -> Option<(SourceShape, Vec<Value>)> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.len() < 2 {
        return None;
    }
    let mut records = Vec::with_capacity(lines.len());
    let mut skipped = 0usize;
    for (number, line) in lines.iter().enumerate() {
        match serde_json::from_str::<Value>(line) {
            Ok(value) => records.push(value),
            Err(error) => {
                skipped += 1;
                debug!(line = number + 1, %error, "skipping unparseable line");
            }
        }
    }
    if records.is_empty() {
        return None;
    }
    if skipped > 0 {
        warn!(parsed = records.len(), skipped, "dropped unparseable lines");
    }
    let shape = SourceShape::NewlineDelimited {
        parsed: records.len(),
        skipped,
    };
    Some((shape, records))
}

fn records_from_stream(text: &str) -> Option<(SourceShape, Vec<Value>)> {
    let records: Vec<Value> = Deserializer::from_str(text)
        .into_iter::<Value>()
        .collect::<std::result::Result<_, _>>()
        .ok()?;
    if records.is_empty() {
        None
    } else {
        Some((SourceShape::Stream, records))
    }
}

fn build_table(records: Vec<Value>) -> Table {
    let mut builder = TableBuilder::new();
    for record in records {
        builder.push_row(flatten_record(record));
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use recon_model::RawValue;

    fn loaded(text: &str) -> RecordSet {
        match load_text("test", text) {
            LoadOutcome::Loaded(set) => set,
            LoadOutcome::Empty { .. } => panic!("expected records from {text:?}"),
        }
    }

    #[test]
    fn test_array_document() {
        let set = loaded(r#"[{"a": 1}, {"b": "x"}, {"a": 2, "c": null}]"#);
        assert_eq!(set.shape, SourceShape::Array);
        assert_eq!(set.table.height(), 3);
        assert_eq!(
            set.table.column_names().collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn test_pretty_printed_array_is_not_newline_delimited() {
        let text = "[\n  {\"id\": 1},\n  {\"id\": 2}\n]\n";
        let set = loaded(text);
        assert_eq!(set.shape, SourceShape::Array);
        assert_eq!(set.table.height(), 2);
    }

    #[test]
    fn test_wrapped_document_uses_first_list_member() {
        let set = loaded(r#"{"count": 2, "data": [{"id": 1}, {"id": 2}], "other": [{"x": 0}]}"#);
        assert_eq!(
            set.shape,
            SourceShape::Wrapped {
                member: "data".to_string()
            }
        );
        assert_eq!(set.table.height(), 2);
        assert_eq!(set.table.column_names().collect::<Vec<_>>(), vec!["id"]);
    }

    #[test]
    fn test_single_object_document() {
        let set = loaded(r#"{"id": 1, "profile": {"email": "a@b.io"}}"#);
        assert_eq!(set.shape, SourceShape::SingleObject);
        assert_eq!(set.table.height(), 1);
        assert!(set.table.contains("profile.email"));
    }

    #[test]
    fn test_newline_delimited_drops_bad_lines() {
        let set = loaded("{\"id\": 1}\nnot json\n\n{\"id\": 3}\n");
        assert_eq!(
            set.shape,
            SourceShape::NewlineDelimited {
                parsed: 2,
                skipped: 1
            }
        );
        assert_eq!(
            set.table.column("id").unwrap().values,
            vec![RawValue::from(1), RawValue::from(3)]
        );
    }

    #[test]
    fn test_stream_fallback() {
        let set = loaded(r#"{"id": 1} {"id": 2}"#);
        assert_eq!(set.shape, SourceShape::Stream);
        assert_eq!(set.table.height(), 2);
    }

    #[test]
    fn test_empty_array_is_loaded_with_zero_rows() {
        let set = loaded("[]");
        assert_eq!(set.table.height(), 0);
        assert_eq!(set.table.width(), 0);
    }

    #[test]
    fn test_garbage_is_empty() {
        assert!(load_text("test", "").is_empty());
        assert!(load_text("test", "   \n  ").is_empty());
        assert!(load_text("test", "{not json").is_empty());
        assert!(load_text("test", "first line\nsecond line").is_empty());
        assert!(load_text("test", "42").is_empty());
    }

    #[test]
    fn test_empty_outcome_into_table() {
        let table = load_text("test", "nope").into_table();
        assert!(table.is_empty());
    }
}
