//! Flattening of JSON records into named cells.

use serde_json::Value;

use recon_model::RawValue;

/// Column that receives records which are not JSON objects.
pub const VALUE_COLUMN: &str = "value";

/// Flattens one record into `(column, value)` pairs.
///
/// Nested objects become dotted names (`address.city`), recursively. Arrays and
/// empty objects stay whole in a single cell. A record that is not an object is
/// stored under [`VALUE_COLUMN`].
pub fn flatten_record(record: Value) -> Vec<(String, RawValue)> {
    let mut cells = Vec::new();
    match record {
        Value::Object(map) => {
            for (key, value) in map {
                flatten_into(key, value, &mut cells);
            }
        }
        other => cells.push((VALUE_COLUMN.to_string(), RawValue::from(other))),
    }
    cells
}

fn flatten_into(name: String, value: Value, cells: &mut Vec<(String, RawValue)>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, nested) in map {
                flatten_into(format!("{name}.{key}"), nested, cells);
            }
        }
        other => cells.push((name, RawValue::from(other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(cells: &[(String, RawValue)]) -> Vec<&str> {
        cells.iter().map(|(name, _)| name.as_str()).collect()
    }

    #[test]
    fn test_flat_record() {
        let cells = flatten_record(json!({"id": 1, "name": "Awa"}));
        assert_eq!(names(&cells), vec!["id", "name"]);
        assert_eq!(cells[1].1, RawValue::from("Awa"));
    }

    #[test]
    fn test_nested_objects_use_dotted_names() {
        let cells = flatten_record(json!({
            "user": {"id": 7, "address": {"city": "Dakar"}},
            "amount": 10
        }));
        assert_eq!(
            names(&cells),
            vec!["user.id", "user.address.city", "amount"]
        );
    }

    #[test]
    fn test_arrays_and_empty_objects_stay_whole() {
        let cells = flatten_record(json!({"tags": ["a", "b"], "meta": {}}));
        assert_eq!(names(&cells), vec!["tags", "meta"]);
        assert_eq!(cells[0].1, RawValue::Nested(json!(["a", "b"])));
        assert_eq!(cells[1].1, RawValue::Nested(json!({})));
    }

    #[test]
    fn test_scalar_record() {
        let cells = flatten_record(json!(42));
        assert_eq!(cells, vec![(VALUE_COLUMN.to_string(), RawValue::from(42))]);
    }
}
