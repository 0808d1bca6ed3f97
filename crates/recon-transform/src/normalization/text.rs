//! Plain text columns.

use recon_model::RawValue;

/// Stringify and trim. Null becomes an empty string.
pub fn normalize_text(value: &RawValue) -> String {
    match value {
        RawValue::Text(text) => text.trim().to_string(),
        other => other.to_text().trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trims_and_stringifies() {
        assert_eq!(normalize_text(&RawValue::from("  gold \n")), "gold");
        assert_eq!(normalize_text(&RawValue::from(42)), "42");
        assert_eq!(normalize_text(&RawValue::Bool(false)), "false");
        assert_eq!(normalize_text(&RawValue::Null), "");
        assert_eq!(normalize_text(&RawValue::from(json!(["a", "b"]))), r#"["a","b"]"#);
    }
}
