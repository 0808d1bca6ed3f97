//! Raw cell values as loaded from JSON sources.

use serde_json::{Number, Value};

/// A single loaded cell.
///
/// JSON objects never appear here: the loader flattens them into dotted column
/// names. Arrays (and empty objects, which have nothing to flatten) are kept
/// whole as [`RawValue::Nested`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawValue {
    #[default]
    Null,
    Bool(bool),
    /// Exact JSON number; integers are not widened to floats.
    Number(Number),
    Text(String),
    Nested(Value),
}

impl RawValue {
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// Coerces the value to a finite `f64`.
    ///
    /// Text is trimmed before parsing. `NaN` and infinities are rejected so
    /// they fall through to the text path of the numeric normalizer.
    pub fn as_f64(&self) -> Option<f64> {
        let parsed = match self {
            RawValue::Number(n) => n.as_f64(),
            RawValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    trimmed.parse::<f64>().ok()
                }
            }
            RawValue::Null | RawValue::Bool(_) | RawValue::Nested(_) => None,
        };
        parsed.filter(|v| v.is_finite())
    }

    /// Text form used when a value is stringified verbatim.
    ///
    /// Null renders as an empty string and nested values as compact JSON.
    pub fn to_text(&self) -> String {
        match self {
            RawValue::Null => String::new(),
            RawValue::Bool(b) => b.to_string(),
            RawValue::Number(n) => n.to_string(),
            RawValue::Text(s) => s.clone(),
            RawValue::Nested(v) => v.to_string(),
        }
    }

    /// Canonical form used to match join keys across sources.
    ///
    /// Returns `None` for null, which never matches. Integral numbers match
    /// their text spelling, so `7`, `7.0` and `"7"` share a key.
    pub fn join_key(&self) -> Option<String> {
        match self {
            RawValue::Null => None,
            RawValue::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
            RawValue::Number(n) => match n.as_f64() {
                Some(v) if v.fract() == 0.0 && v.abs() < 9.0e15 => Some(format!("{}", v as i64)),
                _ => Some(n.to_string()),
            },
            RawValue::Text(s) => Some(s.clone()),
            RawValue::Bool(_) | RawValue::Nested(_) => Some(self.to_text()),
        }
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RawValue::Null,
            Value::Bool(b) => RawValue::Bool(b),
            Value::Number(n) => RawValue::Number(n),
            Value::String(s) => RawValue::Text(s),
            nested @ (Value::Array(_) | Value::Object(_)) => RawValue::Nested(nested),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Number(Number::from(value))
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        RawValue::Number(Number::from(value))
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(RawValue::Null, RawValue::Number)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(RawValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_as_f64() {
        assert_eq!(RawValue::from(3).as_f64(), Some(3.0));
        assert_eq!(RawValue::from(" 2.5 ").as_f64(), Some(2.5));
        assert_eq!(RawValue::from("abc").as_f64(), None);
        assert_eq!(RawValue::from("").as_f64(), None);
        assert_eq!(RawValue::from("NaN").as_f64(), None);
        assert_eq!(RawValue::from("inf").as_f64(), None);
        assert_eq!(RawValue::Bool(true).as_f64(), None);
        assert_eq!(RawValue::Null.as_f64(), None);
    }

    #[test]
    fn test_to_text() {
        assert_eq!(RawValue::Null.to_text(), "");
        assert_eq!(RawValue::from(123456789).to_text(), "123456789");
        assert_eq!(RawValue::from(1.5).to_text(), "1.5");
        assert_eq!(RawValue::Bool(false).to_text(), "false");
        assert_eq!(RawValue::from(json!(["a", 1])).to_text(), r#"["a",1]"#);
    }

    #[test]
    fn test_join_key_unifies_integral_numbers() {
        assert_eq!(RawValue::from(7).join_key(), Some("7".to_string()));
        assert_eq!(RawValue::from(7.0).join_key(), Some("7".to_string()));
        assert_eq!(RawValue::from("7").join_key(), Some("7".to_string()));
        assert_eq!(RawValue::from(7.5).join_key(), Some("7.5".to_string()));
        assert_eq!(RawValue::Null.join_key(), None);
    }

    #[test]
    fn test_from_json_value() {
        assert_eq!(RawValue::from(json!(null)), RawValue::Null);
        assert_eq!(RawValue::from(json!("x")), RawValue::from("x"));
        assert!(matches!(RawValue::from(json!([1])), RawValue::Nested(_)));
        assert_eq!(RawValue::from(f64::NAN), RawValue::Null);
    }
}
