//! Semantic classification of columns.
//!
//! Classification is driven by the lowercased column name, matched against an
//! ordered rule table; the first rule with a matching substring wins:
//! 1. Datetime (`date`, `time`, `timestamp`, `created`, `updated`)
//! 2. PII email (`email`, `mail`)
//! 3. PII national id (`national`, `nid`, `ssn`)
//! 4. PII note (`note`)
//! 5. PII phone (`phone`, `msisdn`)
//! 6. PII without a masking rule (`id_number`): plain text
//!
//! Columns no rule claims are numeric when at least one value coerces to a
//! number, text otherwise. Values never override a name match.
//!
//! Substring matching is loose: `noted` and `notebook` are
//! masked as notes, `lifetime_value` is treated as a datetime.

use recon_model::{ColumnClass, RawValue};

struct NameRule {
    patterns: &'static [&'static str],
    class: ColumnClass,
}

const NAME_RULES: &[NameRule] = &[
    NameRule {
        patterns: &["date", "time", "timestamp", "created", "updated"],
        class: ColumnClass::Datetime,
    },
    NameRule {
        patterns: &["email", "mail"],
        class: ColumnClass::PiiEmail,
    },
    NameRule {
        patterns: &["national", "nid", "ssn"],
        class: ColumnClass::PiiNationalId,
    },
    NameRule {
        patterns: &["note"],
        class: ColumnClass::PiiNote,
    },
    NameRule {
        patterns: &["phone", "msisdn"],
        class: ColumnClass::PiiPhone,
    },
    // Recognised as PII but no mask applies; kept out of the numeric check.
    NameRule {
        patterns: &["id_number"],
        class: ColumnClass::Text,
    },
];

const PII_PATTERNS: &[&str] = &[
    "email",
    "mail",
    "national",
    "nid",
    "ssn",
    "id_number",
    "phone",
    "msisdn",
    "note",
    "notes",
];

/// Classifies a column from its name alone.
///
/// Returns `None` when no name rule applies and the values decide.
pub fn classify_name(name: &str) -> Option<ColumnClass> {
    let lower = name.to_lowercase();
    NAME_RULES
        .iter()
        .find(|rule| rule.patterns.iter().any(|p| lower.contains(p)))
        .map(|rule| rule.class)
}

/// Classifies a column from its name, falling back to its values.
pub fn classify_column(name: &str, values: &[RawValue]) -> ColumnClass {
    classify_name(name).unwrap_or_else(|| {
        if values.iter().any(|value| value.as_f64().is_some()) {
            ColumnClass::Numeric
        } else {
            ColumnClass::Text
        }
    })
}

/// Returns true when the name matches any PII pattern, masked or not.
pub fn is_pii_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    PII_PATTERNS.iter().any(|p| lower.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datetime_names() {
        for name in ["created_at", "TxDate", "event_time", "updated", "timestamp"] {
            assert_eq!(classify_name(name), Some(ColumnClass::Datetime), "{name}");
        }
    }

    #[test]
    fn test_datetime_wins_over_pii() {
        assert_eq!(
            classify_name("email_updated"),
            Some(ColumnClass::Datetime)
        );
    }

    #[test]
    fn test_pii_subclasses() {
        assert_eq!(classify_name("Email"), Some(ColumnClass::PiiEmail));
        assert_eq!(classify_name("mail_address"), Some(ColumnClass::PiiEmail));
        assert_eq!(classify_name("national_id"), Some(ColumnClass::PiiNationalId));
        assert_eq!(classify_name("user_nid"), Some(ColumnClass::PiiNationalId));
        assert_eq!(classify_name("SSN"), Some(ColumnClass::PiiNationalId));
        assert_eq!(classify_name("internal_notes"), Some(ColumnClass::PiiNote));
        assert_eq!(classify_name("phone_number"), Some(ColumnClass::PiiPhone));
        assert_eq!(classify_name("msisdn"), Some(ColumnClass::PiiPhone));
    }

    #[test]
    fn test_pii_without_mask_is_text() {
        assert_eq!(classify_name("id_number"), Some(ColumnClass::Text));
        assert!(is_pii_name("id_number"));
    }

    #[test]
    fn test_note_heuristic_is_loose() {
        assert_eq!(classify_name("notebook"), Some(ColumnClass::PiiNote));
        assert_eq!(classify_name("noted"), Some(ColumnClass::PiiNote));
    }

    #[test]
    fn test_value_fallback() {
        let numbers = vec![RawValue::Null, RawValue::from("n/a"), RawValue::from("12")];
        assert_eq!(classify_column("amount", &numbers), ColumnClass::Numeric);

        let words = vec![RawValue::from("gold"), RawValue::Null];
        assert_eq!(classify_column("tier", &words), ColumnClass::Text);

        assert_eq!(classify_column("empty", &[]), ColumnClass::Text);
    }

    #[test]
    fn test_name_rule_beats_numeric_values() {
        let values = vec![RawValue::from(123456789)];
        assert_eq!(classify_column("id_number", &values), ColumnClass::Text);
        assert_eq!(
            classify_column("national_id", &values),
            ColumnClass::PiiNationalId
        );
    }

    #[test]
    fn test_plain_names() {
        assert_eq!(classify_name("amount"), None);
        assert_eq!(classify_name("ID"), None);
        assert!(!is_pii_name("amount"));
    }
}
