use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic class a column is normalized under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnClass {
    Datetime,
    PiiEmail,
    PiiNationalId,
    PiiNote,
    PiiPhone,
    Numeric,
    Text,
}

impl ColumnClass {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnClass::Datetime => "datetime",
            ColumnClass::PiiEmail => "pii-email",
            ColumnClass::PiiNationalId => "pii-national-id",
            ColumnClass::PiiNote => "pii-note",
            ColumnClass::PiiPhone => "pii-phone",
            ColumnClass::Numeric => "numeric",
            ColumnClass::Text => "text",
        }
    }

    /// Returns true for the classes whose values are masked.
    pub fn is_pii(self) -> bool {
        matches!(
            self,
            ColumnClass::PiiEmail
                | ColumnClass::PiiNationalId
                | ColumnClass::PiiNote
                | ColumnClass::PiiPhone
        )
    }
}

impl fmt::Display for ColumnClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
