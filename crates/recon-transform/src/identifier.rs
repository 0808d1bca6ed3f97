//! The `ID` column of the reconciled table.
//!
//! Transactions may carry their identifier under several names. Before the
//! merge the common spellings are renamed to `ID` in each source; after the
//! merge a few more alternates are tried, and when none exists an identifier
//! is synthesized from the row position. `ID` always ends up first.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use recon_model::{Column, RawValue, Table};

use crate::error::Result;

/// Name of the identifier column in the output.
pub const IDENTIFIER_COLUMN: &str = "ID";

const TRANSACTION_ID_NAMES: &[&str] = &["tx_id", "TXN_ID"];
const USER_ID_NAMES: &[&str] = &["tx_id"];
const ALTERNATE_ID_NAMES: &[&str] = &["txn_id", "transaction_id", "TXN", "txid"];

/// Prefix of synthesized identifiers (`TXN000001`, `TXN000002`, ...).
const SYNTHETIC_PREFIX: &str = "TXN";

/// Where the final `ID` column came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierOrigin {
    /// The transactions already had an `ID` column.
    Existing,
    /// An existing column was renamed to `ID`.
    Renamed(String),
    /// Generated from the 1-based row position.
    Synthesized,
}

impl IdentifierOrigin {
    /// Credits a rename made before the merge.
    ///
    /// [`ensure_identifier`] only sees the merged table, where a column
    /// renamed earlier already looks like an existing `ID`.
    pub fn with_adopted(self, adopted: Option<String>) -> Self {
        match (self, adopted) {
            (IdentifierOrigin::Existing, Some(from)) => IdentifierOrigin::Renamed(from),
            (origin, _) => origin,
        }
    }
}

impl fmt::Display for IdentifierOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierOrigin::Existing => f.write_str("existing"),
            IdentifierOrigin::Renamed(from) => write!(f, "renamed from '{from}'"),
            IdentifierOrigin::Synthesized => f.write_str("synthesized"),
        }
    }
}

fn adopt(table: &mut Table, candidates: &[&str]) -> Result<Option<String>> {
    if table.contains(IDENTIFIER_COLUMN) {
        return Ok(None);
    }
    for candidate in candidates {
        if table.rename_column(candidate, IDENTIFIER_COLUMN)? {
            debug!(from = *candidate, "identifier column renamed");
            return Ok(Some((*candidate).to_string()));
        }
    }
    Ok(None)
}

/// Renames `tx_id` or `TXN_ID` in the transactions to `ID`.
///
/// Nothing happens when `ID` already exists. Returns the renamed column.
pub fn adopt_transaction_identifier(transactions: &mut Table) -> Result<Option<String>> {
    adopt(transactions, TRANSACTION_ID_NAMES)
}

/// Renames `tx_id` in the users to `ID`, unless `ID` already exists.
pub fn adopt_user_identifier(users: &mut Table) -> Result<Option<String>> {
    adopt(users, USER_ID_NAMES)
}

/// `TXN000001` through `TXN{height:06}`.
pub fn synthesize_identifiers(height: usize) -> Vec<RawValue> {
    (1..=height)
        .map(|row| RawValue::Text(format!("{SYNTHETIC_PREFIX}{row:06}")))
        .collect()
}

/// Guarantees an `ID` column at index 0 of the merged table.
pub fn ensure_identifier(table: &mut Table) -> Result<IdentifierOrigin> {
    let origin = if table.contains(IDENTIFIER_COLUMN) {
        IdentifierOrigin::Existing
    } else if let Some(from) = adopt(table, ALTERNATE_ID_NAMES)? {
        IdentifierOrigin::Renamed(from)
    } else {
        let values = synthesize_identifiers(table.height());
        table.insert_column(0, Column::new(IDENTIFIER_COLUMN, values))?;
        info!(rows = table.height(), "no identifier column, synthesized one");
        IdentifierOrigin::Synthesized
    };
    table.move_to_front(IDENTIFIER_COLUMN);
    Ok(origin)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(table: &Table) -> Vec<&str> {
        table.column_names().collect()
    }

    #[test]
    fn test_transaction_identifier_renamed_once() {
        let mut tx = Table::from_columns(vec![
            Column::nulls("amount", 1),
            Column::nulls("TXN_ID", 1),
            Column::nulls("tx_id", 1),
        ])
        .unwrap();
        assert_eq!(
            adopt_transaction_identifier(&mut tx).unwrap().as_deref(),
            Some("tx_id")
        );
        assert_eq!(names(&tx), vec!["amount", "TXN_ID", "ID"]);
    }

    #[test]
    fn test_existing_identifier_is_kept() {
        let mut tx =
            Table::from_columns(vec![Column::nulls("ID", 1), Column::nulls("tx_id", 1)]).unwrap();
        assert_eq!(adopt_transaction_identifier(&mut tx).unwrap(), None);
        assert_eq!(names(&tx), vec!["ID", "tx_id"]);
    }

    #[test]
    fn test_user_identifier_only_tx_id() {
        let mut users = Table::from_columns(vec![Column::nulls("TXN_ID", 1)]).unwrap();
        assert_eq!(adopt_user_identifier(&mut users).unwrap(), None);
    }

    #[test]
    fn test_alternate_moved_to_front() {
        let mut table = Table::from_columns(vec![
            Column::nulls("amount", 2),
            Column::nulls("transaction_id", 2),
            Column::nulls("txid", 2),
        ])
        .unwrap();
        let origin = ensure_identifier(&mut table).unwrap();
        assert_eq!(origin, IdentifierOrigin::Renamed("transaction_id".to_string()));
        assert_eq!(names(&table), vec!["ID", "amount", "txid"]);
    }

    #[test]
    fn test_synthesized_identifiers() {
        let mut table = Table::from_columns(vec![Column::nulls("amount", 3)]).unwrap();
        let origin = ensure_identifier(&mut table).unwrap();
        assert_eq!(origin, IdentifierOrigin::Synthesized);
        assert_eq!(names(&table), vec!["ID", "amount"]);
        assert_eq!(
            table.column("ID").unwrap().values,
            vec![
                RawValue::from("TXN000001"),
                RawValue::from("TXN000002"),
                RawValue::from("TXN000003"),
            ]
        );
    }

    #[test]
    fn test_origin_credits_earlier_rename() {
        let origin = IdentifierOrigin::Existing.with_adopted(Some("tx_id".to_string()));
        assert_eq!(origin, IdentifierOrigin::Renamed("tx_id".to_string()));
        assert_eq!(
            IdentifierOrigin::Synthesized.with_adopted(None),
            IdentifierOrigin::Synthesized
        );
    }
}
