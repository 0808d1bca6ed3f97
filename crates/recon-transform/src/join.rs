//! Join key resolution and the transaction/user merge.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use recon_model::{Column, RawValue, Table};

use crate::error::Result;

/// Suffix appended to user columns whose name is already taken.
pub const USER_SUFFIX: &str = "_user";

/// Keys tried first, in order, when present in both tables.
const PREFERRED_JOIN_KEYS: &[&str] = &[
    "user_id",
    "customer_id",
    "client_id",
    "userId",
    "customerId",
];

/// Shared names never used as a fallback key (compared case-insensitively).
const EXCLUDED_JOIN_KEYS: &[&str] = &["id", "tx_id", "txn_id"];

/// How the two tables were combined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Left outer join on `key`; `matched_rows` transactions found a user.
    Joined { key: String, matched_rows: usize },
    /// No usable key: user columns were appended as all-null columns.
    Union,
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeStrategy::Joined { key, matched_rows } => {
                write!(f, "joined on '{key}' ({matched_rows} matched)")
            }
            MergeStrategy::Union => f.write_str("union (no join key)"),
        }
    }
}

/// The merged table and the strategy that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub table: Table,
    pub strategy: MergeStrategy,
}

/// Picks the column linking transactions to users.
///
/// A preferred key present in both tables wins; otherwise the first
/// transaction column also present in the users table, skipping identifier
/// names. Returns `None` when the tables share no usable column.
pub fn resolve_join_key(transactions: &Table, users: &Table) -> Option<String> {
    if let Some(key) = PREFERRED_JOIN_KEYS
        .iter()
        .find(|key| transactions.contains(key) && users.contains(key))
    {
        return Some((*key).to_string());
    }
    transactions
        .column_names()
        .filter(|name| {
            !EXCLUDED_JOIN_KEYS
                .iter()
                .any(|excluded| name.eq_ignore_ascii_case(excluded))
        })
        .find(|name| users.contains(name))
        .map(str::to_string)
}

/// Combines transactions with user attributes.
///
/// With a key present in both tables this is a left outer join: every
/// transaction row appears exactly once and in order, the first user row
/// with an equal key contributes its columns, and null keys never match.
/// User columns whose name is taken get [`USER_SUFFIX`] (plus a counter if
/// that is taken too). Without a key the user columns are appended as
/// all-null columns when their name is free.
pub fn merge(transactions: Table, users: &Table, key: Option<&str>) -> Result<MergeOutcome> {
    match key {
        Some(key) if transactions.contains(key) && users.contains(key) => {
            join_on(transactions, users, key)
        }
        Some(key) => {
            warn!(key, "join key missing from one side, falling back to union");
            union(transactions, users)
        }
        None => {
            warn!("no join key shared by transactions and users, falling back to union");
            union(transactions, users)
        }
    }
}

fn join_on(transactions: Table, users: &Table, key: &str) -> Result<MergeOutcome> {
    let user_rows = index_users(users, key);

    let matches: Vec<Option<usize>> = match transactions.column(key) {
        Some(column) => column
            .values
            .iter()
            .map(|value| value.join_key().and_then(|k| user_rows.get(&k).copied()))
            .collect(),
        None => vec![None; transactions.height()],
    };
    let matched_rows = matches.iter().filter(|m| m.is_some()).count();

    let mut merged = transactions;
    for column in users.columns().iter().filter(|c| c.name != key) {
        let name = if merged.contains(&column.name) {
            let renamed = merged.unique_name(&column.name, USER_SUFFIX);
            debug!(column = %column.name, renamed = %renamed, "user column renamed");
            renamed
        } else {
            column.name.clone()
        };
        let values = matches
            .iter()
            .map(|row| row.map_or(RawValue::Null, |r| column.values[r].clone()))
            .collect();
        merged.push_column(Column::new(name, values))?;
    }

    info!(
        key,
        rows = merged.height(),
        matched_rows,
        unmatched_rows = merged.height() - matched_rows,
        "transactions joined with users"
    );
    Ok(MergeOutcome {
        table: merged,
        strategy: MergeStrategy::Joined {
            key: key.to_string(),
            matched_rows,
        },
    })
}

/// Maps each non-null key to the first user row holding it.
fn index_users(users: &Table, key: &str) -> HashMap<String, usize> {
    let mut rows = HashMap::new();
    let mut duplicates = 0usize;
    if let Some(column) = users.column(key) {
        for (row, value) in column.values.iter().enumerate() {
            let Some(k) = value.join_key() else {
                continue;
            };
            match rows.entry(k) {
                Entry::Vacant(slot) => {
                    slot.insert(row);
                }
                Entry::Occupied(_) => duplicates += 1,
            }
        }
    }
    if duplicates > 0 {
        warn!(key, duplicates, "duplicate user keys, first occurrence wins");
    }
    rows
}

fn union(transactions: Table, users: &Table) -> Result<MergeOutcome> {
    let mut merged = transactions;
    let height = merged.height();
    let mut appended = 0usize;
    for column in users.columns() {
        if !merged.contains(&column.name) {
            merged.push_column(Column::nulls(column.name.clone(), height))?;
            appended += 1;
        }
    }
    info!(rows = height, appended, "user columns appended without join");
    Ok(MergeOutcome {
        table: merged,
        strategy: MergeStrategy::Union,
    })
}
