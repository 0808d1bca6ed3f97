//! Reconciliation pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Load**: read both sources, detect their shape, flatten records
//! 2. **Merge**: adopt identifier columns, resolve the join key, join or union
//! 3. **Identifier**: guarantee a single `ID` column in first position
//! 4. **Normalize**: classify every column and stringify every value
//! 5. **Output**: persist the frame as CSV (skipped on a dry run)
//!
//! Content problems never stop a run; only unreadable sources and an
//! unwritable destination are errors.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{debug, info, info_span, trace};

use recon_ingest::{LoadOutcome, load_source};
use recon_model::Table;
use recon_output::write_csv;
use recon_transform::{
    IdentifierOrigin, MergeStrategy, NormalizedTable, adopt_transaction_identifier,
    adopt_user_identifier, ensure_identifier, merge, normalize_table, resolve_join_key,
};

use crate::logging::redact_value;
use crate::types::{CleanReport, SourceSummary};

/// File name used when no destination is given.
pub const DEFAULT_OUTPUT_NAME: &str = "cleaned.csv";

/// `cleaned.csv` in the directory holding the transactions.
pub fn default_output_path(transactions: &Path) -> PathBuf {
    transactions
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(DEFAULT_OUTPUT_NAME)
}

/// Loads, reconciles and normalizes both sources, then writes `output`.
///
/// Returns exactly the frame that was written.
pub fn clean(users: &Path, transactions: &Path, output: &Path) -> Result<DataFrame> {
    let (frame, _) = clean_with_report(users, transactions, Some(output))?;
    Ok(frame)
}

/// Like [`clean`], with a report of every decision taken. Nothing is written
/// when `output` is `None`.
pub fn clean_with_report(
    users: &Path,
    transactions: &Path,
    output: Option<&Path>,
) -> Result<(DataFrame, CleanReport)> {
    let span = info_span!(
        "clean",
        users = %users.display(),
        transactions = %transactions.display()
    );
    let _guard = span.enter();
    let start = Instant::now();

    let users_outcome = load(users, "users")?;
    let transactions_outcome = load(transactions, "transactions")?;
    let users_summary = summarize(users, &users_outcome);
    let transactions_summary = summarize(transactions, &transactions_outcome);

    let reconciled = reconcile(users_outcome.into_table(), transactions_outcome.into_table())?;

    if let Some(path) = output {
        info_span!("output", path = %path.display()).in_scope(|| -> Result<()> {
            write_csv(&reconciled.normalized.frame, path)
                .with_context(|| format!("write {}", path.display()))
        })?;
    }

    let report = CleanReport {
        users: users_summary,
        transactions: transactions_summary,
        merge: reconciled.merge,
        identifier: reconciled.identifier,
        rows: reconciled.normalized.frame.height(),
        columns: reconciled.normalized.columns,
        output: output.map(Path::to_path_buf),
    };
    info!(
        rows = report.rows,
        columns = report.columns.len(),
        merge = %report.merge,
        identifier = %report.identifier,
        dry_run = output.is_none(),
        duration_ms = start.elapsed().as_millis(),
        "clean complete"
    );
    Ok((reconciled.normalized.frame, report))
}

/// Reads one source. Missing or unreadable files are errors; unrecognised
/// content is an empty outcome.
pub fn load(path: &Path, role: &str) -> Result<LoadOutcome> {
    info_span!("load", role, path = %path.display()).in_scope(|| -> Result<_> {
        let start = Instant::now();
        let outcome =
            load_source(path).with_context(|| format!("load {role} from {}", path.display()))?;
        debug!(
            role,
            empty = outcome.is_empty(),
            duration_ms = start.elapsed().as_millis(),
            "load complete"
        );
        Ok(outcome)
    })
}

fn summarize(path: &Path, outcome: &LoadOutcome) -> SourceSummary {
    let (rows, columns) = match outcome {
        LoadOutcome::Loaded(set) => (set.table.height(), set.table.width()),
        LoadOutcome::Empty { .. } => (0, 0),
    };
    SourceSummary {
        path: path.to_path_buf(),
        shape: outcome.shape().cloned(),
        rows,
        columns,
    }
}

/// Output of the in-memory stages.
#[derive(Debug)]
pub struct Reconciled {
    pub normalized: NormalizedTable,
    pub merge: MergeStrategy,
    pub identifier: IdentifierOrigin,
}

/// Merges, places the identifier and normalizes. Pure with respect to the
/// filesystem.
pub fn reconcile(mut users: Table, mut transactions: Table) -> Result<Reconciled> {
    let (merged, merge_strategy, adopted) = info_span!("merge").in_scope(|| -> Result<_> {
        let start = Instant::now();
        let adopted = adopt_transaction_identifier(&mut transactions)
            .context("rename transaction identifier")?;
        adopt_user_identifier(&mut users).context("rename user identifier")?;

        let key = resolve_join_key(&transactions, &users);
        if let Some(key) = key.as_deref()
            && let Some(first) = transactions
                .column(key)
                .and_then(|column| column.values.first())
        {
            trace!(key, sample = redact_value(&first.to_text()), "join key resolved");
        }
        let outcome = merge(transactions, &users, key.as_deref()).context("merge sources")?;
        info!(
            strategy = %outcome.strategy,
            rows = outcome.table.height(),
            columns = outcome.table.width(),
            duration_ms = start.elapsed().as_millis(),
            "merge complete"
        );
        Ok((outcome.table, outcome.strategy, adopted))
    })?;

    let mut merged = merged;
    let identifier = ensure_identifier(&mut merged)
        .context("place identifier column")?
        .with_adopted(adopted);
    debug!(identifier = %identifier, "identifier column placed");

    let normalized = info_span!("normalize").in_scope(|| -> Result<_> {
        let start = Instant::now();
        let normalized = normalize_table(merged).context("normalize columns")?;
        info!(
            rows = normalized.frame.height(),
            columns = normalized.columns.len(),
            duration_ms = start.elapsed().as_millis(),
            "normalize complete"
        );
        Ok(normalized)
    })?;

    Ok(Reconciled {
        normalized,
        merge: merge_strategy,
        identifier,
    })
}
