use anyhow::Result;
use comfy_table::{Cell, CellAlignment, Table};
use tracing::{info_span, trace};

use recon_cli::logging::redact_value;
use recon_cli::pipeline::{clean_with_report, default_output_path, load};
use recon_cli::types::CleanReport;
use recon_ingest::LoadOutcome;
use recon_transform::classify_column;
use recon_transform::normalization::normalize_value;

use crate::cli::{CleanArgs, InspectArgs};
use crate::summary::{align_column, apply_table_style, class_cell, dim_cell, header_cell};

pub fn run_clean(args: &CleanArgs) -> Result<CleanReport> {
    let output = if args.dry_run {
        None
    } else {
        Some(
            args.output
                .clone()
                .unwrap_or_else(|| default_output_path(&args.transactions)),
        )
    };
    let (_, report) = clean_with_report(&args.users, &args.transactions, output.as_deref())?;
    Ok(report)
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let span = info_span!("inspect", source = %args.source.display());
    let _guard = span.enter();

    let outcome = load(&args.source, "source")?;
    let set = match outcome {
        LoadOutcome::Loaded(set) => set,
        LoadOutcome::Empty { source } => {
            println!("Source: {source}");
            println!("No records recognised.");
            return Ok(());
        }
    };

    println!("Source: {}", set.source);
    println!("Shape: {}", set.shape);
    println!("Rows: {}", set.table.height());

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Class"),
        header_cell("Non-null"),
        header_cell("Preview"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);

    for column in set.table.columns() {
        let class = classify_column(&column.name, &column.values);
        let non_null = column.values.iter().filter(|v| !v.is_null()).count();
        let first = column.values.iter().find(|v| !v.is_null());
        if let Some(value) = first {
            trace!(column = %column.name, value = redact_value(&value.to_text()), "first value");
        }
        let preview = match first {
            Some(value) => Cell::new(normalize_value(class, value)),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(&column.name),
            class_cell(class),
            Cell::new(non_null),
            preview,
        ]);
    }
    println!("{table}");
    Ok(())
}
