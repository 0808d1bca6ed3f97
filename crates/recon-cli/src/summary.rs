use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use recon_cli::types::{CleanReport, SourceSummary};
use recon_model::ColumnClass;

pub fn print_summary(report: &CleanReport) {
    print_source("Users", &report.users);
    print_source("Transactions", &report.transactions);
    println!("Merge: {}", report.merge);
    println!("Identifier: {}", report.identifier);
    match &report.output {
        Some(path) => println!("Output: {}", path.display()),
        None => println!("Output: (dry run, nothing written)"),
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Column"),
        header_cell("Class"),
        header_cell("Blanked"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);

    let mut total_blanked = 0usize;
    for (index, column) in report.columns.iter().enumerate() {
        total_blanked += column.blanked;
        table.add_row(vec![
            dim_cell(index),
            Cell::new(&column.name),
            class_cell(column.class),
            count_cell(column.blanked),
        ]);
    }
    table.add_row(vec![
        dim_cell("-"),
        Cell::new(format!("{} rows", report.rows))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} columns", report.columns.len()))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_blanked).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

fn print_source(label: &str, source: &SourceSummary) {
    match &source.shape {
        Some(shape) => println!(
            "{label}: {} ({shape}, {} rows, {} columns)",
            source.path.display(),
            source.rows,
            source.columns
        ),
        None => println!("{label}: {} (no records recognised)", source.path.display()),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// PII classes stand out; plain classes are dimmed.
pub fn class_cell(class: ColumnClass) -> Cell {
    let cell = Cell::new(class.as_str());
    if class.is_pii() {
        return cell.fg(Color::Magenta).add_attribute(Attribute::Bold);
    }
    match class {
        ColumnClass::Datetime => cell.fg(Color::Blue),
        ColumnClass::Numeric => cell.fg(Color::Green),
        _ => cell.fg(Color::DarkGrey),
    }
}

fn count_cell(count: usize) -> Cell {
    if count == 0 {
        dim_cell(count)
    } else {
        Cell::new(count).fg(Color::Yellow)
    }
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
