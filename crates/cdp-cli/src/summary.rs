//! Run summaries printed after each command.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde::Serialize;

use cdp_normalization::{NormalizationReport, NormalizedDataset, Severity};

/// Counts describing one normalized table.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub recipe: String,
    pub table: String,
    pub rows: usize,
    pub columns: usize,
    pub written: Option<usize>,
    pub duplicates_removed: usize,
    pub rows_dropped: usize,
    pub nulls_filled: usize,
    pub errors: usize,
    pub warnings: usize,
    /// Unmapped code count per column.
    pub unmapped: Vec<(String, usize)>,
}

impl RunSummary {
    pub fn new(
        recipe: &str,
        table: &str,
        dataset: &NormalizedDataset,
        written: Option<usize>,
    ) -> Self {
        let report = &dataset.report;
        Self {
            recipe: recipe.to_string(),
            table: table.to_string(),
            rows: dataset.data.height(),
            columns: dataset.data.width(),
            written,
            duplicates_removed: report.duplicates_removed,
            rows_dropped: report.rows_dropped,
            nulls_filled: report.nulls_filled,
            errors: report.count(Severity::Error),
            warnings: report.count(Severity::Warning),
            unmapped: report
                .unmapped
                .iter()
                .map(|(column, codes)| (column.clone(), codes.len()))
                .collect(),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

pub fn print_summary(summary: &RunSummary, report: &NormalizationReport) {
    println!("Recipe: {}", summary.recipe);
    println!("Table: {}", summary.table);
    println!("{}", summary_table(summary));
    if report.entries.iter().any(|e| e.severity != Severity::Info) {
        println!();
        println!("Issues:");
        println!("{}", issue_table(report));
    }
}

pub fn summary_table(summary: &RunSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Measure"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);

    table.add_row(vec![Cell::new("Rows"), Cell::new(summary.rows)]);
    table.add_row(vec![Cell::new("Columns"), Cell::new(summary.columns)]);
    table.add_row(vec![
        Cell::new("Written"),
        match summary.written {
            Some(rows) => Cell::new(rows).fg(Color::Green),
            None => dim_cell("dry run"),
        },
    ]);
    table.add_row(vec![
        Cell::new("Duplicates removed"),
        count_cell(summary.duplicates_removed, Color::Blue),
    ]);
    table.add_row(vec![
        Cell::new("Summary rows dropped"),
        count_cell(summary.rows_dropped, Color::Blue),
    ]);
    table.add_row(vec![
        Cell::new("Nulls filled"),
        count_cell(summary.nulls_filled, Color::Blue),
    ]);
    for (column, count) in &summary.unmapped {
        table.add_row(vec![
            Cell::new(format!("Unmapped codes in {column}")),
            count_cell(*count, Color::Yellow),
        ]);
    }
    table.add_row(vec![
        Cell::new("Errors").add_attribute(Attribute::Bold),
        count_cell(summary.errors, Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Warnings").add_attribute(Attribute::Bold),
        count_cell(summary.warnings, Color::Yellow),
    ]);
    table
}

fn issue_table(report: &NormalizationReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Step"),
        header_cell("Column"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);

    let mut entries: Vec<_> = report
        .entries
        .iter()
        .filter(|e| e.severity != Severity::Info)
        .collect();
    entries.sort_by(|a, b| b.severity.cmp(&a.severity));
    for entry in entries {
        table.add_row(vec![
            severity_cell(entry.severity),
            Cell::new(&entry.step),
            Cell::new(entry.column.as_deref().unwrap_or("-")),
            Cell::new(&entry.message),
        ]);
    }
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
        Severity::Info => dim_cell("INFO"),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
