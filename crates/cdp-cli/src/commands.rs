//! Command implementations.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use cdp_ingest::{
    IngestionLedger, WorkbookFiles, flatten_records, list_workbooks, parse_statistics_response,
    validate_year_months, validate_years,
};
use cdp_model::KeyedRow;
use cdp_normalization::{
    CategoryMapper, CsvDirectorySink, DatasetSink, EVENT_FEED, NormalizedDataset,
    PipelineRunner, SPREADSHEET_FEED, STATISTICS_FEED, SpreadsheetBatch, event_feed,
    normalize_statistics, pending_workbooks, spreadsheet_feed,
};
use cdp_vocabulary::{CodeTables, EVENTS_TABLE, PeriodKind, SPREADSHEET_TABLE, StatisticsTable};
use comfy_table::{Cell, Table};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, info_span};

use cdp_cli::config::load_options;
use cdp_cli::summary::{RunSummary, print_summary};

use crate::cli::{EventsArgs, OutputArgs, SpreadsheetArgs, StatisticsArgs};

/// Separator joining nested event keys (`location.gps` → `location_gps`).
const KEY_SEPARATOR: &str = "_";

pub fn run_events(args: &EventsArgs) -> Result<RunSummary> {
    let span = info_span!("events", input = %args.input.display());
    let _guard = span.enter();

    let options = load_options(args.output.config.as_deref())?;
    let json = read_input(&args.input)?;
    let raw = flatten_records(&json, KEY_SEPARATOR)
        .with_context(|| format!("flatten events in {}", args.input.display()))?;
    info!(rows = raw.height(), columns = raw.width(), "events loaded");

    let mapper = builtin_mapper()?;
    let dataset = PipelineRunner::new(&mapper).run(&event_feed(&options), raw);
    finish(EVENT_FEED, EVENTS_TABLE, dataset, &args.output)
}

pub fn run_statistics(args: &StatisticsArgs) -> Result<RunSummary> {
    let table = StatisticsTable::from(args.table);
    let span = info_span!("statistics", table = %table);
    let _guard = span.enter();

    let options = load_options(args.output.config.as_deref())?;
    let json = read_input(&args.input)?;
    let mut rows = parse_statistics_response(&json)
        .with_context(|| format!("parse statistics response {}", args.input.display()))?;
    if !args.periods.is_empty() {
        rows = keep_periods(table, rows, &args.periods)?;
    }

    let mapper = builtin_mapper()?;
    let dataset = normalize_statistics(table, &rows, &mapper, &options)
        .with_context(|| format!("normalize {table}"))?;
    finish(STATISTICS_FEED, table.destination_table(), dataset, &args.output)
}

pub fn run_spreadsheets(args: &SpreadsheetArgs) -> Result<Option<RunSummary>> {
    let span = info_span!("spreadsheets", folder = %args.folder.display());
    let _guard = span.enter();

    let options = load_options(args.output.config.as_deref())?;
    let workbooks = list_workbooks(&args.folder)?;
    let mut ledger = IngestionLedger::load(&args.ledger)
        .with_context(|| format!("load ledger {}", args.ledger.display()))?;
    let pending: Vec<_> = pending_workbooks(&ledger, &workbooks)
        .into_iter()
        .cloned()
        .collect();
    if pending.is_empty() {
        info!(found = workbooks.len(), "no new workbooks");
        println!("No new workbooks in {}", args.folder.display());
        return Ok(None);
    }

    let source = WorkbookFiles::new();
    let mut batch = if args.output.dry_run {
        SpreadsheetBatch::unrecorded(&source)
    } else {
        SpreadsheetBatch::new(&source, &mut ledger)
    };
    let progress = ProgressBar::new(pending.len() as u64);
    if let Ok(style) = ProgressStyle::with_template(
        "  Folding    {bar:40.cyan/blue} {pos}/{len} workbooks [{elapsed_precise}] {msg}",
    ) {
        progress.set_style(style.progress_chars("##-"));
    }
    for workbook in &pending {
        progress.set_message(workbook.file_name.clone());
        batch
            .fold_workbook(workbook)
            .with_context(|| format!("fold {}", workbook.file_name))?;
        progress.inc(1);
    }
    progress.finish_and_clear();

    let (folded, mut report) = batch.finish()?;
    let mapper = builtin_mapper()?;
    let data = PipelineRunner::new(&mapper).run_with_report(
        &spreadsheet_feed(&options),
        folded,
        &mut report,
    );
    let dataset = NormalizedDataset { data, report };
    finish(SPREADSHEET_FEED, SPREADSHEET_TABLE, dataset, &args.output).map(Some)
}

pub fn run_regions() -> Result<()> {
    let tables = CodeTables::builtin()?;
    let mut table = Table::new();
    table.set_header(vec!["Code", "Region"]);
    for (code, name) in tables.region().iter() {
        table.add_row(vec![Cell::new(code), Cell::new(name)]);
    }
    println!("{table}");
    println!("{} regions", tables.region().len());
    Ok(())
}

fn builtin_mapper() -> Result<CategoryMapper> {
    let tables = CodeTables::builtin().context("load bundled code tables")?;
    Ok(CategoryMapper::new(tables))
}

fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

/// Keeps rows whose period dimension is one of `periods`.
fn keep_periods(
    table: StatisticsTable,
    rows: Vec<KeyedRow>,
    periods: &[String],
) -> Result<Vec<KeyedRow>> {
    let period_dimension = match table.period_kind() {
        PeriodKind::Year => {
            validate_years(periods)?;
            "year"
        }
        PeriodKind::YearMonth => {
            validate_year_months(periods)?;
            "year_month"
        }
    };
    let Some(position) = table
        .dimension_names()
        .iter()
        .position(|name| *name == period_dimension)
    else {
        return Ok(rows);
    };
    let before = rows.len();
    let kept: Vec<KeyedRow> = rows
        .into_iter()
        .filter(|row| row.key.get(position).is_some_and(|p| periods.contains(p)))
        .collect();
    info!(before, after = kept.len(), "filtered statistics rows by period");
    Ok(kept)
}

fn finish(
    recipe: &str,
    table: &str,
    mut dataset: NormalizedDataset,
    output: &OutputArgs,
) -> Result<RunSummary> {
    let written = if output.dry_run {
        None
    } else {
        let mut sink = CsvDirectorySink::new(&output.output_dir);
        Some(
            sink.write(table, &mut dataset.data)
                .with_context(|| format!("write table {table}"))?,
        )
    };
    let summary = RunSummary::new(recipe, table, &dataset, written);
    print_summary(&summary, &dataset.report);
    Ok(summary)
}
