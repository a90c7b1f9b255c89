//! End-to-end recipe runs on small realistic inputs.

use std::fs;

use cdp_ingest::{CsvWorkbookExport, IngestionLedger, flatten_records, list_workbooks, parse_statistics_response};
use cdp_model::KeyedRow;
use cdp_normalization::{
    CategoryMapper, NormalizationError, PipelineOptions, PipelineRunner, Severity,
    SpreadsheetBatch, decompose_keyed_rows, event_feed, normalize_statistics, pending_workbooks,
    spreadsheet_feed,
};
use cdp_vocabulary::{CodeTables, StatisticsTable};
use polars::prelude::*;
use tempfile::TempDir;

fn mapper() -> CategoryMapper {
    CategoryMapper::new(CodeTables::builtin().unwrap())
}

const EVENTS: &str = r#"[
  {"id": 1, "datetime": "2024-01-05 8:30:00 +01:00", "name": "5 januari 08.30, Rån, Solna",
   "summary": "Butiksrån", "url": "/a", "type": "Rån",
   "location": {"name": "Solna", "gps": "59.36,18.0"}},
  {"id": 1, "datetime": "2024-01-05 8:30:00 +01:00", "name": "5 januari 08.30, Rån, Solna",
   "summary": "Butiksrån", "url": "/a", "type": "Rån",
   "location": {"name": "Solna", "gps": "59.36,18.0"}},
  {"id": 2, "datetime": "2024-01-05 23:59:00 +01:00", "name": "Sammanfattning natt",
   "summary": "Lugn natt", "url": "/b", "type": "Sammanfattning natt",
   "location": {"name": "Kiruna", "gps": "67.85,20.22"}},
  {"id": 3, "datetime": "2024-01-06 02:10:00 +01:00", "name": "Stöld",
   "summary": "Cykelstöld", "url": "/c", "type": "Stöld",
   "location": {"name": "Uppsala", "gps": "59.86,17.64"}}
]"#;

#[test]
fn event_feed_produces_canonical_columns() {
    let raw = flatten_records(EVENTS, "_").unwrap();
    let mapper = mapper();
    let result = PipelineRunner::new(&mapper).run(&event_feed(&PipelineOptions::default()), raw);

    assert_eq!(
        result.data.get_column_names_str(),
        vec![
            "date",
            "time",
            "location_name",
            "type",
            "summary",
            "longitude",
            "latitude"
        ]
    );
    assert_eq!(result.data.height(), 2);
    assert_eq!(result.report.duplicates_removed, 1);
    assert_eq!(result.report.rows_dropped, 1);
    assert!(!result.report.has_errors(), "{:?}", result.report.entries);

    let time = result.data.column("time").unwrap();
    assert_eq!(time.get(0).unwrap(), AnyValue::String("08:30"));
    let lat = result.data.column("latitude").unwrap();
    assert_eq!(lat.dtype(), &DataType::Float64);
    assert_eq!(lat.get(1).unwrap(), AnyValue::Float64(59.86));
    assert_eq!(result.data.column("date").unwrap().dtype(), &DataType::Date);
}

#[test]
fn statistics_feed_maps_and_types_marital_status() {
    let json = r#"{"data": [
        {"key": ["0180", "OG", "20-24", "1", "2022"], "values": ["31050"]},
        {"key": ["0180", "G", "20-24", "2", "2022"], "values": ["2890"]},
        {"key": ["9999", "SK", "20-24", "2", "2022"], "values": [".."]}
    ]}"#;
    let rows = parse_statistics_response(json).unwrap();
    let result = normalize_statistics(
        StatisticsTable::MaritalStatus,
        &rows,
        &mapper(),
        &PipelineOptions::default(),
    )
    .unwrap();

    let df = &result.data;
    assert_eq!(
        df.get_column_names_str(),
        vec!["region", "gender", "year", "age_group", "marital_status", "num_individuals"]
    );
    assert_eq!(df.column("region").unwrap().get(0).unwrap(), AnyValue::String("Stockholm"));
    assert!(df.column("region").unwrap().get(2).unwrap().is_null());
    assert_eq!(df.column("gender").unwrap().get(1).unwrap(), AnyValue::String("female"));
    assert_eq!(
        df.column("marital_status").unwrap().get(2).unwrap(),
        AnyValue::String("Divorced")
    );
    assert_eq!(df.column("year").unwrap().get(0).unwrap(), AnyValue::Int32(2022));
    // ".." is not a number, so the measure stays text
    assert_eq!(df.column("num_individuals").unwrap().dtype(), &DataType::String);
    assert!(result.report.unmapped["region"].contains("9999"));
}

#[test]
fn social_benefits_periods_become_year_months() {
    let rows = vec![
        KeyedRow::new(["0180", "1", "20-64", "2023M01"], ["2.1", "1.5", "0.2", "3.8"]),
        KeyedRow::new(["0180", "2", "20-64", "2023M02"], ["2.0", "1.4", "0.1", "3.5"]),
    ];
    let result = normalize_statistics(
        StatisticsTable::SocialBenefits,
        &rows,
        &mapper(),
        &PipelineOptions::default(),
    )
    .unwrap();
    let period = result.data.column("year_month").unwrap();
    assert_eq!(period.get(1).unwrap(), AnyValue::String("2023-02"));
    assert_eq!(
        result.data.column("unemployment").unwrap().dtype(),
        &DataType::Float64
    );
}

#[test]
fn five_dimensions_with_four_element_key_fail() {
    let rows = vec![KeyedRow::new(["0180", "OG", "20-24", "1"], ["31050"])];
    let err = decompose_keyed_rows(
        &rows,
        &["region", "marital_status", "age_group", "gender", "year"],
        &["num_individuals"],
    )
    .unwrap_err();
    assert!(matches!(
        err,
        NormalizationError::KeyLengthMismatch {
            expected: 5,
            actual: 4,
            ..
        }
    ));
}

#[test]
fn spreadsheet_feed_fills_zero_and_drops_legacy_columns() {
    let df = df!(
        "lagrum" => [Some("3 kap"), Some("8 kap")],
        "x" => [Some("4"), None],
    )
    .unwrap();
    let mapper = mapper();
    let options = PipelineOptions::default();
    let result = PipelineRunner::new(&mapper).run(&spreadsheet_feed(&options), df);

    assert_eq!(result.data.get_column_names_str(), vec!["x"]);
    assert_eq!(result.data.column("x").unwrap().get(1).unwrap(), AnyValue::Int64(0));
    assert_eq!(result.report.nulls_filled, 1);
    assert!(result.report.entries.iter().all(|e| e.severity != Severity::Error));

    let again = PipelineRunner::new(&mapper).run(&spreadsheet_feed(&options), result.data);
    assert_eq!(again.data.get_column_names_str(), vec!["x"]);
    assert!(again.report.entries.is_empty());
}

#[test]
fn spreadsheet_folder_is_folded_once() {
    let root = TempDir::new().unwrap();
    let workbook = root.path().join("Anmalda_Stockholm-2023.xlsx");
    fs::create_dir(&workbook).unwrap();
    fs::write(workbook.join("0 Sammanfattning.csv"), "x\n").unwrap();
    fs::write(
        workbook.join("Solna.csv"),
        "Anmälda brott 2023\nBrottstyp,Antal anmälda brott,lagrum\nRån,12,\nStöld,,8 kap\n",
    )
    .unwrap();
    let ledger_path = root.path().join("excel_files_log.txt");

    let source = CsvWorkbookExport::new();
    let workbooks = list_workbooks(root.path()).unwrap();
    let mut ledger = IngestionLedger::load(&ledger_path).unwrap();
    let pending: Vec<_> = pending_workbooks(&ledger, &workbooks)
        .into_iter()
        .cloned()
        .collect();
    let mut batch = SpreadsheetBatch::new(&source, &mut ledger);
    for workbook in &pending {
        batch.fold_workbook(workbook).unwrap();
    }
    let (folded, _) = batch.finish().unwrap();
    let mapper = mapper();
    let result =
        PipelineRunner::new(&mapper).run(&spreadsheet_feed(&PipelineOptions::default()), folded);

    assert_eq!(
        result.data.get_column_names_str(),
        vec!["Brottstyp", "Antal anmälda brott", "kommun", "year", "region"]
    );
    let counts = result.data.column("Antal anmälda brott").unwrap();
    assert_eq!(counts.get(1).unwrap(), AnyValue::Int64(0));
    assert_eq!(result.data.column("year").unwrap().get(0).unwrap(), AnyValue::Int32(2023));

    let ledger = IngestionLedger::load(&ledger_path).unwrap();
    assert!(pending_workbooks(&ledger, &workbooks).is_empty());
}
