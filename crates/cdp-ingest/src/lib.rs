//! Source ingestion for the crime and demographics pipeline.
//!
//! This crate turns already-fetched raw inputs into polars frames or keyed
//! rows, and tracks which spreadsheet files have been folded already.
//!
//! # Features
//!
//! - **Ledger**: append-only record of processed workbook file names
//! - **Workbook discovery**: find `.xlsx`/`.xls` workbooks and pick the sheets to read
//! - **Sheet reading**: read one sheet through a [`WorkbookSource`]
//! - **Event feed**: flatten nested JSON records into a text frame
//! - **Statistics feed**: parse composite-key responses and validate periods
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use cdp_ingest::{IngestionLedger, list_workbooks};
//!
//! let ledger = IngestionLedger::load(Path::new("excel_files_log.txt"))?;
//! let workbooks = list_workbooks(Path::new("data/bra"))?;
//! let pending = ledger.filter_unprocessed(workbooks.iter().map(|w| w.file_name.as_str()));
//! ```

mod csv;
mod discovery;
mod error;
mod events;
mod file_meta;
mod ledger;
mod statistics;
mod workbook;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv::{CsvShape, read_csv_text};

// === Discovery ===
pub use discovery::{DiscoveredWorkbook, list_workbooks};
pub use file_meta::parse_source_file_name;

// === Ledger ===
pub use ledger::IngestionLedger;

// === Workbooks ===
pub use workbook::{
    CsvWorkbookExport, ExcelWorkbook, HEADERLESS_COLUMNS, SKIPPED_SHEETS, SheetLayout,
    WorkbookFiles, WorkbookSource, select_sheets,
};

// === Feeds ===
pub use events::flatten_records;
pub use statistics::{parse_statistics_response, validate_year_months, validate_years};
