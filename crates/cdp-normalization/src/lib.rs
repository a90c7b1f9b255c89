//! Normalization engine for the crime and demographics pipeline.
//!
//! Turns raw event, statistics and spreadsheet frames into typed, labelled
//! datasets ready for storage.
//!
//! # Overview
//!
//! This crate provides:
//! - **Type inference**: per-column classification into year, year-month,
//!   date/time, integer, float or text, with coercion
//! - **Key decoding**: composite statistics keys expanded into named columns
//! - **Category mapping**: code to label substitution with unmapped tracking
//! - **Deduplication** and column-level cleanup steps
//! - **Recipes**: declarative step lists for each source type, run by a
//!   single [`PipelineRunner`]
//! - **Spreadsheet folding** guarded by the ingestion ledger
//!
//! # Example
//!
//! ```ignore
//! use cdp_normalization::{CategoryMapper, PipelineOptions, PipelineRunner, event_feed};
//! use cdp_vocabulary::CodeTables;
//!
//! let mapper = CategoryMapper::new(CodeTables::builtin()?);
//! let result = PipelineRunner::new(&mapper).run(&event_feed(&PipelineOptions::default()), events);
//! for entry in &result.report.entries {
//!     println!("{} {}: {}", entry.severity, entry.step, entry.message);
//! }
//! ```
//!
//! # Failure model
//!
//! - A column that cannot be coerced keeps its previous state
//! - A step that cannot run returns its input unchanged
//! - Both are recorded in the [`NormalizationReport`]; only key decoding and
//!   I/O return errors

mod batch;
mod columns;
mod coordinates;
mod decoder;
mod dedupe;
mod error;
mod frame;
mod inference;
mod mapper;
mod options;
mod pipeline;
mod recipes;
mod report;
mod sink;
mod temporal;

// Error type
pub use error::{NormalizationError, Result};

// Reporting and configuration
pub use options::PipelineOptions;
pub use report::{NormalizationReport, ReportEntry, Severity};

// Steps
pub use columns::{
    drop_columns, drop_summary_rows, fill_missing_with_zero, reorder_columns,
    standardize_column_names, standardize_name,
};
pub use coordinates::{LATITUDE_COLUMN, LONGITUDE_COLUMN, split_coordinates};
pub use decoder::{KeyedRowDecoder, decompose_keyed_rows};
pub use dedupe::{Keep, drop_duplicates};
pub use inference::{DATE_COLUMN, TIME_COLUMN, infer_and_coerce};
pub use mapper::CategoryMapper;

// Recipes and execution
pub use pipeline::{NormalizedDataset, Pipeline, PipelineRunner, Step};
pub use recipes::{
    EVENT_FEED, SPREADSHEET_FEED, STATISTICS_FEED, event_feed, normalize_statistics,
    spreadsheet_feed, statistics_feed,
};

// Spreadsheet folding and output
pub use batch::{
    MUNICIPALITY_COLUMN, REGION_COLUMN, SpreadsheetBatch, YEAR_COLUMN, pending_workbooks,
};
pub use frame::concat_union;
pub use sink::{CsvDirectorySink, DatasetSink};
