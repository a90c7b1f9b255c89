//! Error types for source ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during ingestion operations.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not readable.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Ledger Errors ===
    /// Failed to append to the ledger file.
    #[error("failed to append '{entry}' to ledger {path}: {source}")]
    LedgerWrite {
        path: PathBuf,
        entry: String,
        #[source]
        source: std::io::Error,
    },

    // === Workbook Errors ===
    /// The path is not a directory of per-sheet CSV exports.
    #[error("not a workbook export directory: {path}")]
    NotAWorkbookExport { path: PathBuf },

    /// A workbook file could not be opened or a sheet could not be decoded.
    #[error("failed to read workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    /// Requested sheet is missing from the workbook.
    #[error("sheet '{sheet}' not found in {workbook}")]
    SheetNotFound { workbook: PathBuf, sheet: String },

    /// Sheet does not have the column count its layout requires.
    #[error("sheet '{sheet}' has {actual} columns, layout expects {expected}")]
    SheetShape {
        sheet: String,
        expected: usize,
        actual: usize,
    },

    // === CSV Parsing Errors ===
    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    // === Feed Errors ===
    /// A JSON payload could not be decoded.
    #[error("invalid {context} payload: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The event feed is not a JSON array of objects.
    #[error("event feed must be an array of objects, found {found}")]
    EventShape { found: String },

    /// A requested statistics period has the wrong shape.
    #[error("invalid period '{value}', expected format '{expected}'")]
    InvalidPeriod {
        value: String,
        expected: &'static str,
    },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::SheetShape {
            sheet: "Stockholm".to_string(),
            expected: 3,
            actual: 5,
        };
        assert_eq!(
            err.to_string(),
            "sheet 'Stockholm' has 5 columns, layout expects 3"
        );
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("test".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
    }
}
