//! CSV file reading with explicit header placement.
//!
//! Every column is read as text. Type decisions belong to inference, not to
//! the reader, so no schema is sniffed here.

use std::path::Path;

use polars::prelude::*;

use crate::error::{IngestError, Result};

/// Where the header sits in a CSV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvShape {
    /// Lines skipped before the header (or before data when headerless).
    pub skip_rows: usize,
    /// Whether the first non-skipped line holds column names.
    pub has_header: bool,
}

impl CsvShape {
    pub const fn header_at(skip_rows: usize) -> Self {
        Self {
            skip_rows,
            has_header: true,
        }
    }

    pub const fn headerless(skip_rows: usize) -> Self {
        Self {
            skip_rows,
            has_header: false,
        }
    }
}

/// Reads a CSV file into a Polars DataFrame with every column as `String`.
pub fn read_csv_text(path: &Path, shape: CsvShape) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let df = CsvReadOptions::default()
        .with_has_header(shape.has_header)
        .with_skip_rows(shape.skip_rows)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "read csv"
    );
    Ok(df)
}
