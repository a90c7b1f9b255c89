//! Error types for normalization.
//!
//! Only structural problems are errors. Per-column failures inside a recipe
//! are recorded in the [`NormalizationReport`](crate::NormalizationReport)
//! and never escape.

use std::path::PathBuf;

use cdp_ingest::IngestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizationError {
    // === Composite-key decoding ===
    /// A key does not have one element per declared dimension.
    #[error("row {row}: key has {actual} elements, expected {expected} dimensions")]
    KeyLengthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// A value array does not have one element per declared metric.
    #[error("row {row}: {actual} values, expected {expected} metrics")]
    ValueLengthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Most of a key position falls outside its expected vocabulary, which
    /// means the declared dimension order does not match the data.
    #[error(
        "dimension '{dimension}': {rejected} of {total} values are not {expected} (e.g. {examples})"
    )]
    DimensionVocabulary {
        dimension: String,
        expected: String,
        rejected: usize,
        total: usize,
        examples: String,
    },

    /// The same output column was declared twice.
    #[error("column '{name}' is declared more than once")]
    DuplicateColumn { name: String },

    // === Collaborators ===
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Failed to write a dataset to its destination.
    #[error("failed to write {path}: {source}")]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The header of an existing destination file could not be read.
    #[error("failed to read header of {path}: {source}")]
    SinkHeader {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The dataset has columns the existing destination file lacks.
    #[error("{path} has no column(s) {columns}")]
    SinkColumns { path: PathBuf, columns: String },

    // === DataFrame Errors ===
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for NormalizationError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for normalization operations.
pub type Result<T> = std::result::Result<T, NormalizationError>;
