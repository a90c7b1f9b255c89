//! Error types for vocabulary loading.

use thiserror::Error;

/// Errors that can occur when loading bundled vocabulary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VocabularyError {
    /// Failed to read or parse the CSV source.
    #[error("failed to read {source_name}: {source}")]
    CsvRead {
        source_name: &'static str,
        #[source]
        source: csv::Error,
    },

    /// A row is structurally valid CSV but not a usable entry.
    #[error("invalid entry on line {line} of {source_name}: {reason}")]
    InvalidEntry {
        source_name: &'static str,
        line: u64,
        reason: String,
    },

    /// The same code appears twice.
    #[error("duplicate code '{code}' in {source_name}")]
    DuplicateCode {
        source_name: &'static str,
        code: String,
    },

    /// A statistics table name that is not in the catalog.
    #[error("unknown statistics table '{name}'")]
    UnknownTable { name: String },
}

/// Result type for vocabulary operations.
pub type Result<T> = std::result::Result<T, VocabularyError>;
