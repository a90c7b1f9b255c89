//! CSV reading for sheet exports.

mod reader;

pub use reader::{CsvShape, read_csv_text};
