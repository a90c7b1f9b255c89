//! Spreadsheet source-file metadata.

use serde::{Deserialize, Serialize};

/// Sentinel used when a file name does not carry a region or a year.
pub const UNKNOWN: &str = "Unknown";

/// Metadata recovered from a `..._<region>-<year>...` workbook file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFileMeta {
    pub file_name: String,
    pub region: String,
    pub year: String,
}

impl SourceFileMeta {
    /// The year as a number, `None` for the `Unknown` sentinel.
    pub fn year_number(&self) -> Option<i32> {
        self.year.parse().ok()
    }
}
