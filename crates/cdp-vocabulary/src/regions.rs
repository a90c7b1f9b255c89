//! Municipality code table loading.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::io::Cursor;

use cdp_model::CodeMap;
use serde::Deserialize;

use crate::embedded;
use crate::error::{Result, VocabularyError};

const SOURCE_NAME: &str = "region_codes.csv";

#[derive(Debug, Deserialize)]
struct RegionRow {
    code: String,
    name: String,
}

/// Load the bundled municipality table.
pub fn load_region_codes() -> Result<CodeMap> {
    load_region_codes_from_str(embedded::REGION_CODES)
}

/// Load a `code,name` table from CSV text.
///
/// Codes are kept verbatim (leading zeros matter); blank codes and duplicate
/// codes are rejected.
pub fn load_region_codes_from_str(content: &str) -> Result<CodeMap> {
    let cursor = Cursor::new(content.as_bytes());
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(cursor);

    let mut entries = BTreeMap::new();
    for record in reader.deserialize::<RegionRow>() {
        let row = record.map_err(|source| VocabularyError::CsvRead {
            source_name: SOURCE_NAME,
            source,
        })?;
        if row.code.trim().is_empty() || row.name.trim().is_empty() {
            return Err(VocabularyError::InvalidEntry {
                source_name: SOURCE_NAME,
                line: entries.len() as u64 + 2,
                reason: "code and name must be non-empty".to_string(),
            });
        }
        match entries.entry(row.code) {
            Entry::Occupied(entry) => {
                return Err(VocabularyError::DuplicateCode {
                    source_name: SOURCE_NAME,
                    code: entry.key().clone(),
                });
            }
            Entry::Vacant(entry) => {
                entry.insert(row.name);
            }
        }
    }
    Ok(CodeMap::new(entries))
}
