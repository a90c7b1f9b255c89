//! Fixed vocabulary shipped with the pipeline.
//!
//! - the municipality (region) code table, embedded at compile time
//! - the demographic code maps used by the statistics feed
//! - the marker phrases that identify summary rows in the event feed
//! - the catalog of statistics tables with their key layouts and column orders

pub mod codes;
pub mod embedded;
pub mod error;
pub mod markers;
pub mod regions;
pub mod tables;

pub use codes::{
    CodeTables, edu_level_codes, family_type_codes, gender_codes, marital_status_codes,
};
pub use error::{Result, VocabularyError};
pub use markers::SUMMARY_MARKERS;
pub use regions::{load_region_codes, load_region_codes_from_str};
pub use tables::{EVENTS_TABLE, SPREADSHEET_TABLE, PeriodKind, StatisticsTable};
