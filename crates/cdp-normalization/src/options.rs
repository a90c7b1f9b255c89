//! Configuration options for the normalization recipes.

use cdp_vocabulary::SUMMARY_MARKERS;
use serde::{Deserialize, Serialize};

use crate::dedupe::Keep;

/// Knobs shared by the built-in recipes.
///
/// Defaults reproduce the production pipeline; a JSON file with any subset of
/// these fields overrides them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Which row of a duplicate group survives deduplication.
    pub keep: Keep,

    /// Event types containing one of these phrases are summary rows.
    pub summary_markers: Vec<String>,

    /// Column checked against `summary_markers`.
    pub summary_column: String,

    /// Event feed columns that are dropped before typing.
    pub event_drop_columns: Vec<String>,

    /// Event feed column holding `lat,lon` text.
    pub coordinate_column: String,

    /// Final event column order.
    pub event_order: Vec<String>,

    /// Spreadsheet columns from older publications that are always dropped.
    pub legacy_columns: Vec<String>,

    /// Reorder applied to statistics output; `None` keeps decoded order.
    pub statistics_order: Option<Vec<String>>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            keep: Keep::First,
            summary_markers: SUMMARY_MARKERS.iter().map(|m| (*m).to_string()).collect(),
            summary_column: "type".to_string(),
            event_drop_columns: strings(&["id", "name", "url"]),
            coordinate_column: "location_gps".to_string(),
            event_order: strings(&[
                "date",
                "time",
                "location_name",
                "type",
                "summary",
                "longitude",
                "latitude",
            ]),
            legacy_columns: strings(&[
                "lagrum",
                "Antal brott i regionen där uppgift om kommun saknas",
            ]),
            statistics_order: None,
        }
    }
}

impl PipelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_keep(mut self, keep: Keep) -> Self {
        self.keep = keep;
        self
    }

    #[must_use]
    pub fn with_summary_markers(mut self, markers: Vec<String>) -> Self {
        self.summary_markers = markers;
        self
    }

    #[must_use]
    pub fn with_legacy_columns(mut self, columns: Vec<String>) -> Self {
        self.legacy_columns = columns;
        self
    }

    #[must_use]
    pub fn with_statistics_order(mut self, order: Option<Vec<String>>) -> Self {
        self.statistics_order = order;
        self
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}
