//! Declarative recipe definitions.
//!
//! A recipe is a named, ordered list of steps. Recipes serialize to JSON so
//! they can be inspected or supplied from a file.

use serde::{Deserialize, Serialize};

use crate::dedupe::Keep;

/// One normalization step (tagged by `op`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Remove duplicate rows, compared on `subset` or on all columns.
    DropDuplicates {
        #[serde(default)]
        subset: Option<Vec<String>>,
        #[serde(default)]
        keep: Keep,
    },

    /// Trim column names and drop the listed columns when present.
    DropColumns { columns: Vec<String> },

    /// Replace a `lat,lon` text column by `latitude` and `longitude`.
    SplitCoordinates { column: String },

    /// Classify and coerce every column.
    InferTypes,

    /// Replace codes with labels; all registered columns present when
    /// `columns` is omitted.
    MapCategories {
        #[serde(default)]
        columns: Option<Vec<String>>,
    },

    StandardizeColumnNames,

    /// Select exactly these columns, in this order.
    ReorderColumns { columns: Vec<String> },

    /// Remove rows whose `column` contains one of `markers`.
    DropSummaryRows {
        column: String,
        markers: Vec<String>,
    },

    FillMissingWithZero,
}

impl Step {
    /// Short name used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DropDuplicates { .. } => "drop_duplicates",
            Self::DropColumns { .. } => "drop_columns",
            Self::SplitCoordinates { .. } => "split_coordinates",
            Self::InferTypes => "infer_types",
            Self::MapCategories { .. } => "map_categories",
            Self::StandardizeColumnNames => "standardize_column_names",
            Self::ReorderColumns { .. } => "reorder_columns",
            Self::DropSummaryRows { .. } => "drop_summary_rows",
            Self::FillMissingWithZero => "fill_missing_with_zero",
        }
    }
}

/// A named recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    pub name: String,
    pub steps: Vec<Step>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    #[must_use]
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(Step::name).collect()
    }
}
