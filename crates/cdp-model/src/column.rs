//! Semantic column types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The type a column was classified as during inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    /// Integer calendar year (`2023`).
    Year,
    /// Year and month rendered as `YYYY-MM`.
    YearMonth,
    /// Calendar date split out of a timestamp column.
    Date,
    /// `HH:MM` time of day split out of a timestamp column.
    Time,
    /// Whole numbers.
    Integer,
    /// Numbers with a fractional part somewhere in the column.
    Float,
    /// Anything that failed numeric coercion.
    Text,
}

impl SemanticType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::YearMonth => "year_month",
            Self::Date => "date",
            Self::Time => "time",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Text => "text",
        }
    }

    /// True for types produced by the temporal paths of inference.
    pub fn is_temporal(self) -> bool {
        matches!(self, Self::Year | Self::YearMonth | Self::Date | Self::Time)
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float | Self::Year)
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A column name together with its decided semantic type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub semantic_type: SemanticType,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, semantic_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            semantic_type,
        }
    }
}
