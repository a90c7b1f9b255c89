//! Expected vocabularies for composite-key positions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// What values a key position is expected to hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vocabulary {
    /// A closed set of codes.
    Codes(BTreeSet<String>),
    /// Four-digit years (`2023`).
    Year,
    /// Year-month periods in the statistics API's `YYYYMmm` form (`2023M04`).
    YearMonth,
}

impl Vocabulary {
    pub fn codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Codes(codes.into_iter().map(Into::into).collect())
    }

    /// Whether `value` belongs to this vocabulary.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Self::Codes(codes) => codes.contains(value),
            Self::Year => is_year(value),
            Self::YearMonth => is_year_month(value),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Codes(codes) => format!("one of {} codes", codes.len()),
            Self::Year => "YYYY".to_string(),
            Self::YearMonth => "YYYYMmm".to_string(),
        }
    }
}

/// A named composite-key position with an optional expected vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionSpec {
    pub name: String,
    #[serde(default)]
    pub vocabulary: Option<Vocabulary>,
}

impl DimensionSpec {
    /// A dimension decoded by position alone.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vocabulary: None,
        }
    }

    #[must_use]
    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = Some(vocabulary);
        self
    }
}

/// `YYYY`.
pub fn is_year(value: &str) -> bool {
    value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit())
}

/// `YYYYMmm` with a month between 01 and 12.
pub fn is_year_month(value: &str) -> bool {
    let Some((year, month)) = value.split_once('M') else {
        return false;
    };
    is_year(year)
        && month.len() == 2
        && month
            .parse::<u32>()
            .is_ok_and(|month| (1..=12).contains(&month))
}
