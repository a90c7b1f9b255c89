//! Demographic code maps and the injectable table set.

use std::collections::BTreeMap;

use cdp_model::CodeMap;

use crate::error::Result;
use crate::regions::load_region_codes;

/// Statistics bureau gender codes.
pub fn gender_codes() -> CodeMap {
    [("1", "male"), ("2", "female")].into_iter().collect()
}

/// Civil status codes.
pub fn marital_status_codes() -> CodeMap {
    [
        ("OG", "Single"),
        ("G", "Married"),
        ("SK", "Divorced"),
        ("ÄNKL", "Widow"),
    ]
    .into_iter()
    .collect()
}

/// Highest completed education level.
pub fn edu_level_codes() -> CodeMap {
    [
        ("1", "Less than 9 years"),
        ("2", "9-10 years"),
        ("3", "2 years high school"),
        ("4", "3 years high school"),
        ("5", "Post-secondary < 3 years"),
        ("6", "Post-secondary > 3 years"),
        ("7", "Unknown"),
    ]
    .into_iter()
    .collect()
}

/// Household family types.
pub fn family_type_codes() -> CodeMap {
    [
        ("EnsamMor", "Single mother"),
        ("EnsamFar", "Single father"),
        ("KarnFam", "Cohabiting original parents"),
        ("NyFam", "Cohabiting with a stepparent"),
        ("OvrFam", "Lives with someone other than parents"),
    ]
    .into_iter()
    .collect()
}

/// The immutable set of code tables handed to the category mapper.
///
/// `region` is held separately because it is applied implicitly; the
/// remaining maps are keyed by the column they decode.
#[derive(Debug, Clone, Default)]
pub struct CodeTables {
    region: CodeMap,
    columns: BTreeMap<String, CodeMap>,
}

impl CodeTables {
    pub fn new(region: CodeMap) -> Self {
        Self {
            region,
            columns: BTreeMap::new(),
        }
    }

    /// Bundled region table plus the four demographic maps.
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(load_region_codes()?)
            .with_column("gender", gender_codes())
            .with_column("marital_status", marital_status_codes())
            .with_column("edu_level", edu_level_codes())
            .with_column("family_type", family_type_codes()))
    }

    #[must_use]
    pub fn with_column(mut self, column: impl Into<String>, map: CodeMap) -> Self {
        self.columns.insert(column.into(), map);
        self
    }

    pub fn region(&self) -> &CodeMap {
        &self.region
    }

    /// Map registered for `column`; `region` resolves to the region table.
    pub fn for_column(&self, column: &str) -> Option<&CodeMap> {
        if column == "region" {
            Some(&self.region)
        } else {
            self.columns.get(column)
        }
    }

    /// Names of the columns with a registered map, `region` first.
    pub fn mapped_columns(&self) -> Vec<&str> {
        let mut names = vec!["region"];
        names.extend(self.columns.keys().map(String::as_str));
        names
    }
}
