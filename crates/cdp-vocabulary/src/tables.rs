//! Statistics table catalog.
//!
//! Each table the statistics API is queried for has a fixed key layout (the
//! order of dimensions inside every composite key), a fixed list of measures,
//! a canonical output column order and a destination table name.

use std::fmt;
use std::str::FromStr;

use cdp_model::{CodeMap, DimensionSpec, Vocabulary};
use serde::{Deserialize, Serialize};

use crate::codes::{edu_level_codes, family_type_codes, gender_codes, marital_status_codes};
use crate::error::VocabularyError;

/// Destination table for the cleaned police event feed.
pub const EVENTS_TABLE: &str = "polis_data";

/// Destination table for the folded crime-statistics spreadsheets.
pub const SPREADSHEET_TABLE: &str = "bra_data";

/// How a table's period dimension is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodKind {
    /// `YYYY`
    Year,
    /// `YYYYMmm`
    YearMonth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticsTable {
    MaritalStatus,
    Education,
    HouseholdsWithChildren,
    SocialBenefits,
}

impl StatisticsTable {
    pub const fn all() -> &'static [StatisticsTable] {
        &[
            Self::MaritalStatus,
            Self::Education,
            Self::HouseholdsWithChildren,
            Self::SocialBenefits,
        ]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::MaritalStatus => "marital_status",
            Self::Education => "education",
            Self::HouseholdsWithChildren => "households_with_children",
            Self::SocialBenefits => "social_benefits",
        }
    }

    pub const fn destination_table(self) -> &'static str {
        match self {
            Self::MaritalStatus => "scb_marital_status_data",
            Self::Education => "scb_education_data",
            Self::HouseholdsWithChildren => "scb_household_data",
            Self::SocialBenefits => "scb_social_benefits_data",
        }
    }

    pub const fn period_kind(self) -> PeriodKind {
        match self {
            Self::SocialBenefits => PeriodKind::YearMonth,
            _ => PeriodKind::Year,
        }
    }

    /// Dimension names in key order.
    pub fn dimension_names(self) -> &'static [&'static str] {
        match self {
            Self::MaritalStatus => &["region", "marital_status", "age_group", "gender", "year"],
            Self::Education => &["region", "gender", "age_group", "edu_level", "year"],
            Self::HouseholdsWithChildren => &[
                "region",
                "age_group",
                "family_type",
                "num_children",
                "year",
            ],
            Self::SocialBenefits => &["region", "gender", "age_group", "year_month"],
        }
    }

    /// Measure names in value order.
    pub fn metric_names(self) -> &'static [&'static str] {
        match self {
            Self::MaritalStatus | Self::Education => &["num_individuals"],
            Self::HouseholdsWithChildren => &["num_families"],
            Self::SocialBenefits => &[
                "unemployment",
                "economic_assistance",
                "establishment_allowance",
                "proportion_of_population",
            ],
        }
    }

    /// Column order of the cleaned table.
    pub fn canonical_order(self) -> &'static [&'static str] {
        match self {
            Self::MaritalStatus => &[
                "region",
                "gender",
                "year",
                "age_group",
                "marital_status",
                "num_individuals",
            ],
            Self::Education => &[
                "region",
                "gender",
                "age_group",
                "edu_level",
                "year",
                "num_individuals",
            ],
            Self::HouseholdsWithChildren => &[
                "region",
                "age_group",
                "family_type",
                "num_children",
                "year",
                "num_families",
            ],
            Self::SocialBenefits => &[
                "region",
                "gender",
                "age_group",
                "year_month",
                "unemployment",
                "economic_assistance",
                "establishment_allowance",
                "proportion_of_population",
            ],
        }
    }

    /// Dimension specs with the vocabulary each key position must come from.
    pub fn dimensions(self, region_codes: &CodeMap) -> Vec<DimensionSpec> {
        self.dimension_names()
            .iter()
            .map(|&name| {
                let spec = DimensionSpec::named(name);
                match self.vocabulary_for(name, region_codes) {
                    Some(vocabulary) => spec.with_vocabulary(vocabulary),
                    None => spec,
                }
            })
            .collect()
    }

    fn vocabulary_for(self, dimension: &str, region_codes: &CodeMap) -> Option<Vocabulary> {
        let vocabulary = match dimension {
            "region" => Vocabulary::codes(region_codes.codes()),
            "gender" => Vocabulary::codes(gender_codes().codes()),
            "marital_status" => Vocabulary::codes(marital_status_codes().codes()),
            "edu_level" => Vocabulary::codes(edu_level_codes().codes()),
            "family_type" => Vocabulary::codes(family_type_codes().codes()),
            "num_children" => Vocabulary::codes(["1", "2", "3", "4+"]),
            "age_group" => Vocabulary::codes(self.age_groups().iter().copied()),
            "year" => Vocabulary::Year,
            "year_month" => Vocabulary::YearMonth,
            _ => return None,
        };
        Some(vocabulary)
    }

    fn age_groups(self) -> &'static [&'static str] {
        match self {
            Self::MaritalStatus => &[
                "15-19", "20-24", "25-29", "30-34", "35-39", "40-44", "45-49", "50-54", "55-59",
                "60-64", "65-69",
            ],
            Self::Education => &[
                "16-24", "25-34", "35-44", "45-54", "55-64", "65-74", "75-84",
            ],
            Self::HouseholdsWithChildren => &["0-21"],
            Self::SocialBenefits => &["20-64"],
        }
    }
}

impl fmt::Display for StatisticsTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StatisticsTable {
    type Err = VocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|table| table.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| VocabularyError::UnknownTable {
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::load_region_codes;

    #[test]
    fn every_table_orders_all_of_its_columns() {
        for table in StatisticsTable::all() {
            let mut declared: Vec<&str> = table
                .dimension_names()
                .iter()
                .chain(table.metric_names())
                .copied()
                .collect();
            let mut ordered = table.canonical_order().to_vec();
            declared.sort_unstable();
            ordered.sort_unstable();
            assert_eq!(declared, ordered, "{table}");
        }
    }

    #[test]
    fn dimensions_carry_vocabularies() {
        let regions = load_region_codes().unwrap();
        let dims = StatisticsTable::SocialBenefits.dimensions(&regions);
        assert_eq!(dims.len(), 4);
        assert_eq!(dims[3].vocabulary, Some(Vocabulary::YearMonth));
        assert!(dims[0].vocabulary.as_ref().unwrap().accepts("0180"));
        assert!(dims[2].vocabulary.as_ref().unwrap().accepts("20-64"));
    }

    #[test]
    fn age_groups_depend_on_the_table() {
        let regions = load_region_codes().unwrap();
        let dims = StatisticsTable::MaritalStatus.dimensions(&regions);
        let age_group = dims
            .iter()
            .find(|d| d.name == "age_group")
            .and_then(|d| d.vocabulary.as_ref())
            .unwrap();
        assert!(age_group.accepts("25-29"));
        assert!(!age_group.accepts("0-21"));
    }

    #[test]
    fn parses_table_names() {
        assert_eq!(
            "Education".parse::<StatisticsTable>().unwrap(),
            StatisticsTable::Education
        );
        assert!("population".parse::<StatisticsTable>().is_err());
    }

    #[test]
    fn serde_names_match_display() {
        let json = serde_json::to_string(&StatisticsTable::HouseholdsWithChildren).unwrap();
        assert_eq!(json, format!("\"{}\"", StatisticsTable::HouseholdsWithChildren));
    }
}
