//! Decomposition of composite-key rows into named columns.
//!
//! A statistics response row carries its dimensions as a positional key
//! array (`["0180", "1", "2022"]`) next to its measures (`["5123"]`). The
//! decoder turns a batch of such rows into one text column per dimension
//! followed by one per metric. Types are decided later by inference.

use std::collections::HashSet;

use cdp_model::{DimensionSpec, KeyedRow};
use polars::prelude::*;
use tracing::debug;

use crate::error::{NormalizationError, Result};
use crate::frame::text_column;
use crate::report::NormalizationReport;

pub(crate) const STEP: &str = "decode_keys";

/// Share of rejected values above which a key position is considered to be
/// in the wrong place.
const REJECTION_LIMIT: f64 = 0.5;
const MAX_EXAMPLES: usize = 5;

#[derive(Debug, Clone)]
pub struct KeyedRowDecoder {
    dimensions: Vec<DimensionSpec>,
    metrics: Vec<String>,
}

impl KeyedRowDecoder {
    /// Declares the dimension order of the key and the metric order of the
    /// values. Every name must be unique across both lists.
    pub fn new(dimensions: Vec<DimensionSpec>, metrics: Vec<String>) -> Result<Self> {
        let mut seen = HashSet::new();
        for name in dimensions.iter().map(|d| &d.name).chain(&metrics) {
            if !seen.insert(name.as_str()) {
                return Err(NormalizationError::DuplicateColumn { name: name.clone() });
            }
        }
        Ok(Self {
            dimensions,
            metrics,
        })
    }

    pub fn dimensions(&self) -> &[DimensionSpec] {
        &self.dimensions
    }

    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    /// Decodes `rows` into `dimensions ++ metrics` text columns.
    ///
    /// Any row whose key or value count differs from the declaration fails
    /// the whole batch. Vocabulary violations fail the batch when they make
    /// up most of a position, and are reported as warnings otherwise.
    pub fn decode(&self, rows: &[KeyedRow], report: &mut NormalizationReport) -> Result<DataFrame> {
        let width = self.dimensions.len();
        let mut dimension_values: Vec<Vec<Option<String>>> =
            vec![Vec::with_capacity(rows.len()); width];
        let mut metric_values: Vec<Vec<Option<String>>> =
            vec![Vec::with_capacity(rows.len()); self.metrics.len()];

        for (row_idx, row) in rows.iter().enumerate() {
            if row.key.len() != width {
                return Err(NormalizationError::KeyLengthMismatch {
                    row: row_idx,
                    expected: width,
                    actual: row.key.len(),
                });
            }
            if row.values.len() != self.metrics.len() {
                return Err(NormalizationError::ValueLengthMismatch {
                    row: row_idx,
                    expected: self.metrics.len(),
                    actual: row.values.len(),
                });
            }
            for (column, part) in dimension_values.iter_mut().zip(&row.key) {
                column.push(Some(part.clone()));
            }
            for (column, value) in metric_values.iter_mut().zip(&row.values) {
                column.push(value.clone());
            }
        }

        for (dimension, values) in self.dimensions.iter().zip(&dimension_values) {
            self.check_vocabulary(dimension, values, report)?;
        }

        let columns: Vec<Column> = self
            .dimensions
            .iter()
            .map(|d| d.name.as_str())
            .chain(self.metrics.iter().map(String::as_str))
            .zip(dimension_values.into_iter().chain(metric_values))
            .map(|(name, values)| text_column(name, values))
            .collect();
        let df = DataFrame::new(columns)?;
        debug!(rows = df.height(), columns = df.width(), "decoded keyed rows");
        Ok(df)
    }

    fn check_vocabulary(
        &self,
        dimension: &DimensionSpec,
        values: &[Option<String>],
        report: &mut NormalizationReport,
    ) -> Result<()> {
        let Some(vocabulary) = &dimension.vocabulary else {
            return Ok(());
        };
        let total = values.len();
        let rejected: Vec<&str> = values
            .iter()
            .flatten()
            .map(String::as_str)
            .filter(|v| !vocabulary.accepts(v))
            .collect();
        if rejected.is_empty() {
            return Ok(());
        }

        let mut examples: Vec<&str> = Vec::new();
        for value in &rejected {
            if examples.len() == MAX_EXAMPLES {
                break;
            }
            if !examples.contains(value) {
                examples.push(value);
            }
        }
        let examples = examples
            .iter()
            .map(|v| format!("'{v}'"))
            .collect::<Vec<_>>()
            .join(", ");

        if rejected.len() as f64 > total as f64 * REJECTION_LIMIT {
            return Err(NormalizationError::DimensionVocabulary {
                dimension: dimension.name.clone(),
                expected: vocabulary.describe(),
                rejected: rejected.len(),
                total,
                examples,
            });
        }
        report.warning(
            STEP,
            Some(&dimension.name),
            format!(
                "{} of {total} values are not {} (e.g. {examples})",
                rejected.len(),
                vocabulary.describe()
            ),
        );
        Ok(())
    }
}

/// Decodes rows by dimension and metric names alone, without vocabulary
/// checks.
pub fn decompose_keyed_rows(
    rows: &[KeyedRow],
    dimensions: &[&str],
    metrics: &[&str],
) -> Result<DataFrame> {
    let decoder = KeyedRowDecoder::new(
        dimensions.iter().map(|d| DimensionSpec::named(*d)).collect(),
        metrics.iter().map(|m| (*m).to_string()).collect(),
    )?;
    decoder.decode(rows, &mut NormalizationReport::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdp_model::Vocabulary;

    fn rows() -> Vec<KeyedRow> {
        vec![
            KeyedRow::new(["0180", "1", "2022"], ["5123"]),
            KeyedRow::new(["0180", "2", "2022"], ["5301"]),
        ]
    }

    #[test]
    fn decodes_dimensions_then_metrics() {
        let df = decompose_keyed_rows(&rows(), &["region", "gender", "year"], &["num_individuals"])
            .unwrap();
        assert_eq!(
            df.get_column_names_str(),
            vec!["region", "gender", "year", "num_individuals"]
        );
        assert_eq!(df.height(), 2);
        assert_eq!(
            df.column("gender").unwrap().get(1).unwrap(),
            AnyValue::String("2")
        );
        assert_eq!(
            df.column("num_individuals").unwrap().get(0).unwrap(),
            AnyValue::String("5123")
        );
    }

    #[test]
    fn short_key_fails_the_batch() {
        let mut rows = rows();
        rows.push(KeyedRow::new(["0180", "1"], ["7"]));
        let err = decompose_keyed_rows(&rows, &["region", "gender", "year"], &["n"]).unwrap_err();
        assert!(matches!(
            err,
            NormalizationError::KeyLengthMismatch {
                row: 2,
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn value_count_mismatch_fails_the_batch() {
        let err = decompose_keyed_rows(&rows(), &["region", "gender", "year"], &["a", "b"])
            .unwrap_err();
        assert!(matches!(err, NormalizationError::ValueLengthMismatch { .. }));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = decompose_keyed_rows(&rows(), &["region", "year", "year"], &["n"]).unwrap_err();
        assert!(matches!(err, NormalizationError::DuplicateColumn { name } if name == "year"));
    }

    #[test]
    fn empty_batch_has_declared_columns() {
        let df = decompose_keyed_rows(&[], &["region", "year"], &["n"]).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.get_column_names_str(), vec!["region", "year", "n"]);
    }

    #[test]
    fn swapped_dimensions_are_detected() {
        let decoder = KeyedRowDecoder::new(
            vec![
                DimensionSpec::named("region"),
                DimensionSpec::named("year").with_vocabulary(Vocabulary::Year),
                DimensionSpec::named("gender").with_vocabulary(Vocabulary::codes(["1", "2"])),
            ],
            vec!["num_individuals".to_string()],
        )
        .unwrap();
        let mut report = NormalizationReport::new();
        let err = decoder.decode(&rows(), &mut report).unwrap_err();
        match err {
            NormalizationError::DimensionVocabulary {
                dimension,
                rejected,
                total,
                ..
            } => {
                assert_eq!(dimension, "year");
                assert_eq!((rejected, total), (2, 2));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn isolated_vocabulary_misses_are_warnings() {
        let decoder = KeyedRowDecoder::new(
            vec![
                DimensionSpec::named("region"),
                DimensionSpec::named("gender").with_vocabulary(Vocabulary::codes(["1"])),
                DimensionSpec::named("year").with_vocabulary(Vocabulary::Year),
            ],
            vec!["num_individuals".to_string()],
        )
        .unwrap();
        let mut report = NormalizationReport::new();
        let df = decoder.decode(&rows(), &mut report).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(report.entries.len(), 1);
        assert!(report.entries[0].message.contains("'2'"));
    }
}
