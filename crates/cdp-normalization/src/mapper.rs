//! Code-to-label mapping of categorical columns.

use std::collections::BTreeSet;

use cdp_model::CodeMap;
use cdp_vocabulary::CodeTables;
use polars::prelude::*;

use crate::frame::{text_column, text_values};
use crate::report::NormalizationReport;

pub(crate) const STEP: &str = "map_categories";

/// Replaces codes with labels using an injected set of code tables.
///
/// Matching is exact. A code without a label becomes null and is collected
/// in the report's `unmapped` set for its column.
#[derive(Debug, Clone)]
pub struct CategoryMapper {
    tables: CodeTables,
}

impl CategoryMapper {
    pub fn new(tables: CodeTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &CodeTables {
        &self.tables
    }

    /// Maps one column. `map` overrides the registered table for `column`.
    pub fn map_column(
        &self,
        df: DataFrame,
        column: &str,
        map: Option<&CodeMap>,
        report: &mut NormalizationReport,
    ) -> DataFrame {
        let Some(map) = map.or_else(|| self.tables.for_column(column)) else {
            report.error(STEP, Some(column), "no code map registered for column");
            return df;
        };
        let Ok(source) = df.column(column) else {
            report.error(STEP, Some(column), format!("column '{column}' not found"));
            return df;
        };
        let values = match text_values(source) {
            Ok(values) => values,
            Err(err) => {
                report.error(STEP, Some(column), err.to_string());
                return df;
            }
        };

        let mut unmapped: BTreeSet<String> = BTreeSet::new();
        let labels: Vec<Option<String>> = values
            .into_iter()
            .map(|value| {
                let code = value?;
                match map.label(&code) {
                    Some(label) => Some(label.to_string()),
                    None => {
                        unmapped.insert(code);
                        None
                    }
                }
            })
            .collect();

        let mut out = df;
        if let Err(err) = out.with_column(text_column(column, labels)) {
            report.error(STEP, Some(column), err.to_string());
            return out;
        }
        if !unmapped.is_empty() {
            let preview = unmapped.iter().take(5).cloned().collect::<Vec<_>>().join(", ");
            report.warning(
                STEP,
                Some(column),
                format!("{} codes without a label set to null: {preview}", unmapped.len()),
            );
            report
                .unmapped
                .entry(column.to_string())
                .or_default()
                .extend(unmapped);
        }
        out
    }

    /// Maps the listed columns, or every registered column present in the
    /// frame when `columns` is `None`.
    pub fn map_columns(
        &self,
        df: DataFrame,
        columns: Option<&[String]>,
        report: &mut NormalizationReport,
    ) -> DataFrame {
        let targets: Vec<String> = match columns {
            Some(columns) => columns.to_vec(),
            None => self
                .tables
                .mapped_columns()
                .into_iter()
                .filter(|name| df.column(name).is_ok())
                .map(str::to_string)
                .collect(),
        };
        targets
            .iter()
            .fold(df, |df, column| self.map_column(df, column, None, report))
    }
}
