//! Column-level steps: dropping, renaming, reordering, row filters and
//! zero fill.

use std::collections::HashSet;

use polars::prelude::*;
use tracing::debug;

use crate::frame::{column_names, text_column, text_values};
use crate::report::NormalizationReport;

pub(crate) const DROP_STEP: &str = "drop_columns";
pub(crate) const STANDARDIZE_STEP: &str = "standardize_column_names";
pub(crate) const REORDER_STEP: &str = "reorder_columns";
pub(crate) const SUMMARY_STEP: &str = "drop_summary_rows";
pub(crate) const FILL_STEP: &str = "fill_missing_with_zero";

/// Trims surrounding whitespace from every column name, then drops the
/// listed columns. Names that are not present are skipped.
pub fn drop_columns(
    df: DataFrame,
    columns: &[String],
    report: &mut NormalizationReport,
) -> DataFrame {
    let mut df = trim_column_names(df, report);
    for column in columns {
        if df.column(column).is_err() {
            debug!(column = %column, "column to drop not present");
            continue;
        }
        match df.drop(column) {
            Ok(next) => {
                report.forget_column(column);
                df = next;
            }
            Err(err) => report.error(DROP_STEP, Some(column), err.to_string()),
        }
    }
    df
}

fn trim_column_names(mut df: DataFrame, report: &mut NormalizationReport) -> DataFrame {
    for name in column_names(&df) {
        let trimmed = name.trim();
        if trimmed == name {
            continue;
        }
        if df.column(trimmed).is_ok() {
            report.warning(
                DROP_STEP,
                Some(&name),
                format!("not trimmed, '{trimmed}' already exists"),
            );
            continue;
        }
        if let Err(err) = df.rename(&name, trimmed.into()) {
            report.error(DROP_STEP, Some(&name), err.to_string());
        }
    }
    df
}

/// Canonical column name: lower-case, spaces become underscores and anything
/// other than letters, digits and underscores is removed.
pub fn standardize_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}

/// Renames every column to its canonical form.
///
/// If two columns would end up with the same name nothing is renamed and the
/// collision is reported.
pub fn standardize_column_names(df: DataFrame, report: &mut NormalizationReport) -> DataFrame {
    let names = column_names(&df);
    let renamed: Vec<String> = names.iter().map(|n| standardize_name(n)).collect();

    let mut seen = HashSet::new();
    for (original, target) in names.iter().zip(&renamed) {
        if !seen.insert(target.as_str()) {
            report.error(
                STANDARDIZE_STEP,
                Some(original),
                format!("renaming would duplicate column '{target}'"),
            );
            return df;
        }
    }
    if names == renamed {
        return df;
    }

    let mut out = df.clone();
    if let Err(err) = out.set_column_names(renamed.iter().map(String::as_str)) {
        report.error(STANDARDIZE_STEP, None, err.to_string());
        return df;
    }
    for (original, target) in names.iter().zip(&renamed) {
        if original != target {
            report.rename_column(original, target);
        }
    }
    out
}

/// Selects exactly `order`. Any missing column fails the step.
pub fn reorder_columns(
    df: DataFrame,
    order: &[String],
    report: &mut NormalizationReport,
) -> DataFrame {
    let missing: Vec<&str> = order
        .iter()
        .filter(|c| df.column(c).is_err())
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        report.error(
            REORDER_STEP,
            None,
            format!("missing columns: {}", missing.join(", ")),
        );
        return df;
    }
    match df.select(order.iter().map(String::as_str)) {
        Ok(out) => {
            let dropped = df.width().saturating_sub(out.width());
            if dropped > 0 {
                debug!(dropped, "reorder left out columns");
            }
            out
        }
        Err(err) => {
            report.error(REORDER_STEP, None, err.to_string());
            df
        }
    }
}

/// Removes rows whose `column` contains any of `markers`, compared without
/// regard to case. Rows with a null value are kept.
pub fn drop_summary_rows(
    df: DataFrame,
    column: &str,
    markers: &[String],
    report: &mut NormalizationReport,
) -> DataFrame {
    let Ok(source) = df.column(column) else {
        report.warning(SUMMARY_STEP, Some(column), format!("column '{column}' not found"));
        return df;
    };
    let values = match text_values(source) {
        Ok(values) => values,
        Err(err) => {
            report.error(SUMMARY_STEP, Some(column), err.to_string());
            return df;
        }
    };
    let markers: Vec<String> = markers.iter().map(|m| m.to_lowercase()).collect();
    let keep: Vec<bool> = values
        .iter()
        .map(|value| match value {
            None => true,
            Some(text) => {
                let text = text.to_lowercase();
                !markers.iter().any(|m| text.contains(m.as_str()))
            }
        })
        .collect();

    let removed = keep.iter().filter(|k| !**k).count();
    if removed == 0 {
        return df;
    }
    let mask = BooleanChunked::from_slice("summary".into(), &keep);
    match df.filter(&mask) {
        Ok(out) => {
            report.rows_dropped += removed;
            report.info(
                SUMMARY_STEP,
                Some(column),
                format!("removed {removed} summary rows"),
            );
            out
        }
        Err(err) => {
            report.error(SUMMARY_STEP, Some(column), err.to_string());
            df
        }
    }
}

/// Replaces nulls with zero: numeric zero in numeric columns and `"0"` in
/// text columns. Other column types are left alone.
pub fn fill_missing_with_zero(df: DataFrame, report: &mut NormalizationReport) -> DataFrame {
    let mut df = df;
    for name in column_names(&df) {
        let Ok(column) = df.column(&name).cloned() else {
            continue;
        };
        let nulls = column.null_count();
        if nulls == 0 {
            continue;
        }
        let dtype = column.dtype().clone();
        let filled = if dtype.is_integer() || dtype.is_float() {
            column.fill_null(FillNullStrategy::Zero)
        } else if dtype == DataType::String {
            text_values(&column).map(|values| {
                text_column(
                    &name,
                    values
                        .into_iter()
                        .map(|v| Some(v.unwrap_or_else(|| "0".to_string())))
                        .collect(),
                )
            })
        } else {
            report.warning(
                FILL_STEP,
                Some(&name),
                format!("{nulls} nulls left in {dtype} column"),
            );
            continue;
        };
        match filled.and_then(|col| df.with_column(col).map(|_| ())) {
            Ok(()) => report.nulls_filled += nulls,
            Err(err) => report.error(FILL_STEP, Some(&name), err.to_string()),
        }
    }
    df
}
