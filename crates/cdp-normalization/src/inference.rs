//! Per-column type inference and coercion.
//!
//! Each column is classified on its own, in column order:
//!
//! 1. a name containing `year` takes the period path: `YYYYMmm` values turn
//!    the whole column into `YYYY-MM` text, anything else must parse as a
//!    year, date or timestamp and becomes an integer year;
//! 2. a name containing `datetime` is split into a `date` column and an
//!    `HH:MM` `time` column, unparsable timestamps becoming nulls;
//! 3. every other column becomes integer or float when all of its values are
//!    numbers, and stays text otherwise.
//!
//! A failing column keeps its previous state and the failure is recorded in
//! the report. Running inference on its own output changes nothing.

use std::collections::HashSet;

use cdp_common::{any_to_date, epoch_days, parse_numeric};
use cdp_model::{ColumnSpec, SemanticType};
use chrono::{Datelike, Timelike};
use polars::prelude::*;
use tracing::debug;

use crate::frame::{column_names, text_column, text_values};
use crate::report::NormalizationReport;
use crate::temporal::{
    is_canonical_year_month, parse_marked_year_month, parse_timestamp, parse_year,
};

pub(crate) const STEP: &str = "infer_types";

/// Columns produced by splitting a timestamp column.
pub const DATE_COLUMN: &str = "date";
pub const TIME_COLUMN: &str = "time";

const YEAR_MONTH_MARKER: char = 'M';

enum Coerced {
    /// Column already has its final representation.
    Keep(SemanticType),
    /// Column is replaced in place.
    Replace(Column, SemanticType),
    /// Timestamp column is replaced by `date` and `time`.
    Split {
        date: Column,
        time: Column,
        unparsable: usize,
    },
}

/// Classifies and coerces every column of `df`.
pub fn infer_and_coerce(df: DataFrame, report: &mut NormalizationReport) -> DataFrame {
    let mut df = df;
    let mut produced: HashSet<String> = HashSet::new();

    for name in column_names(&df) {
        if produced.contains(&name) {
            continue;
        }
        let Ok(column) = df.column(&name).cloned() else {
            continue;
        };
        let lower = name.to_lowercase();
        let outcome = if lower.contains("year") {
            coerce_period(&column)
        } else if lower.contains("datetime") {
            split_timestamp(&column)
        } else {
            coerce_numeric(&column)
        };

        match outcome {
            Ok(Coerced::Keep(semantic_type)) => {
                report.set_column(ColumnSpec::new(&name, semantic_type));
            }
            Ok(Coerced::Replace(replacement, semantic_type)) => {
                match df.with_column(replacement) {
                    Ok(_) => {
                        debug!(column = %name, semantic_type = %semantic_type, "coerced column");
                        report.set_column(ColumnSpec::new(&name, semantic_type));
                    }
                    Err(err) => report.error(STEP, Some(&name), err.to_string()),
                }
            }
            Ok(Coerced::Split {
                date,
                time,
                unparsable,
            }) => match replace_with_split(&mut df, &name, date, time) {
                Ok(()) => {
                    if unparsable > 0 {
                        report.warning(
                            STEP,
                            Some(&name),
                            format!("{unparsable} unparsable timestamps set to null"),
                        );
                    }
                    report.forget_column(&name);
                    report.set_column(ColumnSpec::new(DATE_COLUMN, SemanticType::Date));
                    report.set_column(ColumnSpec::new(TIME_COLUMN, SemanticType::Time));
                    produced.insert(DATE_COLUMN.to_string());
                    produced.insert(TIME_COLUMN.to_string());
                }
                Err(err) => report.error(STEP, Some(&name), err.to_string()),
            },
            Err(reason) => report.error(STEP, Some(&name), reason),
        }
    }
    df
}

fn replace_with_split(
    df: &mut DataFrame,
    source: &str,
    date: Column,
    time: Column,
) -> PolarsResult<()> {
    let mut next = df.drop(source)?;
    next.with_column(date)?;
    next.with_column(time)?;
    *df = next;
    Ok(())
}

fn coerce_period(column: &Column) -> Result<Coerced, String> {
    let name = column.name().as_str();
    let dtype = column.dtype();

    if dtype.is_integer() {
        if dtype == &DataType::Int32 {
            return Ok(Coerced::Keep(SemanticType::Year));
        }
        let years = column
            .strict_cast(&DataType::Int32)
            .map_err(|err| format!("year values out of range: {err}"))?;
        return Ok(Coerced::Replace(years, SemanticType::Year));
    }
    if dtype == &DataType::Date {
        let mut years = Vec::with_capacity(column.len());
        for idx in 0..column.len() {
            let value = column.get(idx).map_err(|err| err.to_string())?;
            years.push(any_to_date(value).map(|d| d.year()));
        }
        return Ok(Coerced::Replace(year_column(name, years), SemanticType::Year));
    }

    let values = text_values(column).map_err(|err| err.to_string())?;
    let present: Vec<&str> = values.iter().flatten().map(String::as_str).collect();

    if !present.is_empty() && present.iter().all(|v| is_canonical_year_month(v)) {
        return Ok(Coerced::Keep(SemanticType::YearMonth));
    }

    if present.iter().any(|v| v.contains(YEAR_MONTH_MARKER)) {
        let mut out = Vec::with_capacity(values.len());
        for value in &values {
            match value {
                None => out.push(None),
                Some(raw) => match parse_marked_year_month(raw) {
                    Some(period) => out.push(Some(period)),
                    None => return Err(format!("value '{raw}' is not a YYYYMmm period")),
                },
            }
        }
        return Ok(Coerced::Replace(
            text_column(name, out),
            SemanticType::YearMonth,
        ));
    }

    let mut years = Vec::with_capacity(values.len());
    for value in &values {
        match value {
            None => years.push(None),
            Some(raw) => match parse_year(raw) {
                Some(year) => years.push(Some(year)),
                None => return Err(format!("value '{raw}' is not a year or date")),
            },
        }
    }
    Ok(Coerced::Replace(year_column(name, years), SemanticType::Year))
}

fn year_column(name: &str, years: Vec<Option<i32>>) -> Column {
    Series::new(name.into(), years).into_column()
}

fn split_timestamp(column: &Column) -> Result<Coerced, String> {
    let values = text_values(column).map_err(|err| err.to_string())?;
    let mut dates: Vec<Option<i32>> = Vec::with_capacity(values.len());
    let mut times: Vec<Option<String>> = Vec::with_capacity(values.len());
    let mut unparsable = 0usize;

    for value in &values {
        let parsed = value.as_deref().and_then(parse_timestamp);
        if value.is_some() && parsed.is_none() {
            unparsable += 1;
        }
        dates.push(parsed.map(|dt| epoch_days(dt.date())));
        times.push(parsed.map(|dt| format!("{:02}:{:02}", dt.hour(), dt.minute())));
    }

    let date = Series::new(DATE_COLUMN.into(), dates)
        .cast(&DataType::Date)
        .map_err(|err| err.to_string())?
        .into_column();
    let time = text_column(TIME_COLUMN, times);
    Ok(Coerced::Split {
        date,
        time,
        unparsable,
    })
}

fn coerce_numeric(column: &Column) -> Result<Coerced, String> {
    let name = column.name().as_str();
    let dtype = column.dtype();

    match dtype {
        DataType::Date => return Ok(Coerced::Keep(SemanticType::Date)),
        DataType::String => {}
        dt if dt.is_integer() => return Ok(Coerced::Keep(SemanticType::Integer)),
        dt if dt.is_float() => return Ok(Coerced::Keep(SemanticType::Float)),
        _ => return Ok(Coerced::Keep(SemanticType::Text)),
    }

    let values = text_values(column).map_err(|err| err.to_string())?;
    if values.iter().all(Option::is_none) {
        return Ok(Coerced::Keep(SemanticType::Text));
    }

    let mut parsed = Vec::with_capacity(values.len());
    for value in &values {
        match value {
            None => parsed.push(None),
            Some(raw) => match parse_numeric(raw) {
                Some(number) => parsed.push(Some(number)),
                None => return Ok(Coerced::Keep(text_kind(&values))),
            },
        }
    }

    let integers: Option<Vec<Option<i64>>> = parsed
        .iter()
        .map(|cell| match cell {
            None => Some(None),
            Some(number) => number.as_integral().map(Some),
        })
        .collect();

    match integers {
        Some(integers) => Ok(Coerced::Replace(
            Series::new(name.into(), integers).into_column(),
            SemanticType::Integer,
        )),
        None => {
            let floats: Vec<Option<f64>> = parsed.iter().map(|c| c.map(|n| n.as_f64())).collect();
            Ok(Coerced::Replace(
                Series::new(name.into(), floats).into_column(),
                SemanticType::Float,
            ))
        }
    }
}

/// Text columns holding only `HH:MM` values are times split out earlier.
fn text_kind(values: &[Option<String>]) -> SemanticType {
    let is_clock = |v: &str| {
        let b = v.as_bytes();
        b.len() == 5 && b[2] == b':' && b[..2].iter().chain(&b[3..]).all(u8::is_ascii_digit)
    };
    if values.iter().flatten().all(|v| is_clock(v)) {
        SemanticType::Time
    } else {
        SemanticType::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_frame(columns: &[(&str, Vec<Option<&str>>)]) -> DataFrame {
        DataFrame::new(
            columns
                .iter()
                .map(|(name, values)| Series::new((*name).into(), values.clone()).into_column())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn marker_sends_whole_year_column_to_year_month() {
        let df = text_frame(&[("year_month", vec![Some("2022M01"), Some("2022M11")])]);
        let mut report = NormalizationReport::new();
        let out = infer_and_coerce(df, &mut report);

        let col = out.column("year_month").unwrap();
        assert_eq!(col.get(0).unwrap(), AnyValue::String("2022-01"));
        assert_eq!(col.get(1).unwrap(), AnyValue::String("2022-11"));
        assert_eq!(
            report.column("year_month").unwrap().semantic_type,
            SemanticType::YearMonth
        );
    }

    #[test]
    fn mixed_marker_column_fails_as_a_whole() {
        let df = text_frame(&[("Year", vec![Some("2022M01"), Some("2022")])]);
        let mut report = NormalizationReport::new();
        let out = infer_and_coerce(df, &mut report);

        let col = out.column("Year").unwrap();
        assert_eq!(col.dtype(), &DataType::String);
        assert_eq!(col.get(1).unwrap(), AnyValue::String("2022"));
        assert!(report.has_errors());
    }

    #[test]
    fn plain_years_become_integers() {
        let df = text_frame(&[("year", vec![Some("2022"), None, Some("2021-05-01")])]);
        let mut report = NormalizationReport::new();
        let out = infer_and_coerce(df, &mut report);

        let col = out.column("year").unwrap();
        assert_eq!(col.dtype(), &DataType::Int32);
        assert_eq!(col.get(0).unwrap(), AnyValue::Int32(2022));
        assert!(col.get(1).unwrap().is_null());
        assert_eq!(col.get(2).unwrap(), AnyValue::Int32(2021));
    }

    #[test]
    fn unknown_year_leaves_column_untouched() {
        let df = text_frame(&[("year", vec![Some("2022"), Some("Unknown")])]);
        let mut report = NormalizationReport::new();
        let out = infer_and_coerce(df, &mut report);

        assert_eq!(out.column("year").unwrap().dtype(), &DataType::String);
        let entry = report.entries_for(STEP).next().unwrap();
        assert_eq!(entry.column.as_deref(), Some("year"));
        assert!(entry.message.contains("Unknown"));
    }

    #[test]
    fn datetime_is_split_into_date_and_time() {
        let df = text_frame(&[
            ("datetime", vec![Some("2024-01-05 8:30:00 +01:00"), Some("garbage")]),
            ("type", vec![Some("Rån"), Some("Stöld")]),
        ]);
        let mut report = NormalizationReport::new();
        let out = infer_and_coerce(df, &mut report);

        assert_eq!(out.get_column_names_str(), vec!["type", "date", "time"]);
        let date = out.column("date").unwrap();
        assert_eq!(date.dtype(), &DataType::Date);
        assert_eq!(
            cdp_common::any_to_string(date.get(0).unwrap()),
            "2024-01-05"
        );
        assert!(date.get(1).unwrap().is_null());
        assert_eq!(
            out.column("time").unwrap().get(0).unwrap(),
            AnyValue::String("08:30")
        );
        assert_eq!(report.count(crate::Severity::Warning), 1);
        assert_eq!(
            report.column("time").unwrap().semantic_type,
            SemanticType::Time
        );
    }

    #[test]
    fn numeric_columns_pick_integer_or_float() {
        let df = text_frame(&[
            ("count", vec![Some("12"), Some("2.0"), None]),
            ("rate", vec![Some("1.5"), Some("3"), Some("4")]),
            ("code", vec![Some("12"), Some("1,5"), Some("3")]),
        ]);
        let mut report = NormalizationReport::new();
        let out = infer_and_coerce(df, &mut report);

        let count = out.column("count").unwrap();
        assert_eq!(count.dtype(), &DataType::Int64);
        assert_eq!(count.get(1).unwrap(), AnyValue::Int64(2));
        assert!(count.get(2).unwrap().is_null());
        assert_eq!(out.column("rate").unwrap().dtype(), &DataType::Float64);
        let code = out.column("code").unwrap();
        assert_eq!(code.dtype(), &DataType::String);
        assert_eq!(code.get(1).unwrap(), AnyValue::String("1,5"));
        assert!(!report.has_errors());
    }

    #[test]
    fn all_null_column_stays_text() {
        let df = text_frame(&[("note", vec![None, None])]);
        let mut report = NormalizationReport::new();
        let out = infer_and_coerce(df, &mut report);
        assert_eq!(out.column("note").unwrap().dtype(), &DataType::String);
        assert_eq!(
            report.column("note").unwrap().semantic_type,
            SemanticType::Text
        );
    }

    #[test]
    fn second_pass_changes_nothing() {
        let df = text_frame(&[
            ("datetime", vec![Some("2024-01-05 08:30:00 +01:00"), None]),
            ("year_month", vec![Some("2022M01"), Some("2022M02")]),
            ("year", vec![Some("2022"), Some("2023")]),
            ("count", vec![Some("1"), Some("2")]),
            ("latitude", vec![Some("59.0"), Some("59.5")]),
            ("type", vec![Some("Rån"), None]),
        ]);
        let mut report = NormalizationReport::new();
        let once = infer_and_coerce(df, &mut report);
        let mut second_report = NormalizationReport::new();
        let twice = infer_and_coerce(once.clone(), &mut second_report);

        assert!(once.equals_missing(&twice));
        assert!(second_report.entries.is_empty());
    }
}
