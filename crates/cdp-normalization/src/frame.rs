//! DataFrame helpers shared by the normalization steps.

use std::collections::HashSet;

use cdp_common::any_to_string_opt;
use polars::prelude::*;

/// Every cell of a column as text, nulls kept as `None`.
pub(crate) fn text_values(column: &Column) -> PolarsResult<Vec<Option<String>>> {
    (0..column.len())
        .map(|idx| column.get(idx).map(any_to_string_opt))
        .collect()
}

/// Builds a `String` column from optional text cells.
pub(crate) fn text_column(name: &str, values: Vec<Option<String>>) -> Column {
    Series::new(name.into(), values).into_column()
}

/// Owned column names in frame order.
pub(crate) fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names_str()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Stacks frames whose column sets differ.
///
/// Output columns are the union in first-seen order; a frame lacking a column
/// contributes nulls. Columns missing from a frame are added as nulls of the
/// dtype the column has where it was first seen.
pub fn concat_union(frames: Vec<DataFrame>) -> PolarsResult<DataFrame> {
    let mut order: Vec<String> = Vec::new();
    let mut dtypes: Vec<DataType> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for frame in &frames {
        for column in frame.get_columns() {
            let name = column.name().to_string();
            if seen.insert(name.clone()) {
                order.push(name);
                dtypes.push(column.dtype().clone());
            }
        }
    }

    let mut combined: Option<DataFrame> = None;
    for mut frame in frames {
        let height = frame.height();
        for (name, dtype) in order.iter().zip(&dtypes) {
            if frame.column(name).is_err() {
                frame.with_column(Series::full_null(name.as_str().into(), height, dtype))?;
            }
        }
        let frame = frame.select(order.iter().map(String::as_str))?;
        match combined.as_mut() {
            Some(acc) => {
                acc.vstack_mut(&frame)?;
            }
            None => combined = Some(frame),
        }
    }
    let mut combined = combined.unwrap_or_default();
    combined.as_single_chunk_par();
    Ok(combined)
}
