//! Exact-duplicate row removal.

use std::collections::{HashMap, HashSet};

use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::frame::{column_names, text_values};
use crate::report::NormalizationReport;

pub(crate) const STEP: &str = "drop_duplicates";

/// Which row of a duplicate group survives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Keep {
    #[default]
    First,
    Last,
    /// Drop every row that has a duplicate.
    None,
}

/// Removes rows whose values in `subset` (all columns when `None` or empty)
/// are identical. Two nulls compare equal; row order is otherwise kept.
pub fn drop_duplicates(
    df: DataFrame,
    subset: Option<&[String]>,
    keep: Keep,
    report: &mut NormalizationReport,
) -> DataFrame {
    match try_drop_duplicates(&df, subset, keep) {
        Ok((deduped, removed)) => {
            if removed > 0 {
                report.info(STEP, None, format!("removed {removed} duplicate rows"));
            }
            report.duplicates_removed += removed;
            deduped
        }
        Err(err) => {
            report.error(STEP, None, err.to_string());
            df
        }
    }
}

fn try_drop_duplicates(
    df: &DataFrame,
    subset: Option<&[String]>,
    keep: Keep,
) -> Result<(DataFrame, usize)> {
    let height = df.height();
    if height == 0 {
        return Ok((df.clone(), 0));
    }
    let keys = match subset {
        Some(columns) if !columns.is_empty() => columns.to_vec(),
        _ => column_names(df),
    };
    let mut key_values = Vec::with_capacity(keys.len());
    for key in &keys {
        key_values.push(text_values(df.column(key)?)?);
    }
    let row_key = |idx: usize| -> Vec<Option<&str>> {
        key_values.iter().map(|col| col[idx].as_deref()).collect()
    };

    let mut keep_mask = vec![false; height];
    match keep {
        Keep::First | Keep::Last => {
            let mut seen = HashSet::with_capacity(height);
            let order: Box<dyn Iterator<Item = usize>> = match keep {
                Keep::Last => Box::new((0..height).rev()),
                _ => Box::new(0..height),
            };
            for idx in order {
                keep_mask[idx] = seen.insert(row_key(idx));
            }
        }
        Keep::None => {
            let mut counts: HashMap<Vec<Option<&str>>, usize> = HashMap::with_capacity(height);
            for idx in 0..height {
                *counts.entry(row_key(idx)).or_default() += 1;
            }
            for (idx, slot) in keep_mask.iter_mut().enumerate() {
                *slot = counts.get(&row_key(idx)).copied() == Some(1);
            }
        }
    }

    let removed = keep_mask.iter().filter(|kept| !**kept).count();
    if removed == 0 {
        return Ok((df.clone(), 0));
    }
    let mask = BooleanChunked::from_slice("dedupe".into(), &keep_mask);
    Ok((df.filter(&mask)?, removed))
}
