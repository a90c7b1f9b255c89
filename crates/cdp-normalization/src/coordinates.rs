//! Splitting of `lat,lon` text into numeric coordinate columns.

use polars::prelude::*;

use crate::frame::text_values;
use crate::report::NormalizationReport;

pub(crate) const STEP: &str = "split_coordinates";

pub const LATITUDE_COLUMN: &str = "latitude";
pub const LONGITUDE_COLUMN: &str = "longitude";

/// Replaces `column` with float `latitude` and `longitude` columns.
///
/// Values look like `"59.3293,18.0686"`. A null value gives null coordinates.
/// If the column is absent or any value is malformed the frame is returned
/// unchanged and the problem is reported.
pub fn split_coordinates(
    df: DataFrame,
    column: &str,
    report: &mut NormalizationReport,
) -> DataFrame {
    match try_split(&df, column) {
        Ok(split) => split,
        Err(reason) => {
            report.error(STEP, Some(column), reason);
            df
        }
    }
}

fn try_split(df: &DataFrame, column: &str) -> Result<DataFrame, String> {
    let source = df
        .column(column)
        .map_err(|_| format!("column '{column}' not found"))?;
    let values = text_values(source).map_err(|err| err.to_string())?;

    let mut latitudes = Vec::with_capacity(values.len());
    let mut longitudes = Vec::with_capacity(values.len());
    for value in &values {
        match value {
            None => {
                latitudes.push(None);
                longitudes.push(None);
            }
            Some(raw) => {
                let (lat, lon) = parse_pair(raw)
                    .ok_or_else(|| format!("value '{raw}' is not a 'lat,lon' pair"))?;
                latitudes.push(Some(lat));
                longitudes.push(Some(lon));
            }
        }
    }

    let mut out = df.drop(column).map_err(|err| err.to_string())?;
    out.with_column(Series::new(LATITUDE_COLUMN.into(), latitudes).into_column())
        .map_err(|err| err.to_string())?;
    out.with_column(Series::new(LONGITUDE_COLUMN.into(), longitudes).into_column())
        .map_err(|err| err.to_string())?;
    Ok(out)
}

fn parse_pair(raw: &str) -> Option<(f64, f64)> {
    let (lat, lon) = raw.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lon: f64 = lon.trim().parse().ok()?;
    (lat.is_finite() && lon.is_finite()).then_some((lat, lon))
}
