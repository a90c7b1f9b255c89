//! Statistics API responses and requested periods.

use cdp_model::KeyedRow;
use cdp_model::dimension::{is_year, is_year_month};
use serde::Deserialize;

use crate::error::{IngestError, Result};

#[derive(Debug, Deserialize)]
struct StatisticsResponse {
    data: Vec<ResponseEntry>,
}

#[derive(Debug, Deserialize)]
struct ResponseEntry {
    key: Vec<String>,
    values: Vec<Option<String>>,
}

/// Parses a `{"data": [{"key": [...], "values": [...]}]}` response body.
///
/// Key and value lengths are not checked here; the decoder validates them
/// against the declared dimensions.
pub fn parse_statistics_response(json: &str) -> Result<Vec<KeyedRow>> {
    let response: StatisticsResponse =
        serde_json::from_str(json).map_err(|source| IngestError::Json {
            context: "statistics response",
            source,
        })?;
    tracing::debug!(rows = response.data.len(), "parsed statistics response");
    Ok(response
        .data
        .into_iter()
        .map(|entry| KeyedRow {
            key: entry.key,
            values: entry.values,
        })
        .collect())
}

/// Checks that every requested year is `YYYY`.
pub fn validate_years<S: AsRef<str>>(years: &[S]) -> Result<()> {
    validate_periods(years, is_year, "YYYY")
}

/// Checks that every requested period is `YYYYMmm`.
pub fn validate_year_months<S: AsRef<str>>(periods: &[S]) -> Result<()> {
    validate_periods(periods, is_year_month, "YYYYMmm")
}

fn validate_periods<S: AsRef<str>>(
    periods: &[S],
    accepts: fn(&str) -> bool,
    expected: &'static str,
) -> Result<()> {
    for period in periods {
        let value = period.as_ref();
        if !accepts(value) {
            tracing::error!(period = value, expected, "invalid statistics period");
            return Err(IngestError::InvalidPeriod {
                value: value.to_string(),
                expected,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keyed_rows() {
        let body = r#"{"columns": [], "data": [
            {"key": ["0180", "OG", "20-24", "1", "2022"], "values": ["5123"]},
            {"key": ["0114", "G", "20-24", "2", "2022"], "values": [null]}
        ]}"#;
        let rows = parse_statistics_response(body).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key[0], "0180");
        assert_eq!(rows[0].values, vec![Some("5123".to_string())]);
        assert_eq!(rows[1].values, vec![None]);
    }

    #[test]
    fn rejects_bodies_without_data() {
        assert!(matches!(
            parse_statistics_response(r#"{"rows": []}"#),
            Err(IngestError::Json { .. })
        ));
    }

    #[test]
    fn validates_years() {
        assert!(validate_years(&["2021", "2022"]).is_ok());
        let err = validate_years(&["2022", "22"]).unwrap_err();
        assert!(matches!(err, IngestError::InvalidPeriod { ref value, .. } if value == "22"));
    }

    #[test]
    fn validates_year_months() {
        assert!(validate_year_months(&["2022M01", "2022M12"]).is_ok());
        assert!(validate_year_months(&["2022-01"]).is_err());
        assert!(validate_year_months(&["2022M00"]).is_err());
        assert!(validate_year_months::<&str>(&[]).is_ok());
    }
}
