//! Region and year metadata encoded in workbook file names.

use std::sync::LazyLock;

use cdp_model::{SourceFileMeta, UNKNOWN};
use regex::Regex;

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-(\d{4})").expect("year pattern is valid"));

static REGION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_(.+)-\d{4}").expect("region pattern is valid"));

/// Extracts region and year from a `..._<region>-<year>...` file name.
///
/// Either part falls back to [`UNKNOWN`] independently when it is missing.
pub fn parse_source_file_name(file_name: &str) -> SourceFileMeta {
    let year = YEAR_PATTERN
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map_or_else(|| UNKNOWN.to_string(), |m| m.as_str().to_string());
    let region = REGION_PATTERN
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map_or_else(|| UNKNOWN.to_string(), |m| m.as_str().to_string());
    SourceFileMeta {
        file_name: file_name.to_string(),
        region,
        year,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_region_and_year() {
        let meta = parse_source_file_name("Anmalda_Stockholms lan-2022.xlsx");
        assert_eq!(meta.region, "Stockholms lan");
        assert_eq!(meta.year, "2022");
        assert_eq!(meta.year_number(), Some(2022));
    }

    #[test]
    fn region_spans_to_last_year_suffix() {
        let meta = parse_source_file_name("brott_Vastra_Gotaland-2019.xls");
        assert_eq!(meta.region, "Vastra_Gotaland");
        assert_eq!(meta.year, "2019");
    }

    #[test]
    fn falls_back_to_unknown() {
        let meta = parse_source_file_name("summary.xlsx");
        assert_eq!(meta.region, UNKNOWN);
        assert_eq!(meta.year, UNKNOWN);

        let meta = parse_source_file_name("report-2020.xlsx");
        assert_eq!(meta.region, UNKNOWN);
        assert_eq!(meta.year, "2020");
    }
}
