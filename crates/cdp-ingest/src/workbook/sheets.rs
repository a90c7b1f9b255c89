//! Sheet selection and per-year sheet layouts.

use polars::prelude::*;

use crate::csv::CsvShape;
use crate::error::{IngestError, Result};

/// Sheets that never hold per-municipality crime counts.
pub const SKIPPED_SHEETS: [&str; 4] = ["Tabell 120-23", "Information", "Okänd kommun", "Tabell 120"];

/// Column names assigned to headerless sheets.
pub const HEADERLESS_COLUMNS: [&str; 3] = [
    "Brottstyp",
    "Antal anmälda brott, totalt",
    "Antal brott per 100 000 invånare",
];

/// First and last publication years that use the headerless layout.
const HEADERLESS_YEARS: std::ops::RangeInclusive<i32> = 2015..=2021;

/// Leading rows (title block) above the data in headerless sheets.
const HEADERLESS_SKIP_ROWS: usize = 10;

/// Picks the sheets to read: the first sheet is a summary and is always
/// skipped, as are the names in [`SKIPPED_SHEETS`]. Order is preserved.
pub fn select_sheets(sheet_names: &[String]) -> Vec<String> {
    sheet_names
        .iter()
        .skip(1)
        .filter(|name| !SKIPPED_SHEETS.contains(&name.as_str()))
        .cloned()
        .collect()
}

/// How a sheet's rows and column names are arranged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetLayout {
    /// No header row; data starts after `skip_rows` lines and the columns
    /// are named by position.
    Headerless {
        skip_rows: usize,
        columns: Vec<String>,
    },
    /// Column names sit on the line after `skip_rows` lines.
    HeaderRow { skip_rows: usize },
}

impl SheetLayout {
    /// Layout used by publications of `year`.
    ///
    /// 2015 to 2021 are headerless with a ten line title block; other years,
    /// and files without a parsable year, carry the header on the second line.
    pub fn for_year(year: Option<i32>) -> Self {
        match year {
            Some(year) if HEADERLESS_YEARS.contains(&year) => Self::Headerless {
                skip_rows: HEADERLESS_SKIP_ROWS,
                columns: HEADERLESS_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
            },
            _ => Self::HeaderRow { skip_rows: 1 },
        }
    }

    pub fn shape(&self) -> CsvShape {
        match self {
            Self::Headerless { skip_rows, .. } => CsvShape::headerless(*skip_rows),
            Self::HeaderRow { skip_rows } => CsvShape::header_at(*skip_rows),
        }
    }

    /// Names the columns of a freshly read headerless sheet.
    ///
    /// The sheet must have exactly as many columns as the layout names.
    pub fn apply(&self, sheet: &str, mut df: DataFrame) -> Result<DataFrame> {
        match self {
            Self::HeaderRow { .. } => Ok(df),
            Self::Headerless { columns, .. } => {
                if df.width() != columns.len() {
                    return Err(IngestError::SheetShape {
                        sheet: sheet.to_string(),
                        expected: columns.len(),
                        actual: df.width(),
                    });
                }
                df.set_column_names(columns.iter().map(String::as_str))?;
                Ok(df)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn skips_first_and_named_sheets() {
        let sheets = names(&[
            "Sammanfattning",
            "Stockholm",
            "Information",
            "Solna",
            "Tabell 120",
            "Okänd kommun",
        ]);
        assert_eq!(select_sheets(&sheets), names(&["Stockholm", "Solna"]));
    }

    #[test]
    fn first_sheet_is_skipped_even_if_it_looks_like_data() {
        assert!(select_sheets(&names(&["Stockholm"])).is_empty());
        assert!(select_sheets(&[]).is_empty());
    }

    #[test]
    fn layout_depends_on_year() {
        assert!(matches!(
            SheetLayout::for_year(Some(2015)),
            SheetLayout::Headerless { skip_rows: 10, .. }
        ));
        assert!(matches!(
            SheetLayout::for_year(Some(2021)),
            SheetLayout::Headerless { .. }
        ));
        assert_eq!(
            SheetLayout::for_year(Some(2022)),
            SheetLayout::HeaderRow { skip_rows: 1 }
        );
        assert_eq!(
            SheetLayout::for_year(None),
            SheetLayout::HeaderRow { skip_rows: 1 }
        );
    }

    #[test]
    fn headerless_apply_names_columns() {
        let df = DataFrame::new(vec![
            Series::new("column_1".into(), ["Ran"]).into_column(),
            Series::new("column_2".into(), ["4"]).into_column(),
            Series::new("column_3".into(), ["1.5"]).into_column(),
        ])
        .unwrap();
        let layout = SheetLayout::for_year(Some(2018));
        let named = layout.apply("Solna", df).unwrap();
        assert_eq!(named.get_column_names_str(), HEADERLESS_COLUMNS.to_vec());
    }

    #[test]
    fn headerless_apply_rejects_wrong_width() {
        let df = DataFrame::new(vec![Series::new("column_1".into(), ["Ran"]).into_column()]).unwrap();
        let err = SheetLayout::for_year(Some(2018)).apply("Solna", df).unwrap_err();
        assert!(matches!(err, IngestError::SheetShape { expected: 3, actual: 1, .. }));
    }
}
