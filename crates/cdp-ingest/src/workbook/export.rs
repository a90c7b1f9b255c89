//! Workbook sources.
//!
//! A [`WorkbookSource`] lists a workbook's sheets and yields each as a text
//! frame. [`CsvWorkbookExport`] reads workbooks that were exported as a
//! directory with one CSV file per sheet; workbook files go through
//! [`ExcelWorkbook`](super::ExcelWorkbook).

use std::path::Path;

use polars::prelude::DataFrame;

use super::sheets::SheetLayout;
use crate::csv::read_csv_text;
use crate::error::{IngestError, Result};

/// Access to the sheets of a workbook.
pub trait WorkbookSource {
    /// Sheet names in workbook order.
    fn sheet_names(&self, workbook: &Path) -> Result<Vec<String>>;

    /// Reads one sheet using `layout`, every column as text.
    fn read_sheet(&self, workbook: &Path, sheet: &str, layout: &SheetLayout)
    -> Result<DataFrame>;
}

/// Workbook exported as `<workbook>/<sheet>.csv`.
///
/// Sheet order is the sorted order of the CSV file names, so exports should
/// keep the summary sheet first (for example by numbering the files).
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvWorkbookExport;

impl CsvWorkbookExport {
    pub fn new() -> Self {
        Self
    }
}

impl WorkbookSource for CsvWorkbookExport {
    fn sheet_names(&self, workbook: &Path) -> Result<Vec<String>> {
        if !workbook.is_dir() {
            return Err(IngestError::NotAWorkbookExport {
                path: workbook.to_path_buf(),
            });
        }
        let entries = std::fs::read_dir(workbook).map_err(|e| IngestError::DirectoryRead {
            path: workbook.to_path_buf(),
            source: e,
        })?;

        let mut files = Vec::new();
        for entry_result in entries {
            let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
                path: workbook.to_path_buf(),
                source: e,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let is_csv = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false);
            if is_csv {
                files.push(path);
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        Ok(files
            .iter()
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()))
            .map(str::to_string)
            .collect())
    }

    fn read_sheet(
        &self,
        workbook: &Path,
        sheet: &str,
        layout: &SheetLayout,
    ) -> Result<DataFrame> {
        let path = workbook.join(format!("{sheet}.csv"));
        if !path.is_file() {
            return Err(IngestError::SheetNotFound {
                workbook: workbook.to_path_buf(),
                sheet: sheet.to_string(),
            });
        }
        let df = read_csv_text(&path, layout.shape())?;
        layout.apply(sheet, df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn export_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Stockholm.csv"), "title\nBrottstyp,Antal\nRan,4\n").unwrap();
        std::fs::write(dir.path().join("Alingsås.csv"), "title\nBrottstyp,Antal\nRan,1\n").unwrap();
        std::fs::write(dir.path().join("README.txt"), "ignored").unwrap();
        dir
    }

    #[test]
    fn lists_sheets_in_file_order() {
        let dir = export_dir();
        let sheets = CsvWorkbookExport::new().sheet_names(dir.path()).unwrap();
        assert_eq!(sheets, vec!["Alingsås", "Stockholm"]);
    }

    #[test]
    fn reads_sheet_with_layout() {
        let dir = export_dir();
        let df = CsvWorkbookExport::new()
            .read_sheet(dir.path(), "Stockholm", &SheetLayout::for_year(Some(2023)))
            .unwrap();
        assert_eq!(df.get_column_names_str(), vec!["Brottstyp", "Antal"]);
        assert_eq!(df.height(), 1);
    }

    #[test]
    fn missing_sheet_is_an_error() {
        let dir = export_dir();
        let err = CsvWorkbookExport::new()
            .read_sheet(dir.path(), "Solna", &SheetLayout::for_year(Some(2023)))
            .unwrap_err();
        assert!(matches!(err, IngestError::SheetNotFound { .. }));
    }

    #[test]
    fn plain_file_is_not_an_export() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("x.xlsx");
        std::fs::write(&file, "binary").unwrap();
        let err = CsvWorkbookExport::new().sheet_names(&file).unwrap_err();
        assert!(matches!(err, IngestError::NotAWorkbookExport { .. }));
    }
}
