//! Workbook files read with `calamine` (`.xlsx`, `.xls`).

use std::path::Path;

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};
use polars::prelude::*;

use super::export::{CsvWorkbookExport, WorkbookSource};
use super::sheets::SheetLayout;
use crate::csv::CsvShape;
use crate::error::{IngestError, Result};

/// Datetime cells are rendered in the form inference parses back.
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Workbook files on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcelWorkbook;

impl ExcelWorkbook {
    pub fn new() -> Self {
        Self
    }
}

fn open(workbook: &Path) -> Result<Sheets<std::io::BufReader<std::fs::File>>> {
    open_workbook_auto(workbook).map_err(|e| IngestError::Workbook {
        path: workbook.to_path_buf(),
        message: e.to_string(),
    })
}

impl WorkbookSource for ExcelWorkbook {
    fn sheet_names(&self, workbook: &Path) -> Result<Vec<String>> {
        Ok(open(workbook)?.sheet_names())
    }

    fn read_sheet(
        &self,
        workbook: &Path,
        sheet: &str,
        layout: &SheetLayout,
    ) -> Result<DataFrame> {
        let mut book = open(workbook)?;
        if !book.sheet_names().iter().any(|name| name == sheet) {
            return Err(IngestError::SheetNotFound {
                workbook: workbook.to_path_buf(),
                sheet: sheet.to_string(),
            });
        }
        let range = book
            .worksheet_range(sheet)
            .map_err(|e| IngestError::Workbook {
                path: workbook.to_path_buf(),
                message: format!("sheet '{sheet}': {e}"),
            })?;
        let df = range_to_frame(&range, layout.shape())?;
        tracing::debug!(
            workbook = %workbook.display(),
            sheet,
            rows = df.height(),
            columns = df.width(),
            "read sheet"
        );
        layout.apply(sheet, df)
    }
}

/// Reads workbook files with [`ExcelWorkbook`] and export directories with
/// [`CsvWorkbookExport`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkbookFiles {
    files: ExcelWorkbook,
    exports: CsvWorkbookExport,
}

impl WorkbookFiles {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WorkbookSource for WorkbookFiles {
    fn sheet_names(&self, workbook: &Path) -> Result<Vec<String>> {
        if workbook.is_dir() {
            self.exports.sheet_names(workbook)
        } else {
            self.files.sheet_names(workbook)
        }
    }

    fn read_sheet(
        &self,
        workbook: &Path,
        sheet: &str,
        layout: &SheetLayout,
    ) -> Result<DataFrame> {
        if workbook.is_dir() {
            self.exports.read_sheet(workbook, sheet, layout)
        } else {
            self.files.read_sheet(workbook, sheet, layout)
        }
    }
}

/// Text rendering of one cell; empty and error cells are null.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.trim().is_empty() => None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(
            dt.as_datetime()
                .map(|d| d.format(DATETIME_FORMAT).to_string())
                .unwrap_or_else(|| dt.as_f64().to_string()),
        ),
    }
}

/// Builds a text frame from a sheet range the way the CSV reader would read
/// the same sheet exported to CSV.
///
/// Row positions count from the top of the sheet, not from the first used
/// cell, so `skip_rows` matches what a spreadsheet user sees.
fn range_to_frame(range: &Range<Data>, shape: CsvShape) -> Result<DataFrame> {
    let first_row = range.start().map_or(0, |(row, _)| row as usize);
    let width = range.width();
    let mut rows = range
        .rows()
        .enumerate()
        .filter(|(offset, _)| first_row + offset >= shape.skip_rows)
        .map(|(_, row)| row);

    let mut names: Vec<String> = Vec::with_capacity(width);
    if shape.has_header {
        let header = rows.next().unwrap_or(&[]);
        for index in 0..width {
            let name = header
                .get(index)
                .and_then(cell_text)
                .unwrap_or_else(|| format!("column_{}", index + 1));
            let name = if names.contains(&name) {
                format!("{name}_{}", index + 1)
            } else {
                name
            };
            names.push(name);
        }
    } else {
        names.extend((0..width).map(|index| format!("column_{}", index + 1)));
    }

    let mut values: Vec<Vec<Option<String>>> = vec![Vec::new(); width];
    for row in rows {
        for (index, column) in values.iter_mut().enumerate() {
            column.push(row.get(index).and_then(cell_text));
        }
    }

    let columns = names
        .into_iter()
        .zip(values)
        .map(|(name, column)| Series::new(name.into(), column).into_column())
        .collect();
    Ok(DataFrame::new(columns)?)
}
