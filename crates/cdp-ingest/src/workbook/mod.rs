//! Workbook sheets: which to read, how they are laid out, where they come from.

mod excel;
mod export;
mod sheets;

pub use excel::{ExcelWorkbook, WorkbookFiles};
pub use export::{CsvWorkbookExport, WorkbookSource};
pub use sheets::{HEADERLESS_COLUMNS, SKIPPED_SHEETS, SheetLayout, select_sheets};
