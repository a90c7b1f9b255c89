//! Folding of crime-statistics workbooks into one working dataset.
//!
//! Each pending workbook contributes one frame per selected sheet, tagged
//! with the municipality (sheet name), year and region taken from the file
//! name. The ledger is appended as soon as a workbook has been folded, so an
//! interrupted run resumes with the workbooks that were not. A batch built
//! with [`SpreadsheetBatch::unrecorded`] never touches a ledger.

use cdp_ingest::{
    DiscoveredWorkbook, IngestionLedger, SheetLayout, WorkbookSource, select_sheets,
};
use polars::prelude::*;
use tracing::{debug, info};

use crate::error::Result;
use crate::frame::concat_union;
use crate::report::NormalizationReport;

pub(crate) const STEP: &str = "fold_workbooks";

pub const MUNICIPALITY_COLUMN: &str = "kommun";
pub const YEAR_COLUMN: &str = "year";
pub const REGION_COLUMN: &str = "region";

/// Workbooks from `workbooks` that the ledger has not seen, in input order.
pub fn pending_workbooks<'w>(
    ledger: &IngestionLedger,
    workbooks: &'w [DiscoveredWorkbook],
) -> Vec<&'w DiscoveredWorkbook> {
    workbooks
        .iter()
        .filter(|w| !ledger.contains(&w.file_name))
        .collect()
}

pub struct SpreadsheetBatch<'a, S: WorkbookSource> {
    source: &'a S,
    ledger: Option<&'a mut IngestionLedger>,
    frames: Vec<DataFrame>,
    report: NormalizationReport,
}

impl<'a, S: WorkbookSource> SpreadsheetBatch<'a, S> {
    pub fn new(source: &'a S, ledger: &'a mut IngestionLedger) -> Self {
        Self::with_ledger(source, Some(ledger))
    }

    /// A batch that folds without marking workbooks processed (dry runs).
    pub fn unrecorded(source: &'a S) -> Self {
        Self::with_ledger(source, None)
    }

    fn with_ledger(source: &'a S, ledger: Option<&'a mut IngestionLedger>) -> Self {
        Self {
            source,
            ledger,
            frames: Vec::new(),
            report: NormalizationReport::new(),
        }
    }

    /// Reads the selected sheets of `workbook` into the working dataset and
    /// marks the workbook processed. Returns the number of sheets folded.
    ///
    /// A sheet that cannot be read is reported and skipped. A workbook whose
    /// sheets cannot be listed is reported as an error and left out of the
    /// ledger so the next run retries it. Failing to append to the ledger is
    /// an error.
    pub fn fold_workbook(&mut self, workbook: &DiscoveredWorkbook) -> Result<usize> {
        let sheet_names = match self.source.sheet_names(&workbook.path) {
            Ok(names) => names,
            Err(err) => {
                self.report
                    .error(STEP, None, format!("{}: {err}", workbook.file_name));
                return Ok(0);
            }
        };
        let sheets = select_sheets(&sheet_names);
        let layout = SheetLayout::for_year(workbook.meta.year_number());
        debug!(
            workbook = %workbook.file_name,
            sheets = sheets.len(),
            ?layout,
            "folding workbook"
        );

        let mut folded = 0;
        for sheet in &sheets {
            let read = self
                .source
                .read_sheet(&workbook.path, sheet, &layout)
                .map_err(crate::NormalizationError::from)
                .and_then(|df| tag_sheet(df, sheet, workbook).map_err(Into::into));
            match read {
                Ok(df) => {
                    self.frames.push(df);
                    folded += 1;
                }
                Err(err) => self.report.warning(
                    STEP,
                    None,
                    format!("{} / {sheet}: {err}", workbook.file_name),
                ),
            }
        }

        if let Some(ledger) = self.ledger.as_deref_mut() {
            ledger.mark_processed(&workbook.file_name)?;
        }
        info!(workbook = %workbook.file_name, sheets = folded, "workbook folded");
        Ok(folded)
    }

    pub fn sheet_count(&self) -> usize {
        self.frames.len()
    }

    pub fn report(&self) -> &NormalizationReport {
        &self.report
    }

    /// The union of all folded sheets and the folding report.
    pub fn finish(self) -> Result<(DataFrame, NormalizationReport)> {
        let df = concat_union(self.frames)?;
        Ok((df, self.report))
    }
}

fn tag_sheet(mut df: DataFrame, sheet: &str, workbook: &DiscoveredWorkbook) -> PolarsResult<DataFrame> {
    let height = df.height();
    let tags = [
        (MUNICIPALITY_COLUMN, sheet),
        (YEAR_COLUMN, workbook.meta.year.as_str()),
        (REGION_COLUMN, workbook.meta.region.as_str()),
    ];
    for (name, value) in tags {
        df.with_column(Series::new(name.into(), vec![value; height]).into_column())?;
    }
    Ok(df)
}
