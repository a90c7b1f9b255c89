//! Recipe execution.
//!
//! The runner applies a [`Pipeline`]'s steps in order. Every step returns
//! its input unchanged when it fails, so a run always produces a dataset;
//! what went wrong is in the accompanying report.

mod definition;

pub use definition::{Pipeline, Step};

use polars::prelude::DataFrame;
use tracing::{debug, info, info_span};

use crate::columns::{
    drop_columns, drop_summary_rows, fill_missing_with_zero, reorder_columns,
    standardize_column_names,
};
use crate::coordinates::split_coordinates;
use crate::dedupe::drop_duplicates;
use crate::inference::infer_and_coerce;
use crate::mapper::CategoryMapper;
use crate::report::NormalizationReport;

/// A cleaned dataset and the report of the run that produced it.
#[derive(Debug, Clone)]
pub struct NormalizedDataset {
    pub data: DataFrame,
    pub report: NormalizationReport,
}

/// Runs recipes against the code tables of a [`CategoryMapper`].
#[derive(Debug, Clone, Copy)]
pub struct PipelineRunner<'a> {
    mapper: &'a CategoryMapper,
}

impl<'a> PipelineRunner<'a> {
    pub fn new(mapper: &'a CategoryMapper) -> Self {
        Self { mapper }
    }

    pub fn run(&self, pipeline: &Pipeline, df: DataFrame) -> NormalizedDataset {
        let mut report = NormalizationReport::new();
        let data = self.run_with_report(pipeline, df, &mut report);
        NormalizedDataset { data, report }
    }

    /// Runs `pipeline`, recording into an existing report.
    pub fn run_with_report(
        &self,
        pipeline: &Pipeline,
        df: DataFrame,
        report: &mut NormalizationReport,
    ) -> DataFrame {
        let span = info_span!("pipeline", name = %pipeline.name);
        let _guard = span.enter();
        let (rows_before, columns_before) = (df.height(), df.width());

        let mut df = df;
        for step in &pipeline.steps {
            df = self.apply(step, df, report);
            debug!(
                step = step.name(),
                rows = df.height(),
                columns = df.width(),
                "step applied"
            );
        }

        info!(
            rows_before,
            rows_after = df.height(),
            columns_before,
            columns_after = df.width(),
            steps = pipeline.steps.len(),
            "pipeline completed"
        );
        df
    }

    fn apply(&self, step: &Step, df: DataFrame, report: &mut NormalizationReport) -> DataFrame {
        match step {
            Step::DropDuplicates { subset, keep } => {
                drop_duplicates(df, subset.as_deref(), *keep, report)
            }
            Step::DropColumns { columns } => drop_columns(df, columns, report),
            Step::SplitCoordinates { column } => split_coordinates(df, column, report),
            Step::InferTypes => infer_and_coerce(df, report),
            Step::MapCategories { columns } => {
                self.mapper.map_columns(df, columns.as_deref(), report)
            }
            Step::StandardizeColumnNames => standardize_column_names(df, report),
            Step::ReorderColumns { columns } => reorder_columns(df, columns, report),
            Step::DropSummaryRows { column, markers } => {
                drop_summary_rows(df, column, markers, report)
            }
            Step::FillMissingWithZero => fill_missing_with_zero(df, report),
        }
    }
}
