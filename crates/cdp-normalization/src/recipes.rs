//! Built-in recipes for the three source types.

use cdp_model::KeyedRow;
use cdp_vocabulary::StatisticsTable;
use tracing::info;

use crate::decoder::KeyedRowDecoder;
use crate::error::Result;
use crate::mapper::CategoryMapper;
use crate::options::PipelineOptions;
use crate::pipeline::{NormalizedDataset, Pipeline, PipelineRunner, Step};
use crate::report::NormalizationReport;

pub const EVENT_FEED: &str = "event_feed";
pub const STATISTICS_FEED: &str = "statistics_feed";
pub const SPREADSHEET_FEED: &str = "spreadsheet_feed";

/// Police event feed: dedupe, drop identifiers, split coordinates, type,
/// standardize names, reorder and drop summary rows.
pub fn event_feed(options: &PipelineOptions) -> Pipeline {
    Pipeline::new(EVENT_FEED)
        .step(Step::DropDuplicates {
            subset: None,
            keep: options.keep,
        })
        .step(Step::DropColumns {
            columns: options.event_drop_columns.clone(),
        })
        .step(Step::SplitCoordinates {
            column: options.coordinate_column.clone(),
        })
        .step(Step::InferTypes)
        .step(Step::StandardizeColumnNames)
        .step(Step::ReorderColumns {
            columns: options.event_order.clone(),
        })
        .step(Step::DropSummaryRows {
            column: options.summary_column.clone(),
            markers: options.summary_markers.clone(),
        })
}

/// Statistics tables: dedupe, map codes, type, standardize names and,
/// when `order` is given, reorder.
pub fn statistics_feed(options: &PipelineOptions, order: Option<&[String]>) -> Pipeline {
    let pipeline = Pipeline::new(STATISTICS_FEED)
        .step(Step::DropDuplicates {
            subset: None,
            keep: options.keep,
        })
        .step(Step::MapCategories { columns: None })
        .step(Step::InferTypes)
        .step(Step::StandardizeColumnNames);
    match order {
        Some(columns) => pipeline.step(Step::ReorderColumns {
            columns: columns.to_vec(),
        }),
        None => pipeline,
    }
}

/// Folded crime-statistics sheets: dedupe, type, zero-fill and drop the
/// legacy columns.
pub fn spreadsheet_feed(options: &PipelineOptions) -> Pipeline {
    Pipeline::new(SPREADSHEET_FEED)
        .step(Step::DropDuplicates {
            subset: None,
            keep: options.keep,
        })
        .step(Step::InferTypes)
        .step(Step::FillMissingWithZero)
        .step(Step::DropColumns {
            columns: options.legacy_columns.clone(),
        })
}

/// Decodes a statistics table's keyed rows and runs the statistics recipe.
///
/// Reorders to `options.statistics_order` when set and to the table's
/// canonical order otherwise. Key decoding errors fail the table.
pub fn normalize_statistics(
    table: StatisticsTable,
    rows: &[KeyedRow],
    mapper: &CategoryMapper,
    options: &PipelineOptions,
) -> Result<NormalizedDataset> {
    let decoder = KeyedRowDecoder::new(
        table.dimensions(mapper.tables().region()),
        table.metric_names().iter().map(|m| (*m).to_string()).collect(),
    )?;
    let mut report = NormalizationReport::new();
    let decoded = decoder.decode(rows, &mut report)?;
    info!(table = %table, rows = decoded.height(), "decoded statistics table");

    let order: Vec<String> = match &options.statistics_order {
        Some(order) => order.clone(),
        None => table
            .canonical_order()
            .iter()
            .map(|c| (*c).to_string())
            .collect(),
    };
    let pipeline = statistics_feed(options, Some(&order));
    let data = PipelineRunner::new(mapper).run_with_report(&pipeline, decoded, &mut report);
    Ok(NormalizedDataset { data, report })
}
