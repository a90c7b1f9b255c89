//! Run report.
//!
//! Every recoverable condition a step meets is recorded here and emitted as
//! a `tracing` event at the same time, so callers can inspect outcomes
//! without scraping logs.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use cdp_model::ColumnSpec;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub step: String,
    pub column: Option<String>,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizationReport {
    pub entries: Vec<ReportEntry>,
    /// Rows removed by deduplication.
    pub duplicates_removed: usize,
    /// Rows removed by the summary-row filter.
    pub rows_dropped: usize,
    /// Null cells replaced by zero fill.
    pub nulls_filled: usize,
    /// Distinct codes without a label, per column.
    pub unmapped: BTreeMap<String, BTreeSet<String>>,
    /// Semantic types decided during inference, in column order.
    pub columns: Vec<ColumnSpec>,
}

impl NormalizationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, step: &str, column: Option<&str>, message: impl Into<String>) {
        self.record(step, column, Severity::Info, message.into());
    }

    pub fn warning(&mut self, step: &str, column: Option<&str>, message: impl Into<String>) {
        self.record(step, column, Severity::Warning, message.into());
    }

    pub fn error(&mut self, step: &str, column: Option<&str>, message: impl Into<String>) {
        self.record(step, column, Severity::Error, message.into());
    }

    fn record(&mut self, step: &str, column: Option<&str>, severity: Severity, message: String) {
        let column_field = column.unwrap_or("-");
        match severity {
            Severity::Info => info!(step, column = column_field, "{message}"),
            Severity::Warning => warn!(step, column = column_field, "{message}"),
            Severity::Error => error!(step, column = column_field, "{message}"),
        }
        self.entries.push(ReportEntry {
            step: step.to_string(),
            column: column.map(str::to_string),
            severity,
            message,
        });
    }

    /// Folds another report into this one, keeping entry order.
    pub fn merge(&mut self, other: NormalizationReport) {
        self.entries.extend(other.entries);
        self.duplicates_removed += other.duplicates_removed;
        self.rows_dropped += other.rows_dropped;
        self.nulls_filled += other.nulls_filled;
        for (column, codes) in other.unmapped {
            self.unmapped.entry(column).or_default().extend(codes);
        }
        self.columns.extend(other.columns);
    }

    /// Records or replaces the decided type of a column.
    pub fn set_column(&mut self, spec: ColumnSpec) {
        match self.columns.iter_mut().find(|c| c.name == spec.name) {
            Some(existing) => *existing = spec,
            None => self.columns.push(spec),
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub(crate) fn rename_column(&mut self, from: &str, to: &str) {
        if let Some(spec) = self.columns.iter_mut().find(|c| c.name == from) {
            spec.name = to.to_string();
        }
    }

    pub(crate) fn forget_column(&mut self, name: &str) {
        self.columns.retain(|c| c.name != name);
    }

    pub fn entries_for(&self, step: &str) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(move |e| e.step == step)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|e| e.severity == severity).count()
    }

    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }
}
