//! CLI argument definitions for the crime and demographics pipeline.

use std::path::PathBuf;

use cdp_vocabulary::StatisticsTable;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "cdp",
    version,
    about = "Normalize police events, population statistics and crime spreadsheets",
    long_about = "Normalize raw crime and demographics data into typed, labelled tables.\n\n\
                  Reads already-fetched police event JSON, statistics API responses and\n\
                  crime-statistics workbook exports, and appends the cleaned tables to\n\
                  CSV files in the output directory."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize a police event feed (JSON array of events).
    Events(EventsArgs),

    /// Normalize one statistics table response.
    Statistics(StatisticsArgs),

    /// Fold and normalize crime-statistics workbooks not yet processed.
    Spreadsheets(SpreadsheetArgs),

    /// List the bundled region codes.
    Regions,
}

/// Options shared by every normalizing command.
#[derive(Parser)]
pub struct OutputArgs {
    /// Directory the cleaned tables are appended to.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// JSON file overriding the default pipeline options.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Normalize and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct EventsArgs {
    /// Event feed JSON file.
    #[arg(value_name = "EVENTS_JSON")]
    pub input: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser)]
pub struct StatisticsArgs {
    /// Statistics table the response belongs to.
    #[arg(long = "table", value_enum)]
    pub table: TableArg,

    /// Statistics API response JSON file.
    #[arg(value_name = "RESPONSE_JSON")]
    pub input: PathBuf,

    /// Keep only these periods (`YYYY`, or `YYYYMmm` for monthly tables).
    #[arg(long = "period", value_name = "PERIOD")]
    pub periods: Vec<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser)]
pub struct SpreadsheetArgs {
    /// Folder holding the workbook exports.
    #[arg(value_name = "WORKBOOK_FOLDER")]
    pub folder: PathBuf,

    /// Ledger of workbooks already folded.
    #[arg(long = "ledger", value_name = "PATH", default_value = "excel_files_log.txt")]
    pub ledger: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum TableArg {
    MaritalStatus,
    Education,
    HouseholdsWithChildren,
    SocialBenefits,
}

impl From<TableArg> for StatisticsTable {
    fn from(arg: TableArg) -> Self {
        match arg {
            TableArg::MaritalStatus => Self::MaritalStatus,
            TableArg::Education => Self::Education,
            TableArg::HouseholdsWithChildren => Self::HouseholdsWithChildren,
            TableArg::SocialBenefits => Self::SocialBenefits,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
