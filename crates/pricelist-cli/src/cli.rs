//! CLI argument definitions for the price-list validator.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "pricelist",
    version,
    about = "Validate supplier price lists against configured field rules",
    long_about = "Validate supplier price lists against configured field rules.\n\n\
                  Headers are mapped to canonical fields, every row is checked against\n\
                  the legacy or native rule schema, and cross-row checks run on the\n\
                  whole file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
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

    /// Allow cell values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a CSV price list.
    Validate(ValidateArgs),

    /// List the configured fields and their rule schema.
    Fields(FieldsArgs),

    /// Print the normalized key of each header.
    Normalize {
        #[arg(value_name = "HEADER", required = true)]
        headers: Vec<String>,
    },
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// CSV price list to validate.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Directory holding header_alternatives.json, field_rules.json and the
    /// optional reference files.
    #[arg(long = "standards", value_name = "DIR")]
    pub standards: PathBuf,

    /// Run options (TOML).
    #[arg(long = "options", value_name = "TOML")]
    pub options: Option<PathBuf>,

    /// Workbook metadata (default: <FILE>.metadata.json when present).
    #[arg(long = "metadata", value_name = "JSON")]
    pub metadata: Option<PathBuf>,

    /// Report format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: ReportFormatArg,

    /// CSV delimiter (sniffed from the first line when omitted).
    #[arg(long = "delimiter", value_name = "CHAR")]
    pub delimiter: Option<char>,
}

#[derive(Parser)]
pub struct FieldsArgs {
    #[arg(long = "standards", value_name = "DIR")]
    pub standards: PathBuf,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormatArg {
    Table,
    Json,
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
