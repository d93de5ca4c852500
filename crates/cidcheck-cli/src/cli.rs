//! Command line arguments for `cidcheck`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "cidcheck",
    version,
    about = "Validate tabular data files against an interface description",
    long_about = "Validate delimited and fixed-width data files against an interface \
                  description (CID).\n\n\
                  The CID declares the data format, one field per column, and named \
                  checks that span rows."
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

    /// Allow cell values from data files to appear in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the fields and checks of an interface description.
    Show(ShowArgs),

    /// Validate data files against an interface description.
    Validate(ValidateArgs),
}

#[derive(Parser)]
pub struct ShowArgs {
    /// Interface description file.
    #[arg(long = "cid", value_name = "PATH")]
    pub cid: PathBuf,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Interface description file.
    #[arg(long = "cid", value_name = "PATH")]
    pub cid: PathBuf,

    /// Data files to validate.
    #[arg(value_name = "DATA", required = true)]
    pub data: Vec<PathBuf>,

    /// Stop validating a file after this many diagnostics.
    ///
    /// Checks that are decided at the end of the data do not run for a file
    /// that hit the limit.
    #[arg(long = "max-diagnostics", value_name = "N")]
    pub max_diagnostics: Option<usize>,

    /// How to print the validation results.
    #[arg(long = "report", value_enum, default_value = "table")]
    pub report: ReportFormatArg,
}

#[derive(Clone, Copy, ValueEnum)]
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
