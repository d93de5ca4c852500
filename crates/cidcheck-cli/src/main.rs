//! `cidcheck` command line tool.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use cidcheck_cli::commands::{has_diagnostics, load_cid, run_validate};
use cidcheck_cli::logging::{LogConfig, LogFormat, init_logging};
use cidcheck_cli::summary::{print_reports, print_schema};
use cidcheck_validate::ValidationOptions;

mod cli;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg, ReportFormatArg, ValidateArgs};

const EXIT_VALID: u8 = 0;
const EXIT_DIAGNOSTICS: u8 = 1;
const EXIT_FAILURE: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&log_config_from_cli(&cli)) {
        eprintln!("error: failed to initialize logging: {error}");
        return ExitCode::from(EXIT_FAILURE);
    }
    let outcome = match &cli.command {
        Command::Show(args) => load_cid(&args.cid).map(|cid| {
            print_schema(&cid);
            EXIT_VALID
        }),
        Command::Validate(args) => validate(args),
    };
    match outcome {
        Ok(code) => ExitCode::from(code),
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn validate(args: &ValidateArgs) -> Result<u8> {
    let mut options = ValidationOptions::new();
    if let Some(max) = args.max_diagnostics {
        options = options.with_max_diagnostics(max);
    }
    let reports = run_validate(&args.cid, &args.data, &options)?;
    match args.report {
        ReportFormatArg::Table => print_reports(&reports),
        ReportFormatArg::Json => {
            let json = serde_json::to_string_pretty(&reports).context("render report")?;
            println!("{json}");
        }
    }
    Ok(if has_diagnostics(&reports) {
        EXIT_DIAGNOSTICS
    } else {
        EXIT_VALID
    })
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        use_env_filter: !(cli.verbosity.is_present() || cli.log_level.is_some()),
        ..LogConfig::default()
    };
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config
        .with_format(format)
        .with_log_file(cli.log_file.clone())
        .with_log_data(cli.log_data)
}
