//! CLI argument definitions for the reconciliation tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "recon",
    version,
    about = "Reconcile user and transaction JSON exports into one scrubbed CSV",
    long_about = "Reconcile user profiles and transactions into a single CSV.\n\n\
                  Accepts JSON arrays, wrapped arrays, single objects, newline-delimited\n\
                  and concatenated JSON. Dates are normalized, amounts rounded and\n\
                  personal data (emails, national ids, phones, notes) masked."
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

    /// Allow cell values in trace logs. They contain personal data.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Merge users into transactions and write the cleaned CSV.
    Clean(CleanArgs),

    /// Show how a single source is read and how its columns are classified.
    Inspect(InspectArgs),
}

#[derive(Parser)]
pub struct CleanArgs {
    /// User profiles (JSON, NDJSON or concatenated JSON).
    #[arg(value_name = "USERS")]
    pub users: PathBuf,

    /// Transactions (JSON, NDJSON or concatenated JSON).
    #[arg(value_name = "TRANSACTIONS")]
    pub transactions: PathBuf,

    /// Destination CSV (default: cleaned.csv next to TRANSACTIONS).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Run every stage and print the report without writing the CSV.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Source file to inspect.
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,
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
