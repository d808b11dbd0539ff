//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "sdtm",
    version,
    about = "Normalize SDTM domain tables and check their conformance",
    long_about = "Normalize clinical domain tables against CDISC Controlled Terminology,\n\
                  validate them against SDTMIG variable metadata and split\n\
                  non-standard columns into SUPP-- qualifier datasets."
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

    /// Allow raw clinical values in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Standards directory (default: $CDISC_STANDARDS_DIR, then ./standards).
    #[arg(long = "standards-dir", value_name = "DIR", global = true)]
    pub standards_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Process a folder of <DOMAIN>.csv files.
    Study(StudyArgs),

    /// List the domains in the standards registry.
    Domains,
}

#[derive(Parser)]
pub struct StudyArgs {
    /// Folder containing one CSV file per domain.
    #[arg(value_name = "STUDY_FOLDER")]
    pub study_folder: PathBuf,

    /// Output directory for generated files (default: <STUDY_FOLDER>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Study identifier (default: derived from the folder name).
    #[arg(long = "study-id", value_name = "ID")]
    pub study_id: Option<String>,

    /// JSON file with one mapping configuration per domain.
    #[arg(long = "mapping", value_name = "PATH")]
    pub mapping: Option<PathBuf>,

    /// Validate and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Match controlled terminology exactly; no synonym or compact matching.
    #[arg(long = "strict")]
    pub strict: bool,

    /// Map unmatched terminology values to OTHER or UNKNOWN when the
    /// codelist has such a term.
    #[arg(long = "ct-fallback")]
    pub ct_fallback: bool,

    /// Do not report missing Permissible variables.
    #[arg(long = "suppress-permissible")]
    pub suppress_permissible: bool,
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
