//! Command-line argument definitions for the extract validator
//!
//! The complete CLI surface is defined here with the clap derive API.
//! Three subcommands exist: `process` for a single file, `process-all`
//! for a directory of extracts, and `report` for a quality report without
//! writing any output.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::constants::{DEFAULT_BAD_ROW_SAMPLE_SIZE, DEFAULT_MAX_CONCURRENT_FILES};
use crate::{Error, Result};

/// CLI arguments for the extract validator
///
/// Reconciles and type-validates legacy tab-delimited database extracts,
/// emitting pipe-delimited output ready for bulk loading.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "extract_validator",
    version,
    about = "Reconcile and type-validate legacy tab-delimited extracts for bulk loading",
    long_about = "Validates legacy tab-delimited database extracts against a declared schema \
                  catalog: NUL bytes are stripped, row widths are reconciled (pad, truncate, \
                  realign or flag), values are checked against declared column types, and the \
                  result is emitted as pipe-delimited lines with \\N null sentinels. Every \
                  repair is recorded in a modification ledger and summarized in a quality \
                  report."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Validate a single extract file
    Process(ProcessArgs),
    /// Validate every known extract in a directory
    ProcessAll(ProcessAllArgs),
    /// Produce a quality report without writing validated output
    Report(ReportArgs),
}

/// Arguments for the process command
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// Extract file to validate
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output path for the validated pipe-delimited file
    ///
    /// Defaults to the source path with a `.psv` extension.
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub schema: SchemaArgs,

    #[command(flatten)]
    pub run: RunArgs,

    #[command(flatten)]
    pub logging: LoggingArgs,

    /// Output format for the end-of-run report
    #[arg(long = "output-format", value_enum, default_value = "human")]
    pub output_format: OutputFormat,
}

/// Arguments for the process-all command
#[derive(Debug, Clone, Parser)]
pub struct ProcessAllArgs {
    /// Directory containing the extract files
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Output directory for validated files
    ///
    /// Defaults to the input directory; each output keeps its source
    /// file stem with a `.psv` extension.
    #[arg(short = 'o', long = "output-dir", value_name = "PATH")]
    pub output_dir: Option<PathBuf>,

    /// Number of files validated concurrently
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        default_value_t = DEFAULT_MAX_CONCURRENT_FILES
    )]
    pub workers: usize,

    #[command(flatten)]
    pub schema: SchemaArgs,

    #[command(flatten)]
    pub run: RunArgs,

    #[command(flatten)]
    pub logging: LoggingArgs,

    /// Output format for the aggregate report
    #[arg(long = "output-format", value_enum, default_value = "human")]
    pub output_format: OutputFormat,
}

/// Arguments for the report command
#[derive(Debug, Clone, Parser)]
pub struct ReportArgs {
    /// Extract file to analyze
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub schema: SchemaArgs,

    #[command(flatten)]
    pub run: RunArgs,

    #[command(flatten)]
    pub logging: LoggingArgs,

    /// Output format for the report
    #[arg(long = "output-format", value_enum, default_value = "human")]
    pub output_format: OutputFormat,
}

/// Schema catalog location options shared by all subcommands
#[derive(Debug, Clone, Parser)]
pub struct SchemaArgs {
    /// Schema directory holding tables.json, table-dtypes/ and lookup/
    #[arg(
        short = 's',
        long = "schema-dir",
        value_name = "PATH",
        default_value = "schema"
    )]
    pub schema_dir: PathBuf,

    /// JSON file of per-file exception policy overrides
    ///
    /// Entries are merged over the built-in policies; file entries win.
    #[arg(short = 'p', long = "policies", value_name = "FILE")]
    pub policies: Option<PathBuf>,
}

/// Run behavior options shared by all subcommands
#[derive(Debug, Clone, Parser)]
pub struct RunArgs {
    /// Export flagged raw rows to a sibling `_bad_rows.csv` artifact
    #[arg(long = "export-bad-rows")]
    pub export_bad_rows: bool,

    /// Keep the NUL-stripped `_no_nul` sibling after the run
    #[arg(long = "keep-stripped")]
    pub keep_stripped: bool,

    /// Emit flagged rows into the output at their original width instead
    /// of withholding them
    #[arg(long = "emit-flagged")]
    pub emit_flagged: bool,

    /// Bad rows retained in the in-memory sample
    #[arg(
        long = "sample-size",
        value_name = "COUNT",
        default_value_t = DEFAULT_BAD_ROW_SAMPLE_SIZE
    )]
    pub sample_size: usize,
}

/// Logging verbosity options shared by all subcommands
#[derive(Debug, Clone, Parser)]
pub struct LoggingArgs {
    /// Increase logging verbosity (-v: debug, -vv: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

impl LoggingArgs {
    /// Tracing level implied by the verbosity flags
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Output format options for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

impl Args {
    /// Logging options of whichever subcommand was given
    pub fn logging(&self) -> LoggingArgs {
        match &self.command {
            Some(Commands::Process(args)) => args.logging.clone(),
            Some(Commands::ProcessAll(args)) => args.logging.clone(),
            Some(Commands::Report(args)) => args.logging.clone(),
            None => LoggingArgs {
                verbose: 0,
                quiet: false,
            },
        }
    }
}

impl ProcessArgs {
    /// Output path, defaulting to the source with a `.psv` extension
    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => self.file.with_extension("psv"),
        }
    }
}

impl ProcessAllArgs {
    /// Effective worker count, never zero
    pub fn effective_workers(&self) -> usize {
        self.workers.clamp(1, num_cpus::get().max(1))
    }

    /// Validate the directory argument before any work starts
    pub fn validate(&self) -> Result<()> {
        if !self.directory.is_dir() {
            return Err(Error::configuration(format!(
                "'{}' is not a directory",
                self.directory.display()
            )));
        }
        Ok(())
    }
}
