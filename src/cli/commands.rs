//! Command implementations for the extract validator CLI
//!
//! This module contains the command execution logic, progress reporting,
//! and the end-of-run summaries for the CLI interface.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use colored::Colorize;
use futures::{stream, StreamExt};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use tracing::{debug, error, info, warn};

use crate::app::services::file_validator::{FileValidator, ValidationOutcome};
use crate::app::services::schema_catalog::SchemaCatalog;
use crate::cli::args::{
    Args, Commands, LoggingArgs, OutputFormat, ProcessAllArgs, ProcessArgs, ReportArgs, RunArgs,
    SchemaArgs,
};
use crate::config::{PolicyCatalog, ValidatorConfig};
use crate::constants::{BAD_ROWS_SUFFIX, LOOKUP_DIR, NO_NUL_SUFFIX};
use crate::{Error, Result};

/// Aggregate statistics across every file of one invocation
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Files validated successfully
    pub files_processed: usize,
    /// Files that failed outright (bad header, unreadable, pre-pass failure)
    pub files_failed: usize,
    /// Data rows read across all files
    pub total_rows: u64,
    /// Rows handed to the sinks
    pub rows_emitted: u64,
    /// Rows lost to sink or read failures
    pub rows_skipped: u64,
    /// Flagged rows withheld from the sinks
    pub rows_withheld: u64,
    /// Rows with an empty or null-like primary key
    pub empty_primary_keys: u64,
    /// Modifications recorded across all ledgers
    pub modifications: usize,
    /// Bad rows observed across all files
    pub bad_rows: usize,
    /// Wall-clock duration of the whole invocation
    pub duration: std::time::Duration,
}

impl RunStats {
    /// Fold one file's outcome into the aggregate
    pub fn absorb(&mut self, outcome: &ValidationOutcome) {
        self.total_rows += outcome.total_rows;
        self.rows_emitted += outcome.rows_emitted;
        self.rows_skipped += outcome.rows_skipped;
        self.rows_withheld += outcome.rows_withheld;
        self.empty_primary_keys += outcome.empty_primary_keys;
        self.modifications += outcome.modification_count();
        self.bad_rows += outcome.bad_row_count;
    }
}

/// Main command runner
///
/// Sets up logging, then dispatches to the subcommand implementation.
pub async fn run(args: Args) -> Result<RunStats> {
    setup_logging(&args.logging())?;

    debug!("Command line arguments: {:?}", args);

    match args.command {
        Some(Commands::Process(process)) => process_file(process).await,
        Some(Commands::ProcessAll(all)) => process_all(all).await,
        Some(Commands::Report(report)) => report_file(report).await,
        None => Err(Error::configuration("no command given")),
    }
}

/// Set up structured logging based on CLI arguments
fn setup_logging(logging: &LoggingArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("extract_validator={}", logging.log_level()))
    });

    if logging.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    Ok(())
}

/// Load the schema catalog and preload any lookup code tables present
fn load_catalog(schema: &SchemaArgs) -> Result<SchemaCatalog> {
    let policies = match &schema.policies {
        Some(path) => PolicyCatalog::load(path)?,
        None => PolicyCatalog::default(),
    };

    let mut catalog = SchemaCatalog::load(&schema.schema_dir, policies)?;
    preload_lookup_tables(&mut catalog, &schema.schema_dir);
    info!(
        "Loaded schema catalog: {} known files",
        catalog.table_count()
    );
    Ok(catalog)
}

/// Load every lookup table present in the schema directory.
///
/// Lookup checks are detection-only, so a missing or malformed table is
/// never fatal; the affected columns simply go unchecked.
fn preload_lookup_tables(catalog: &mut SchemaCatalog, schema_dir: &Path) {
    let pattern = schema_dir.join(LOOKUP_DIR).join("*.json");
    let Ok(entries) = glob::glob(&pattern.to_string_lossy()) else {
        return;
    };

    for entry in entries.flatten() {
        if let Some(name) = entry.file_name().and_then(|n| n.to_str()) {
            catalog.load_lookup_table(name);
        }
    }
}

fn validator_config(run: &RunArgs, workers: usize) -> ValidatorConfig {
    let mut config = ValidatorConfig::default()
        .with_max_concurrent_files(workers)
        .with_bad_row_sample_size(run.sample_size);
    if run.export_bad_rows {
        config = config.with_export_bad_rows();
    }
    if run.keep_stripped {
        config = config.with_keep_stripped_artifact();
    }
    if run.emit_flagged {
        config = config.with_emit_flagged_rows();
    }
    config
}

/// Validate a single extract file
async fn process_file(args: ProcessArgs) -> Result<RunStats> {
    let started = Instant::now();
    let catalog = load_catalog(&args.schema)?;
    let config = validator_config(&args.run, 1);
    let output = args.output_path();
    let file = args.file.clone();

    let outcome = tokio::task::spawn_blocking(move || {
        let validator = FileValidator::new(&catalog, config);
        validator.validate_to_path(&file, &output)
    })
    .await
    .map_err(|e| Error::processing_interrupted(format!("validation task failed: {e}")))??;

    print_outcome(&outcome, args.output_format)?;

    let mut stats = RunStats {
        files_processed: 1,
        ..Default::default()
    };
    stats.absorb(&outcome);
    stats.duration = started.elapsed();
    Ok(stats)
}

/// Produce a quality report without writing validated output
async fn report_file(args: ReportArgs) -> Result<RunStats> {
    let started = Instant::now();
    let catalog = load_catalog(&args.schema)?;
    let config = validator_config(&args.run, 1);
    let file = args.file.clone();

    let outcome = tokio::task::spawn_blocking(move || {
        let validator = FileValidator::new(&catalog, config);
        let mut sink = std::io::sink();
        validator.validate(&file, &mut sink)
    })
    .await
    .map_err(|e| Error::processing_interrupted(format!("validation task failed: {e}")))??;

    print_outcome(&outcome, args.output_format)?;

    let mut stats = RunStats {
        files_processed: 1,
        ..Default::default()
    };
    stats.absorb(&outcome);
    stats.duration = started.elapsed();
    Ok(stats)
}

/// Validate every known extract in a directory, concurrently
async fn process_all(args: ProcessAllArgs) -> Result<RunStats> {
    let started = Instant::now();
    args.validate()?;

    let catalog = Arc::new(load_catalog(&args.schema)?);
    let workers = args.effective_workers();
    let config = validator_config(&args.run, workers);

    let files = discover_extracts(&args.directory, &catalog)
        .map_err(|e| Error::configuration(format!("{e:#}")))?;
    if files.is_empty() {
        warn!(
            "No known extract files found in {}",
            args.directory.display()
        );
        return Ok(RunStats::default());
    }

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| args.directory.clone());
    std::fs::create_dir_all(&output_dir)
        .map_err(|e| Error::io(format!("failed to create {}", output_dir.display()), e))?;

    info!(
        "Validating {} extracts with {} workers",
        files.len(),
        workers
    );

    let progress = if args.logging.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    };

    let results: Vec<Result<ValidationOutcome>> = stream::iter(files)
        .map(|path| {
            let catalog = Arc::clone(&catalog);
            let config = config.clone();
            let progress = progress.clone();
            let output = output_path_for(&output_dir, &path);
            let display_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            async move {
                progress.set_message(display_name);
                let result = tokio::task::spawn_blocking(move || {
                    let validator = FileValidator::new(&catalog, config);
                    validator.validate_to_path(&path, &output)
                })
                .await;
                progress.inc(1);
                match result {
                    Ok(outcome) => outcome,
                    Err(e) => Err(Error::processing_interrupted(format!(
                        "validation worker panicked: {e}"
                    ))),
                }
            }
        })
        .buffer_unordered(workers)
        .collect()
        .await;
    progress.finish_with_message("Validation complete");

    let mut stats = RunStats::default();
    let mut outcomes = Vec::new();
    for result in results {
        match result {
            Ok(outcome) => {
                info!("{}", outcome.summary());
                stats.absorb(&outcome);
                stats.files_processed += 1;
                outcomes.push(outcome);
            }
            Err(e) => {
                error!("File validation failed: {}", e);
                stats.files_failed += 1;
            }
        }
    }
    stats.duration = started.elapsed();
    outcomes.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    print_aggregate(&outcomes, &stats, args.output_format)?;
    Ok(stats)
}

/// Find the extract files in a directory that the catalog knows about.
///
/// Sibling artifacts from earlier runs (`_no_nul`, `_bad_rows`) and files
/// absent from the table map are skipped. The result is sorted so output
/// ordering is stable across runs.
fn discover_extracts(directory: &Path, catalog: &SchemaCatalog) -> anyhow::Result<Vec<PathBuf>> {
    use anyhow::Context;

    let pattern = directory.join("*.csv").to_string_lossy().into_owned();
    let entries =
        glob::glob(&pattern).with_context(|| format!("invalid glob pattern '{pattern}'"))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.context("failed to read directory entry")?;
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        if stem.ends_with(NO_NUL_SUFFIX) || stem.ends_with(BAD_ROWS_SUFFIX) {
            continue;
        }
        if !catalog.is_known_file(name) {
            debug!("Skipping {}: not in the table map", name);
            continue;
        }
        files.push(path);
    }

    files.sort();
    Ok(files)
}

fn output_path_for(output_dir: &Path, source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{stem}.psv"))
}

/// Print one file's end-of-run report
fn print_outcome(outcome: &ValidationOutcome, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outcome.report)?);
        }
        OutputFormat::Human => {
            println!();
            println!(
                "{}",
                format!("Validation complete: {}", outcome.file_name)
                    .bright_green()
                    .bold()
            );
            println!("  rows read:          {}", outcome.total_rows);
            println!("  rows emitted:       {}", outcome.rows_emitted);
            println!("  rows skipped:       {}", outcome.rows_skipped);
            println!("  rows withheld:      {}", outcome.rows_withheld);
            println!("  empty primary keys: {}", outcome.empty_primary_keys);
            println!("  bad rows:           {}", outcome.bad_row_count);
            println!("  duration:           {}", HumanDuration(outcome.duration));

            if !outcome.report.modification_counts.is_empty() {
                println!("  modifications:");
                for (kind, count) in &outcome.report.modification_counts {
                    println!("    {:22} {}", kind.as_str().bright_cyan(), count);
                }
            }
            if let Some(path) = &outcome.bad_rows_path {
                println!("  bad rows exported:  {}", path.display());
            }
            for recommendation in &outcome.report.recommendations {
                println!("  {}", recommendation.bright_yellow());
            }
            println!();
        }
    }
    Ok(())
}

/// Print the aggregate report for a process-all run
fn print_aggregate(
    outcomes: &[ValidationOutcome],
    stats: &RunStats,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let files: Vec<serde_json::Value> = outcomes
                .iter()
                .map(|outcome| {
                    serde_json::json!({
                        "file": outcome.file_name,
                        "duration_seconds": outcome.duration.as_secs_f64(),
                        "report": outcome.report,
                    })
                })
                .collect();
            let aggregate = serde_json::json!({
                "files_processed": stats.files_processed,
                "files_failed": stats.files_failed,
                "total_rows": stats.total_rows,
                "rows_emitted": stats.rows_emitted,
                "rows_skipped": stats.rows_skipped,
                "rows_withheld": stats.rows_withheld,
                "empty_primary_keys": stats.empty_primary_keys,
                "modifications": stats.modifications,
                "bad_rows": stats.bad_rows,
                "duration_seconds": stats.duration.as_secs_f64(),
                "files": files,
            });
            println!("{}", serde_json::to_string_pretty(&aggregate)?);
        }
        OutputFormat::Human => {
            println!();
            println!("{}", "Validation complete".bright_green().bold());
            println!("  files processed:    {}", stats.files_processed);
            if stats.files_failed > 0 {
                println!(
                    "  files failed:       {}",
                    stats.files_failed.to_string().bright_red()
                );
            }
            println!("  rows read:          {}", stats.total_rows);
            println!("  rows emitted:       {}", stats.rows_emitted);
            println!("  rows skipped:       {}", stats.rows_skipped);
            println!("  rows withheld:      {}", stats.rows_withheld);
            println!("  empty primary keys: {}", stats.empty_primary_keys);
            println!("  modifications:      {}", stats.modifications);
            println!("  bad rows:           {}", stats.bad_rows);
            println!("  duration:           {}", HumanDuration(stats.duration));

            for outcome in outcomes {
                let marker = if outcome.is_clean() {
                    "clean".bright_green()
                } else {
                    "repaired".bright_yellow()
                };
                println!(
                    "    {:30} {:>10} rows  [{}]",
                    outcome.file_name.bright_cyan(),
                    outcome.total_rows,
                    marker
                );
            }
            println!();
        }
    }
    Ok(())
}
