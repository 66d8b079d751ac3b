//! Per-file validation orchestration
//!
//! Runs the full pipeline for one extract: NUL-stripping pre-pass, header
//! read, schema resolution, then a single forward pass where every row is
//! width-reconciled, type-checked and emitted as a pipe-delimited line.
//! Rows that stay flagged are withheld from the sink by default. Per-row
//! problems become ledger entries; only an unusable file is fatal.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};

use super::result::ValidationOutcome;
use super::stream::RecordStream;
use crate::app::models::{BadRowEntry, Modification, TypeViolation};
use crate::app::services::ledger::{ModificationLedger, QualityReport};
use crate::app::services::null_strip;
use crate::app::services::row_reconciler::{reconcile_width, try_shift_realign};
use crate::app::services::schema_catalog::SchemaCatalog;
use crate::app::services::value_validator::field_parsers::strip_pipes;
use crate::app::services::value_validator::ValueValidator;
use crate::config::ValidatorConfig;
use crate::constants::{BAD_ROWS_SUFFIX, INPUT_DELIMITER, OUTPUT_DELIMITER};
use crate::{Error, Result};

/// Sibling path for the flagged-row export artifact
pub fn bad_rows_path(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    source.with_file_name(format!("{stem}{BAD_ROWS_SUFFIX}.csv"))
}

/// Validator for one extract file at a time
///
/// Holds the shared read-only schema catalog; every run owns its own
/// ledger and bad-row collection, so separate files can be validated by
/// independent workers without locking.
#[derive(Debug)]
pub struct FileValidator<'a> {
    catalog: &'a SchemaCatalog,
    config: ValidatorConfig,
}

impl<'a> FileValidator<'a> {
    /// Create a validator against a loaded schema catalog
    pub fn new(catalog: &'a SchemaCatalog, config: ValidatorConfig) -> Self {
        Self { catalog, config }
    }

    /// Validate `source` and write normalized lines to a file at `output`
    pub fn validate_to_path(&self, source: &Path, output: &Path) -> Result<ValidationOutcome> {
        let file = File::create(output)
            .map_err(|e| Error::io(format!("failed to create {}", output.display()), e))?;
        let mut sink = BufWriter::new(file);
        let outcome = self.validate(source, &mut sink)?;
        sink.flush()
            .map_err(|e| Error::sink(format!("failed to flush {}", output.display()), e))?;
        Ok(outcome)
    }

    /// Validate `source`, streaming normalized pipe-delimited lines into
    /// the sink.
    ///
    /// Every line reaching the sink has exactly the schema width; rows
    /// still flagged after reconciliation are withheld from the sink
    /// unless the configuration says otherwise, and survive in the
    /// bad-row sample and export artifact.
    ///
    /// The source file is never mutated. A sink failure for a single row
    /// is counted as skipped and the stream continues; the pre-pass and
    /// header read are the only fatal stages.
    pub fn validate<W: Write>(&self, source: &Path, sink: &mut W) -> Result<ValidationOutcome> {
        let started = Instant::now();
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if !source.exists() {
            return Err(Error::file_not_found(source.display().to_string()));
        }

        info!("Validating {}", file_name);

        // A pre-pass artifact left by an earlier stage is reused as-is;
        // otherwise the pre-pass runs now and must fully complete before
        // the stream opens. The stream always reads whichever byte-clean
        // path is available, falling back to the source itself.
        if !null_strip::stripped_path(source).exists() {
            null_strip::strip_nul_bytes(source)?;
        }
        let (header, stream) = RecordStream::open(&null_strip::readable_path(source))?;

        let schema = self.catalog.schema_for(source, &header);
        let validator = ValueValidator::new(&schema).with_lookup_codes(self.catalog);
        debug!(
            "Schema for {}: {} columns, dtypes: {}",
            file_name,
            schema.width(),
            schema.has_dtypes
        );

        let mut ledger = ModificationLedger::new();
        let mut bad_rows: Vec<BadRowEntry> = Vec::new();
        let mut total_rows: u64 = 0;
        let mut rows_emitted: u64 = 0;
        let mut rows_skipped: u64 = 0;
        let mut rows_withheld: u64 = 0;
        let mut empty_primary_keys: u64 = 0;

        for record in stream {
            let raw = match record {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("Skipping unreadable row in {}: {}", file_name, e);
                    total_rows += 1;
                    rows_skipped += 1;
                    continue;
                }
            };

            total_rows += 1;
            let row_number = raw.row_number;

            let (mut corrected, mut structural) = reconcile_width(&raw.cells, row_number, &schema);
            let mut violations = validator.detect_violations(&corrected);

            // A flagged overflow with exactly one type violation is the
            // shape the shift heuristic can repair.
            if structural.iter().any(|m| m.kind.is_flag()) && violations.len() == 1 {
                if let Some((realigned, modification)) =
                    try_shift_realign(&corrected, row_number, &validator)
                {
                    debug!("Row {} realigned in {}", row_number, file_name);
                    corrected = realigned;
                    structural.retain(|m| !m.kind.is_flag());
                    structural.push(modification);
                    violations = Vec::new();
                }
            }

            // Realignment clears the flags it repairs, so this is the
            // final disposition of the row.
            let flagged = structural.iter().any(|m| m.kind.is_flag());

            let pk_modification = validator.check_primary_key(&corrected, row_number);
            if pk_modification.is_some() {
                empty_primary_keys += 1;
            }

            let value_mods = validator.clean_row(&mut corrected, row_number);

            // Cells past the schema width exist only on flagged rows;
            // strip pipes so the recorded row (and the sink line, when
            // flagged emission is enabled) stays unambiguous.
            for cell in corrected.iter_mut().skip(schema.width()) {
                let stripped_cell = strip_pipes(cell);
                if stripped_cell != *cell {
                    *cell = stripped_cell;
                }
            }

            self.collect_bad_row(
                &mut bad_rows,
                &raw.cells,
                &corrected,
                row_number,
                &structural,
                &violations,
                pk_modification.as_ref(),
            );

            ledger.record_all(structural);
            ledger.record_all(value_mods);
            if let Some(modification) = pk_modification {
                ledger.record(modification);
            }

            if flagged && !self.config.emit_flagged_rows {
                debug!("Withholding flagged row {} of {}", row_number, file_name);
                rows_withheld += 1;
                continue;
            }

            match write_line(sink, &corrected) {
                Ok(()) => rows_emitted += 1,
                Err(e) => {
                    warn!("Sink refused row {} of {}: {}", row_number, file_name, e);
                    rows_skipped += 1;
                }
            }
        }

        let bad_rows_artifact = if self.config.export_bad_rows && !bad_rows.is_empty() {
            Some(self.export_bad_rows(source, &bad_rows)?)
        } else {
            None
        };

        if !self.config.keep_stripped_artifact {
            if let Err(e) = null_strip::remove_stripped(source) {
                warn!("Could not remove stripped artifact for {}: {}", file_name, e);
            }
        }

        let report = QualityReport::build(
            total_rows,
            rows_emitted,
            rows_skipped,
            empty_primary_keys,
            &ledger,
            &bad_rows,
        );
        info!("{}", report.summary());

        let bad_row_count = bad_rows.len();
        let bad_row_sample: Vec<BadRowEntry> = bad_rows
            .into_iter()
            .take(self.config.bad_row_sample_size)
            .collect();

        Ok(ValidationOutcome {
            file_name,
            total_rows,
            rows_emitted,
            rows_skipped,
            rows_withheld,
            empty_primary_keys,
            bad_row_count,
            bad_row_sample,
            bad_rows_path: bad_rows_artifact,
            report,
            duration: started.elapsed(),
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn collect_bad_row(
        &self,
        bad_rows: &mut Vec<BadRowEntry>,
        raw_cells: &[String],
        corrected: &[String],
        row_number: u64,
        structural: &[Modification],
        violations: &[TypeViolation],
        pk_modification: Option<&Modification>,
    ) {
        if structural.is_empty() && violations.is_empty() && pk_modification.is_none() {
            return;
        }

        let mut modifications = structural.to_vec();
        if let Some(modification) = pk_modification {
            modifications.push(modification.clone());
        }

        bad_rows.push(BadRowEntry {
            row_number,
            original_row: raw_cells.to_vec(),
            corrected_row: corrected.to_vec(),
            bad_values: violations.to_vec(),
            modifications,
            has_empty_pk: pk_modification.is_some(),
        });
    }

    /// Write the raw flagged rows to a sibling artifact for inspection
    fn export_bad_rows(&self, source: &Path, bad_rows: &[BadRowEntry]) -> Result<PathBuf> {
        let path = bad_rows_path(source);
        let file = File::create(&path)
            .map_err(|e| Error::io(format!("failed to create {}", path.display()), e))?;
        let mut writer = BufWriter::new(file);

        let delimiter = INPUT_DELIMITER as char;
        for entry in bad_rows {
            let mut line = String::new();
            for (index, cell) in entry.original_row.iter().enumerate() {
                if index > 0 {
                    line.push(delimiter);
                }
                line.push_str(cell);
            }
            line.push('\n');
            writer
                .write_all(line.as_bytes())
                .map_err(|e| Error::io(format!("failed to write {}", path.display()), e))?;
        }
        writer
            .flush()
            .map_err(|e| Error::io(format!("failed to flush {}", path.display()), e))?;

        info!("Exported {} bad rows to {}", bad_rows.len(), path.display());
        Ok(path)
    }
}

fn write_line<W: Write>(sink: &mut W, cells: &[String]) -> std::io::Result<()> {
    let mut line = String::with_capacity(cells.iter().map(|c| c.len() + 1).sum());
    for (index, cell) in cells.iter().enumerate() {
        if index > 0 {
            line.push(OUTPUT_DELIMITER);
        }
        line.push_str(cell);
    }
    line.push('\n');
    sink.write_all(line.as_bytes())
}
