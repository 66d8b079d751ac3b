//! Per-file validation result record

use std::path::PathBuf;
use std::time::Duration;

use crate::app::models::BadRowEntry;
use crate::app::services::ledger::QualityReport;

/// Everything one validation run produced besides the sink output itself
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    /// Source file name (not the stripped sibling)
    pub file_name: String,
    /// Data rows read from the source
    pub total_rows: u64,
    /// Rows handed to the sink
    pub rows_emitted: u64,
    /// Rows lost to sink write failures or unreadable records
    pub rows_skipped: u64,
    /// Flagged rows withheld from the sink
    pub rows_withheld: u64,
    /// Rows whose primary key was empty or null-like
    pub empty_primary_keys: u64,
    /// Total bad rows observed during the run
    pub bad_row_count: usize,
    /// Deterministic sample of the first bad rows, bounded by configuration
    pub bad_row_sample: Vec<BadRowEntry>,
    /// Sibling artifact holding the flagged raw rows, when exported
    pub bad_rows_path: Option<PathBuf>,
    /// Aggregated quality report for the run
    pub report: QualityReport,
    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl ValidationOutcome {
    /// Total modifications recorded across all kinds
    pub fn modification_count(&self) -> usize {
        self.report.total_modifications()
    }

    /// Whether the run finished without a single repair or flag
    pub fn is_clean(&self) -> bool {
        !self.report.has_issues() && self.rows_skipped == 0 && self.rows_withheld == 0
    }

    /// One-line summary for logging
    pub fn summary(&self) -> String {
        format!(
            "{}: {} rows in {:.1}s | {}",
            self.file_name,
            self.total_rows,
            self.duration.as_secs_f64(),
            self.report.summary(),
        )
    }
}
