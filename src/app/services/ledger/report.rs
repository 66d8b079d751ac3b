//! End-of-run quality report aggregation

use std::collections::BTreeMap;
use serde::Serialize;

use super::ModificationLedger;
use crate::app::models::BadRowEntry;

/// Aggregated quality metrics for one validation run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QualityReport {
    /// Total data rows read from the source
    pub total_rows: u64,
    /// Rows handed to the sink
    pub rows_emitted: u64,
    /// Rows the sink refused (write failures)
    pub rows_skipped: u64,
    /// Rows whose primary key was empty or null-like
    pub empty_primary_keys: u64,
    /// Bad rows with structural modifications only
    pub structural_only_rows: usize,
    /// Bad rows with type violations only
    pub value_only_rows: usize,
    /// Bad rows with both structural and value issues
    pub mixed_issue_rows: usize,
    /// Rows left in a flagged state (must not be loaded as-is)
    pub rejected_rows: usize,
    /// Modification counts keyed by kind label, deterministic order
    pub modification_counts: BTreeMap<String, usize>,
    /// Textual recommendations; empty when the run was clean
    pub recommendations: Vec<String>,
}

impl QualityReport {
    /// Aggregate the ledger and bad-row collection into a report
    pub fn build(
        total_rows: u64,
        rows_emitted: u64,
        rows_skipped: u64,
        empty_primary_keys: u64,
        ledger: &ModificationLedger,
        bad_rows: &[BadRowEntry],
    ) -> Self {
        let mut structural_only_rows = 0;
        let mut value_only_rows = 0;
        let mut mixed_issue_rows = 0;
        let mut rejected_rows = 0;

        for entry in bad_rows {
            match (entry.has_structural_issues(), entry.has_value_issues()) {
                (true, true) => mixed_issue_rows += 1,
                (true, false) => structural_only_rows += 1,
                (false, true) => value_only_rows += 1,
                (false, false) => {}
            }
            if entry.is_rejected() {
                rejected_rows += 1;
            }
        }

        let modification_counts: BTreeMap<String, usize> = ledger
            .counts_by_kind()
            .into_iter()
            .map(|(kind, count)| (kind.label().to_string(), count))
            .collect();

        let mut recommendations = Vec::new();
        let structural_rows = structural_only_rows + mixed_issue_rows;
        let value_rows = value_only_rows + mixed_issue_rows;
        if structural_rows > 0 {
            recommendations.push(format!(
                "Review {structural_rows} rows with structural issues"
            ));
        }
        if value_rows > 0 {
            recommendations.push(format!(
                "Review {value_rows} rows with data quality issues"
            ));
        }
        if rejected_rows > 0 {
            recommendations.push(format!(
                "{rejected_rows} flagged rows were emitted at original width and should be excluded from load"
            ));
        }
        if empty_primary_keys > 0 {
            recommendations.push(format!(
                "{empty_primary_keys} rows have empty primary keys"
            ));
        }

        Self {
            total_rows,
            rows_emitted,
            rows_skipped,
            empty_primary_keys,
            structural_only_rows,
            value_only_rows,
            mixed_issue_rows,
            rejected_rows,
            modification_counts,
            recommendations,
        }
    }

    /// Whether any structural or value issue was recorded
    pub fn has_issues(&self) -> bool {
        !self.recommendations.is_empty()
    }

    /// Total modifications across all kinds
    pub fn total_modifications(&self) -> usize {
        self.modification_counts.values().sum()
    }

    /// One-line summary for logging
    pub fn summary(&self) -> String {
        format!(
            "Validation summary: {} rows -> {} emitted ({} skipped) | \
             {} modifications | structural-only: {} | value-only: {} | both: {} | \
             rejected: {} | empty PKs: {}",
            self.total_rows,
            self.rows_emitted,
            self.rows_skipped,
            self.total_modifications(),
            self.structural_only_rows,
            self.value_only_rows,
            self.mixed_issue_rows,
            self.rejected_rows,
            self.empty_primary_keys,
        )
    }
}
