//! Modification ledger and quality reporting
//!
//! The ledger is the ordered, append-only record of every repair or flag
//! performed during one validation run. It is owned by exactly one run and
//! discarded with it; nothing here is process-wide. The reporter aggregates
//! the ledger and the bad-row collection into end-of-run summary counts and
//! recommendations.

pub mod ledger;
pub mod report;

#[cfg(test)]
pub mod tests;

pub use ledger::ModificationLedger;
pub use report::QualityReport;
