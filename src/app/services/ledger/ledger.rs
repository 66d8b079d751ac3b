//! Append-only modification ledger for one validation run

use std::collections::BTreeMap;

use crate::app::models::{Modification, ModificationKind};

/// Ordered record of all repairs and flags made during one run.
///
/// Entries arrive in row-ordinal order because validation is a strictly
/// sequential single pass; the ledger only appends.
#[derive(Debug, Clone, Default)]
pub struct ModificationLedger {
    entries: Vec<Modification>,
}

impl ModificationLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one modification
    pub fn record(&mut self, modification: Modification) {
        self.entries.push(modification);
    }

    /// Append a batch of modifications for one row
    pub fn record_all(&mut self, modifications: impl IntoIterator<Item = Modification>) {
        self.entries.extend(modifications);
    }

    /// All entries in insertion order
    pub fn entries(&self) -> &[Modification] {
        &self.entries
    }

    /// Number of recorded modifications
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the run made no modifications at all
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count entries by kind, in a deterministic order
    pub fn counts_by_kind(&self) -> BTreeMap<ModificationKind, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Count entries of one kind
    pub fn count_of(&self, kind: ModificationKind) -> usize {
        self.entries.iter().filter(|m| m.kind == kind).count()
    }
}
