//! Tests for the modification ledger and quality reporter

pub mod ledger_tests;

use crate::app::models::{BadRowEntry, Modification, ModificationKind, TypeViolation};

pub fn make_mod(row: u64, kind: ModificationKind) -> Modification {
    Modification::new(row, kind, None, "old", "new", "test entry")
}

pub fn bad_row(
    row: u64,
    modifications: Vec<Modification>,
    bad_values: Vec<TypeViolation>,
) -> BadRowEntry {
    BadRowEntry {
        row_number: row,
        original_row: vec!["1".into(), "x".into()],
        corrected_row: vec!["1".into(), "x".into()],
        bad_values,
        modifications,
        has_empty_pk: false,
    }
}

pub fn violation(column: &str) -> TypeViolation {
    TypeViolation {
        column: column.to_string(),
        value: "bad".to_string(),
        reason: "invalid integer format".to_string(),
    }
}
