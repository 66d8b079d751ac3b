//! Tests for the append-only ledger

use super::make_mod;
use crate::app::models::ModificationKind;
use crate::app::services::ledger::ModificationLedger;

#[test]
fn test_new_ledger_is_empty() {
    let ledger = ModificationLedger::new();
    assert!(ledger.is_empty());
    assert_eq!(ledger.len(), 0);
    assert!(ledger.counts_by_kind().is_empty());
}

#[test]
fn test_record_preserves_insertion_order() {
    let mut ledger = ModificationLedger::new();
    ledger.record(make_mod(1, ModificationKind::Pad));
    ledger.record_all(vec![
        make_mod(2, ModificationKind::ConvertToNull),
        make_mod(2, ModificationKind::ConvertToNull),
    ]);
    ledger.record(make_mod(5, ModificationKind::Truncate));

    let rows: Vec<u64> = ledger.entries().iter().map(|m| m.row_number).collect();
    assert_eq!(rows, vec![1, 2, 2, 5]);
    assert_eq!(ledger.len(), 4);
}

#[test]
fn test_counts_by_kind() {
    let mut ledger = ModificationLedger::new();
    ledger.record(make_mod(1, ModificationKind::Pad));
    ledger.record(make_mod(2, ModificationKind::Pad));
    ledger.record(make_mod(3, ModificationKind::ConvertToNull));

    let counts = ledger.counts_by_kind();
    assert_eq!(counts[&ModificationKind::Pad], 2);
    assert_eq!(counts[&ModificationKind::ConvertToNull], 1);
    assert_eq!(ledger.count_of(ModificationKind::Pad), 2);
    assert_eq!(ledger.count_of(ModificationKind::Realign), 0);
}
