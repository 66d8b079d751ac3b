//! Tests for the width decision policy

use super::{cells, plain_schema, realign_policy, schema_with_policy};
use crate::app::models::ModificationKind;
use crate::app::services::row_reconciler::reconcile_width;

#[test]
fn test_correct_width_passes_through() {
    let schema = plain_schema(3);
    let row = cells(&["a", "b", "c"]);

    let (corrected, mods) = reconcile_width(&row, 1, &schema);

    assert_eq!(corrected, row);
    assert!(mods.is_empty());
}

#[test]
fn test_short_row_is_padded_to_width() {
    let schema = plain_schema(5);
    let row = cells(&["a", "b", "c"]);

    let (corrected, mods) = reconcile_width(&row, 9, &schema);

    assert_eq!(corrected.len(), 5);
    assert_eq!(&corrected[..3], &row[..]);
    assert_eq!(corrected[3], "");
    assert_eq!(corrected[4], "");
    assert_eq!(mods.len(), 1);
    assert_eq!(mods[0].kind, ModificationKind::Pad);
    assert_eq!(mods[0].row_number, 9);
    assert!(mods[0].reason.contains("padded 2 missing columns"));
}

#[test]
fn test_expected_empty_overflow_is_truncated() {
    let schema = schema_with_policy(5, realign_policy(1));
    let row = cells(&["a", "b", "c", "d", "e", ""]);

    let (corrected, mods) = reconcile_width(&row, 2, &schema);

    assert_eq!(corrected, cells(&["a", "b", "c", "d", "e"]));
    assert_eq!(mods.len(), 1);
    assert_eq!(mods[0].kind, ModificationKind::Truncate);
    assert!(mods[0].reason.contains("auto-truncated 1 empty trailing columns"));
}

#[test]
fn test_overflow_with_data_is_flagged_not_truncated() {
    let schema = schema_with_policy(5, realign_policy(1));
    let row = cells(&["a", "b", "c", "d", "e", "real data"]);

    let (corrected, mods) = reconcile_width(&row, 2, &schema);

    // Full-width record kept; nothing discarded
    assert_eq!(corrected, row);
    assert_eq!(mods.len(), 1);
    assert_eq!(mods[0].kind, ModificationKind::FlagLongRow);
    assert!(mods[0].reason.contains("1 extra columns with data"));
}

#[test]
fn test_null_like_overflow_cells_count_as_empty() {
    let schema = schema_with_policy(4, realign_policy(2));
    let row = cells(&["a", "b", "c", "d", "????", "N/A"]);

    let (corrected, mods) = reconcile_width(&row, 3, &schema);

    assert_eq!(corrected.len(), 4);
    assert_eq!(mods[0].kind, ModificationKind::Truncate);
}

#[test]
fn test_wrong_overflow_width_is_flagged_unexpected() {
    let schema = schema_with_policy(5, realign_policy(1));
    let row = cells(&["a", "b", "c", "d", "e", "", ""]);

    let (corrected, mods) = reconcile_width(&row, 4, &schema);

    assert_eq!(corrected, row);
    assert_eq!(mods.len(), 1);
    assert_eq!(mods[0].kind, ModificationKind::FlagUnexpectedLength);
    assert!(mods[0].reason.contains("expected 5 + 1, got 7"));
}

#[test]
fn test_overflow_without_realign_rule_is_flagged_long() {
    let schema = plain_schema(3);
    let row = cells(&["a", "b", "c", ""]);

    let (corrected, mods) = reconcile_width(&row, 5, &schema);

    assert_eq!(corrected, row);
    assert_eq!(mods.len(), 1);
    assert_eq!(mods[0].kind, ModificationKind::FlagLongRow);
    assert!(mods[0].reason.contains("expected 3, got 4"));
}
