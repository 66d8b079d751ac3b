//! Tests for the single-column-shift realignment heuristic

use super::cells;
use crate::app::models::{ColumnSchema, FileSchema, ModificationKind, TypeTag};
use crate::app::services::row_reconciler::try_shift_realign;
use crate::app::services::value_validator::ValueValidator;
use crate::config::ExceptionPolicy;

/// id integer | amount integer | filed_on timestamp
fn typed_schema() -> FileSchema {
    let tags = [
        ("IDNCASE", TypeTag::Integer),
        ("AMOUNT", TypeTag::Integer),
        ("FILED_ON", TypeTag::Timestamp),
    ];
    FileSchema {
        file_name: "tbl_Test.csv".to_string(),
        table_name: None,
        columns: tags
            .into_iter()
            .enumerate()
            .map(|(ordinal, (name, type_tag))| ColumnSchema {
                name: name.to_string(),
                type_tag,
                ordinal,
            })
            .collect(),
        has_dtypes: true,
        policy: ExceptionPolicy::default(),
    }
}

#[test]
fn test_removes_null_like_cell_to_restore_alignment() {
    let schema = typed_schema();
    let validator = ValueValidator::new(&schema);
    // A spurious "?" shifted AMOUNT into FILED_ON's position
    let row = cells(&["17", "?", "42", "2020-01-01"]);

    let (realigned, modification) = try_shift_realign(&row, 8, &validator).unwrap();

    assert_eq!(realigned, cells(&["17", "42", "2020-01-01"]));
    assert_eq!(modification.kind, ModificationKind::Realign);
    assert_eq!(modification.row_number, 8);
    assert_eq!(modification.column.as_deref(), Some("AMOUNT"));
}

#[test]
fn test_requires_exactly_one_violation() {
    let schema = typed_schema();
    let validator = ValueValidator::new(&schema);

    // Zero violations: nothing to fix, trailing cell is the reconciler's
    // problem, not the shift heuristic's
    let row = cells(&["17", "42", "2020-01-01", ""]);
    assert!(validator.detect_violations(&row).is_empty());
    assert!(try_shift_realign(&row, 1, &validator).is_none());

    // Two violations: ambiguous, leave flagged
    let row = cells(&["17", "x", "y", "2020-01-01"]);
    assert!(try_shift_realign(&row, 1, &validator).is_none());
}

#[test]
fn test_only_single_cell_overflow_is_eligible() {
    let schema = typed_schema();
    let validator = ValueValidator::new(&schema);

    // Two cells over width: one removal cannot restore the width
    let row = cells(&["17", "?", "?", "42", "2020-01-01"]);
    assert!(try_shift_realign(&row, 1, &validator).is_none());

    // Already at width: not an overflow problem
    let row = cells(&["17", "x", "2020-01-01"]);
    assert!(try_shift_realign(&row, 1, &validator).is_none());
}

#[test]
fn test_never_removes_primary_key_cell() {
    let schema = typed_schema();
    let validator = ValueValidator::new(&schema);
    // Only the primary-key cell is null-like; removing it is never allowed
    let row = cells(&["0000", "17", "42", "2020-01-01"]);

    assert_eq!(validator.detect_violations(&row).len(), 1);
    assert!(try_shift_realign(&row, 1, &validator).is_none());
}

#[test]
fn test_non_null_like_cells_are_never_removed() {
    let schema = typed_schema();
    let validator = ValueValidator::new(&schema);
    // Every candidate cell carries real data; the row must stay flagged
    let row = cells(&["17", "2020", "42", "2020-01-01"]);

    assert_eq!(validator.detect_violations(&row).len(), 1);
    assert!(try_shift_realign(&row, 1, &validator).is_none());
}

#[test]
fn test_heuristic_is_pure_and_deterministic() {
    let schema = typed_schema();
    let validator = ValueValidator::new(&schema);
    let row = cells(&["17", "?", "42", "2020-01-01"]);

    let first = try_shift_realign(&row, 8, &validator).unwrap();
    let second = try_shift_realign(&row, 8, &validator).unwrap();
    assert_eq!(first, second);
    // Input untouched
    assert_eq!(row[1], "?");
}
