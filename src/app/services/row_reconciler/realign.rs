//! Single-column-shift realignment heuristic
//!
//! Some overflowed rows are misaligned by exactly one spurious cell: a
//! null-like filler inserted somewhere before the column whose value then
//! fails its type check. This heuristic finds and removes that cell with a
//! single backward scan. It is pure and bounded: each step tests removing
//! one cell from the original record, the first removal that yields a
//! width-correct row with zero type violations wins, and the primary-key
//! cell is never removed.

use tracing::debug;

use crate::app::models::{Modification, ModificationKind};
use crate::app::services::value_validator::{ValueValidator, is_null_like};

/// Attempt to realign an overflowed record by removing one null-like cell.
///
/// Applicable only when the detection pass flags exactly one type
/// violation. Returns the realigned record and its `realign` modification,
/// or `None` when the row must stay flagged.
pub fn try_shift_realign(
    cells: &[String],
    row_number: u64,
    validator: &ValueValidator,
) -> Option<(Vec<String>, Modification)> {
    // Removing a single cell can only fix rows one past the width
    let width = validator.schema().width();
    if cells.len() != width + 1 {
        return None;
    }

    let violations = validator.detect_violations(cells);
    if violations.len() != 1 {
        return None;
    }
    let flagged_ordinal = validator
        .schema()
        .columns
        .iter()
        .find(|c| c.name == violations[0].column)
        .map(|c| c.ordinal)?;

    // Backward scan from the flagged column; index 0 (primary key) is
    // never a removal candidate.
    for index in (1..=flagged_ordinal.min(cells.len() - 1)).rev() {
        if !is_null_like(&cells[index]) {
            continue;
        }
        let mut candidate: Vec<String> = cells.to_vec();
        candidate.remove(index);
        if validator.detect_violations(&candidate).is_empty() {
            debug!(
                "Row {} realigned by removing null-like cell at index {}",
                row_number, index
            );
            let modification = Modification::new(
                row_number,
                ModificationKind::Realign,
                validator.schema().column_name(index).map(|s| s.to_string()),
                format!("Length {}", cells.len()),
                format!("Length {width}"),
                format!("removed null-like cell at index {index} to restore alignment"),
            );
            return Some((candidate, modification));
        }
    }

    None
}
