//! Width decision policy for raw records

use tracing::debug;

use crate::app::models::{FileSchema, Modification, ModificationKind};
use crate::app::services::value_validator::is_null_like;

/// Reconcile a raw record against the declared width.
///
/// Returns the candidate record and the structural modifications applied.
/// Short rows are right-padded; overflowed rows are truncated only when the
/// file policy allows it and every trailing extra cell is actually
/// null-like. Overflow carrying real data is flagged and kept at full
/// width so no data is silently discarded.
pub fn reconcile_width(
    cells: &[String],
    row_number: u64,
    schema: &FileSchema,
) -> (Vec<String>, Vec<Modification>) {
    let width = schema.width();
    let len = cells.len();
    let mut corrected = cells.to_vec();
    let mut modifications = Vec::new();

    if len == width {
        return (corrected, modifications);
    }

    if len < width {
        let missing = width - len;
        corrected.resize(width, String::new());
        modifications.push(Modification::new(
            row_number,
            ModificationKind::Pad,
            None,
            format!("Length {len}"),
            format!("Length {width}"),
            format!("padded {missing} missing columns with empty values"),
        ));
        return (corrected, modifications);
    }

    // len > width
    let policy = &schema.policy;
    if policy.auto_realign {
        let expected_extra = policy.expected_extra_columns;
        if len == width + expected_extra {
            let trailing = &cells[width..];
            if trailing.iter().all(|cell| is_null_like(cell)) {
                corrected.truncate(width);
                modifications.push(Modification::new(
                    row_number,
                    ModificationKind::Truncate,
                    None,
                    format!("Length {len}"),
                    format!("Length {width}"),
                    format!("auto-truncated {expected_extra} empty trailing columns"),
                ));
            } else {
                debug!("Row {} overflow carries data, flagging", row_number);
                modifications.push(Modification::new(
                    row_number,
                    ModificationKind::FlagLongRow,
                    None,
                    format!("Length {len}"),
                    format!("Length {len}"),
                    format!("row has {} extra columns with data", len - width),
                ));
            }
        } else {
            modifications.push(Modification::new(
                row_number,
                ModificationKind::FlagUnexpectedLength,
                None,
                format!("Length {len}"),
                format!("Length {len}"),
                format!("unexpected row length: expected {width} + {expected_extra}, got {len}"),
            ));
        }
    } else {
        modifications.push(Modification::new(
            row_number,
            ModificationKind::FlagLongRow,
            None,
            format!("Length {len}"),
            format!("Length {len}"),
            format!("row too long: expected {width}, got {len}"),
        ));
    }

    (corrected, modifications)
}
