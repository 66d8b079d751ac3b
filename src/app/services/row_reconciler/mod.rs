//! Row width reconciliation for raw records
//!
//! Given a raw record and the declared schema width, this module decides
//! pad / truncate / realign / reject-as-flagged, producing a candidate
//! record and the structural modifications applied. Flagged rows are never
//! discarded here; the caller surfaces them as bad-row entries.
//!
//! The module is organized into logical components:
//! - [`reconciler`] - The width decision policy (pad, truncate, flag)
//! - [`realign`] - The bounded single-column-shift heuristic

pub mod realign;
pub mod reconciler;

#[cfg(test)]
pub mod tests;

pub use realign::try_shift_realign;
pub use reconciler::reconcile_width;
