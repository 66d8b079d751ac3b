//! Value validation and normalization for reconciled records
//!
//! Given a width-correct record, this module checks every cell against its
//! column's declared type tag, converting invalid values to the null
//! sentinel and recording why. It also provides the detection-only pass
//! used for bad-row bookkeeping and the realignment heuristic.
//!
//! The module is organized into logical components:
//! - [`null_like`] - The fixed null-like recognition rule
//! - [`field_parsers`] - Per-type normalization helpers
//! - [`validator`] - The per-file `ValueValidator` applying schema and policy

pub mod field_parsers;
pub mod null_like;
pub mod validator;

#[cfg(test)]
pub mod tests;

pub use null_like::{is_null_like, scrub};
pub use validator::ValueValidator;
