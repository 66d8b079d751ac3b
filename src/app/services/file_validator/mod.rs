//! Per-file validation pipeline
//!
//! One validator run takes a raw tab-delimited extract through the full
//! repair pipeline and streams normalized pipe-delimited lines to a sink:
//!
//! 1. **Pre-pass** - NUL bytes stripped to a sibling copy, fully flushed
//!    before anything reads it
//! 2. **Stream** - lazy forward-only iteration over byte records with
//!    permissive decoding ([`stream`])
//! 3. **Reconcile** - width repair via pad / truncate / realign / flag
//! 4. **Validate** - per-cell type checks and null-sentinel conversion
//! 5. **Emit** - pipe-delimited line handed to the sink, row by row;
//!    rows that stay flagged are withheld from the sink by default
//!
//! Every repair lands in the run's ledger; flagged rows surface as
//! [`BadRowEntry`](crate::app::models::BadRowEntry) records and an optional
//! sibling export. The run result is a [`ValidationOutcome`].

pub mod result;
pub mod stream;
pub mod validator;

#[cfg(test)]
pub mod tests;

pub use result::ValidationOutcome;
pub use stream::{RawRecord, RecordStream};
pub use validator::{bad_rows_path, FileValidator};
