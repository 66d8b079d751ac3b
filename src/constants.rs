//! Application constants for the extract validator
//!
//! This module contains the fixed vocabulary of the legacy export format:
//! delimiters, the bulk-load null sentinel, placeholder tokens, and the
//! type tags used in the dtype mapping files.

// =============================================================================
// Input / Output Serialization
// =============================================================================

/// Field delimiter used by the legacy tab-delimited extracts
pub const INPUT_DELIMITER: u8 = b'\t';

/// Escape character active in the input (no quote character is used)
pub const INPUT_ESCAPE: u8 = b'\\';

/// Field delimiter used in the normalized output handed to the bulk loader
pub const OUTPUT_DELIMITER: char = '|';

/// Null sentinel in the serialized output (PostgreSQL COPY convention)
pub const NULL_SENTINEL: &str = r"\N";

/// Suffix inserted before the extension of the NUL-stripped sibling artifact
pub const NO_NUL_SUFFIX: &str = "_no_nul";

/// Suffix inserted before the extension of the exported bad-row artifact
pub const BAD_ROWS_SUFFIX: &str = "_bad_rows";

// =============================================================================
// Null-Like Recognition
// =============================================================================

/// Fixed placeholder tokens that convey no real data.
///
/// `b6` and `A.2.a` are redaction artifacts left behind by the export
/// process; `N/A` is the usual free-text placeholder.
pub const NULL_LIKE_TOKENS: &[&str] = &["", "b6", "N/A", "A.2.a"];

/// Characters that, repeated across an entire value, mark it as filler
pub const FILLER_CHARS: &[char] = &['?', '0'];

/// Letter substituted for the digit zero by the upstream OCR step
pub const ZERO_LOOKALIKE: char = 'O';

// =============================================================================
// Type Tags
// =============================================================================

/// Declared column type tags as they appear in the dtype mapping files
pub mod type_tags {
    pub const INTEGER: &str = "integer";
    pub const TIMESTAMP: &str = "timestamp without time zone";
    pub const TIME: &str = "time without time zone";
    pub const TEXT: &str = "text";

    /// Prefix marking a regex-pattern type tag
    pub const PATTERN_ANCHOR: char = '^';

    /// Extension marking a lookup-table-reference type tag
    pub const LOOKUP_EXTENSION: &str = ".json";
}

// =============================================================================
// Schema Resources
// =============================================================================

/// Table map resource (file name -> table name)
pub const TABLES_RESOURCE: &str = "tables.json";

/// Directory holding per-file dtype mappings
pub const DTYPES_DIR: &str = "table-dtypes";

/// Directory holding lookup code tables
pub const LOOKUP_DIR: &str = "lookup";

// =============================================================================
// Processing Defaults
// =============================================================================

/// Default number of files validated concurrently by `process-all`
pub const DEFAULT_MAX_CONCURRENT_FILES: usize = 4;

/// Default size of the bad-row sample surfaced for manual inspection
pub const DEFAULT_BAD_ROW_SAMPLE_SIZE: usize = 100;

/// Chrono formats accepted for `timestamp without time zone`
pub const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Chrono format accepted for date-only timestamp values
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Chrono formats accepted for `time without time zone` after re-delimiting
pub const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];
