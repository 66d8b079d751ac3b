//! Core data models for extract validation
//!
//! These types flow through the whole pipeline: the declared schema for a
//! file, the per-row repair records appended to the ledger, and the
//! bookkeeping entries for rows that could not be cleanly reconciled.

use crate::config::ExceptionPolicy;
use crate::constants::type_tags;
use serde::{Deserialize, Serialize};

/// Declared type of a column, parsed from its dtype mapping tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeTag {
    /// Plain integer column (`integer`)
    Integer,
    /// `timestamp without time zone`
    Timestamp,
    /// `time without time zone`
    Time,
    /// Regex-constrained column; the tag string is the anchored pattern
    Pattern(String),
    /// Reference into an external code table; the tag names the resource
    Lookup(String),
    /// Free text (the default for unrecognized tags)
    Text,
}

impl TypeTag {
    /// Parse a raw dtype tag string into a typed tag.
    ///
    /// Tags beginning with `^` are regex patterns; tags ending in `.json`
    /// name a lookup code table. Everything unrecognized is free text.
    pub fn parse(tag: &str) -> Self {
        if tag == type_tags::INTEGER {
            TypeTag::Integer
        } else if tag == type_tags::TIMESTAMP {
            TypeTag::Timestamp
        } else if tag == type_tags::TIME {
            TypeTag::Time
        } else if tag.starts_with(type_tags::PATTERN_ANCHOR) {
            TypeTag::Pattern(tag.to_string())
        } else if tag.ends_with(type_tags::LOOKUP_EXTENSION) {
            TypeTag::Lookup(tag.to_string())
        } else {
            TypeTag::Text
        }
    }
}

/// One column of a file schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Column name, unique within the file
    pub name: String,
    /// Declared type tag
    pub type_tag: TypeTag,
    /// Zero-based ordinal position
    pub ordinal: usize,
}

/// Declared schema for one extract file
///
/// Loaded once per file and shared read-only across all rows of a run.
/// The column count defines the expected row width.
#[derive(Debug, Clone)]
pub struct FileSchema {
    /// Base file name this schema belongs to
    pub file_name: String,
    /// Destination table name from the table map, if known
    pub table_name: Option<String>,
    /// Ordered columns; empty `type_tag` information degrades to text
    pub columns: Vec<ColumnSchema>,
    /// Whether a dtype mapping was found for this file. When false the
    /// validator runs in structural-only mode.
    pub has_dtypes: bool,
    /// File-specific exception policy
    pub policy: ExceptionPolicy,
}

impl FileSchema {
    /// Expected row width
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Name of the primary key column (first column), if any
    pub fn primary_key_column(&self) -> Option<&str> {
        self.columns.first().map(|c| c.name.as_str())
    }

    /// Column name at an ordinal, if within the declared width
    pub fn column_name(&self, ordinal: usize) -> Option<&str> {
        self.columns.get(ordinal).map(|c| c.name.as_str())
    }
}

/// Kind of repair or flag recorded during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModificationKind {
    /// Short row right-padded with empty cells
    Pad,
    /// Empty trailing overflow columns removed under the auto-realign rule
    Truncate,
    /// Single null-like cell removed to restore column alignment
    Realign,
    /// Cell value replaced with the null sentinel
    ConvertToNull,
    /// Overflowed row with real data in the extra columns
    FlagLongRow,
    /// Overflowed row whose width does not match the expected-extra policy
    FlagUnexpectedLength,
    /// Primary key cell is empty or null-like
    EmptyPrimaryKey,
}

impl ModificationKind {
    /// Stable snake_case label used in reports and logs
    pub fn label(&self) -> &'static str {
        match self {
            ModificationKind::Pad => "pad",
            ModificationKind::Truncate => "truncate",
            ModificationKind::Realign => "realign",
            ModificationKind::ConvertToNull => "convert_to_null",
            ModificationKind::FlagLongRow => "flag_long_row",
            ModificationKind::FlagUnexpectedLength => "flag_unexpected_length",
            ModificationKind::EmptyPrimaryKey => "empty_primary_key",
        }
    }

    /// Whether this kind changes row width or column alignment
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ModificationKind::Pad
                | ModificationKind::Truncate
                | ModificationKind::Realign
                | ModificationKind::FlagLongRow
                | ModificationKind::FlagUnexpectedLength
        )
    }

    /// Whether this kind leaves the row flagged rather than repaired
    pub fn is_flag(&self) -> bool {
        matches!(
            self,
            ModificationKind::FlagLongRow | ModificationKind::FlagUnexpectedLength
        )
    }
}

/// One repair or flag performed during a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modification {
    /// One-based ordinal of the affected data row
    pub row_number: u64,
    /// What happened
    pub kind: ModificationKind,
    /// Affected column name, when the repair targets a single cell
    pub column: Option<String>,
    /// Value (or width description) before the repair
    pub original_value: String,
    /// Value (or width description) after the repair
    pub new_value: String,
    /// Human-readable reason
    pub reason: String,
}

impl Modification {
    /// Create a modification record
    pub fn new(
        row_number: u64,
        kind: ModificationKind,
        column: Option<String>,
        original_value: impl Into<String>,
        new_value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            row_number,
            kind,
            column,
            original_value: original_value.into(),
            new_value: new_value.into(),
            reason: reason.into(),
        }
    }
}

/// A recorded type violation: (column name, offending value, reason)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeViolation {
    pub column: String,
    pub value: String,
    pub reason: String,
}

/// Bookkeeping for a row that needed repair or could not be reconciled
#[derive(Debug, Clone)]
pub struct BadRowEntry {
    /// One-based ordinal of the data row
    pub row_number: u64,
    /// Cells exactly as physically read
    pub original_row: Vec<String>,
    /// Best-effort normalized cells (full width where possible)
    pub corrected_row: Vec<String>,
    /// Type violations detected in the corrected row
    pub bad_values: Vec<TypeViolation>,
    /// Modifications applied to or recorded against this row
    pub modifications: Vec<Modification>,
    /// Whether the primary key cell was empty or null-like
    pub has_empty_pk: bool,
}

impl BadRowEntry {
    /// Whether this row ended in a flagged state (must not be loaded as-is)
    pub fn is_rejected(&self) -> bool {
        self.modifications.iter().any(|m| m.kind.is_flag())
    }

    /// Whether this row carries structural modifications
    pub fn has_structural_issues(&self) -> bool {
        self.modifications.iter().any(|m| m.kind.is_structural())
    }

    /// Whether this row carries type violations
    pub fn has_value_issues(&self) -> bool {
        !self.bad_values.is_empty()
    }
}
