//! Per-file value validator
//!
//! Applies the declared type tags and the file exception policy to each
//! cell of a reconciled record. Regex patterns are compiled once per file;
//! lookup code tables are bound only when already loaded, keeping lookup
//! checks detection-only.

use std::collections::{HashMap, HashSet};
use regex::Regex;
use tracing::warn;

use super::field_parsers::{normalize_integer, normalize_time, normalize_timestamp, strip_pipes};
use super::null_like::{is_null_like, scrub};
use crate::app::models::{FileSchema, Modification, ModificationKind, TypeTag, TypeViolation};
use crate::app::services::schema_catalog::SchemaCatalog;
use crate::constants::NULL_SENTINEL;

/// Value validator for one file schema
#[derive(Debug)]
pub struct ValueValidator<'a> {
    schema: &'a FileSchema,
    /// Compiled regex per column ordinal, for pattern-tagged columns
    patterns: HashMap<usize, Regex>,
    /// Loaded lookup code sets per column ordinal
    lookups: HashMap<usize, &'a HashSet<String>>,
}

impl<'a> ValueValidator<'a> {
    /// Create a validator for a schema, compiling its pattern tags.
    ///
    /// A pattern that fails to compile is dropped with a warning; the
    /// column then behaves as free text.
    pub fn new(schema: &'a FileSchema) -> Self {
        let mut patterns = HashMap::new();
        for column in &schema.columns {
            if let TypeTag::Pattern(pattern) = &column.type_tag {
                match Regex::new(pattern) {
                    Ok(regex) => {
                        patterns.insert(column.ordinal, regex);
                    }
                    Err(e) => warn!(
                        "Invalid pattern for column {} in {}: {}",
                        column.name, schema.file_name, e
                    ),
                }
            }
        }
        Self {
            schema,
            patterns,
            lookups: HashMap::new(),
        }
    }

    /// Bind the catalog's loaded lookup tables to lookup-tagged columns.
    ///
    /// Columns whose code table is not loaded stay unchecked.
    pub fn with_lookup_codes(mut self, catalog: &'a SchemaCatalog) -> Self {
        for column in &self.schema.columns {
            if let TypeTag::Lookup(resource) = &column.type_tag {
                if let Some(codes) = catalog.lookup_codes(resource) {
                    self.lookups.insert(column.ordinal, codes);
                }
            }
        }
        self
    }

    /// Clean a reconciled row in place, returning the repairs made.
    ///
    /// Only the first `width` cells are touched; every cell ends up either a
    /// literal value free of pipe characters or the null sentinel. Without a
    /// dtype mapping this degrades to delimiter stripping only.
    pub fn clean_row(&self, cells: &mut [String], row_number: u64) -> Vec<Modification> {
        let mut modifications = Vec::new();
        let width = self.schema.width().min(cells.len());

        for (ordinal, cell) in cells.iter_mut().enumerate().take(width) {
            let column = &self.schema.columns[ordinal];

            if !self.schema.has_dtypes || self.schema.policy.is_exempt(&column.name) {
                let stripped = strip_pipes(cell);
                if stripped != *cell {
                    *cell = stripped;
                }
                continue;
            }

            // A literal null sentinel is already in output form; scrubbing
            // would eat its backslash, so it must be recognized first.
            if cell.as_str() == NULL_SENTINEL {
                continue;
            }

            let original = cell.clone();
            let value = scrub(cell);

            if is_null_like(value) {
                if !self.schema.policy.high_null_tolerance {
                    modifications.push(Modification::new(
                        row_number,
                        ModificationKind::ConvertToNull,
                        Some(column.name.clone()),
                        original.clone(),
                        NULL_SENTINEL,
                        "converted null-like value",
                    ));
                }
                *cell = NULL_SENTINEL.to_string();
                continue;
            }

            let (normalized, failure_reason) = match &column.type_tag {
                TypeTag::Integer => (normalize_integer(value), Some("invalid integer format")),
                TypeTag::Timestamp => {
                    (normalize_timestamp(value), Some("invalid timestamp format"))
                }
                TypeTag::Time => (normalize_time(value), Some("invalid time format")),
                // Pattern and lookup violations are detection-only; the
                // value passes through like free text.
                TypeTag::Pattern(_) | TypeTag::Lookup(_) | TypeTag::Text => {
                    (Some(strip_pipes(value)), None)
                }
            };

            match normalized {
                Some(output) => *cell = output,
                None => {
                    modifications.push(Modification::new(
                        row_number,
                        ModificationKind::ConvertToNull,
                        Some(column.name.clone()),
                        original,
                        NULL_SENTINEL,
                        failure_reason.unwrap_or("invalid value"),
                    ));
                    *cell = NULL_SENTINEL.to_string();
                }
            }
        }

        modifications
    }

    /// Detection-only pass: report every type violation without repairing.
    ///
    /// Null-like values are acceptable everywhere and never reported here.
    /// Pattern and lookup violations appear only in this pass.
    pub fn detect_violations(&self, cells: &[String]) -> Vec<TypeViolation> {
        let mut violations = Vec::new();
        if !self.schema.has_dtypes {
            return violations;
        }

        let width = self.schema.width().min(cells.len());
        for (ordinal, cell) in cells.iter().enumerate().take(width) {
            let column = &self.schema.columns[ordinal];
            if self.schema.policy.is_exempt(&column.name) {
                continue;
            }

            if cell.as_str() == NULL_SENTINEL {
                continue;
            }
            let value = scrub(cell);
            if is_null_like(value) {
                continue;
            }

            let reason = match &column.type_tag {
                TypeTag::Integer => {
                    normalize_integer(value).is_none().then(|| "invalid integer format".to_string())
                }
                TypeTag::Timestamp => normalize_timestamp(value)
                    .is_none()
                    .then(|| "invalid timestamp format".to_string()),
                TypeTag::Time => {
                    normalize_time(value).is_none().then(|| "invalid time format".to_string())
                }
                TypeTag::Pattern(pattern) => match self.patterns.get(&ordinal) {
                    Some(regex) if !regex.is_match(value) => {
                        Some(format!("does not match pattern {pattern}"))
                    }
                    _ => None,
                },
                TypeTag::Lookup(resource) => match self.lookups.get(&ordinal) {
                    Some(codes) if !codes.contains(value) => {
                        Some(format!("not in lookup table {resource}"))
                    }
                    _ => None,
                },
                TypeTag::Text => None,
            };

            if let Some(reason) = reason {
                violations.push(TypeViolation {
                    column: column.name.clone(),
                    value: value.to_string(),
                    reason,
                });
            }
        }

        violations
    }

    /// Primary-key guard: the first cell is always checked with the
    /// null-like test, independent of its declared type. Informational
    /// only; the row is still emitted.
    pub fn check_primary_key(&self, cells: &[String], row_number: u64) -> Option<Modification> {
        let pk_column = self.schema.primary_key_column().map(|s| s.to_string());

        let Some(value) = cells.first() else {
            return Some(Modification::new(
                row_number,
                ModificationKind::EmptyPrimaryKey,
                pk_column,
                "[EMPTY ROW]",
                "INVALID",
                "row is completely empty",
            ));
        };

        if is_null_like(value) || value == NULL_SENTINEL {
            return Some(Modification::new(
                row_number,
                ModificationKind::EmptyPrimaryKey,
                pk_column,
                value.clone(),
                "INVALID",
                "primary key cannot be empty or null-like",
            ));
        }

        None
    }

    /// Schema this validator was built for
    pub fn schema(&self) -> &FileSchema {
        self.schema
    }
}
