//! Schema catalog for extract files
//!
//! The catalog holds, per source file identity, the ordered column list with
//! declared type tags, the destination table name, and the file-specific
//! exception policy. Schemas are built once per file from externally supplied
//! JSON resources and are immutable for the duration of a run.
//!
//! Resources live in a schema directory:
//! - `tables.json` - file name -> destination table name
//! - `table-dtypes/<file stem>.json` - column name -> declared type tag
//! - `lookup/<resource>.json` - optional code tables (code -> description)

pub mod loader;

#[cfg(test)]
pub mod tests;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::app::models::{ColumnSchema, FileSchema, TypeTag};
use crate::config::PolicyCatalog;

/// Catalog of schema resources shared across a validation run
#[derive(Debug, Clone)]
pub struct SchemaCatalog {
    /// Root directory of the JSON schema resources
    schema_dir: PathBuf,
    /// File name -> destination table name
    table_map: HashMap<String, String>,
    /// Exception policies keyed by file name
    policies: PolicyCatalog,
    /// Loaded lookup code tables keyed by resource name
    lookup_tables: HashMap<String, HashSet<String>>,
}

impl SchemaCatalog {
    /// Create an empty catalog rooted at a schema directory
    pub fn new(schema_dir: PathBuf, policies: PolicyCatalog) -> Self {
        Self {
            schema_dir,
            table_map: HashMap::new(),
            policies,
            lookup_tables: HashMap::new(),
        }
    }

    /// Root directory of the schema resources
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Destination table name for an extract file, if mapped
    pub fn table_name(&self, file_name: &str) -> Option<&str> {
        self.table_map.get(file_name).map(|s| s.as_str())
    }

    /// Whether a file name appears in the table map
    pub fn is_known_file(&self, file_name: &str) -> bool {
        self.table_map.contains_key(file_name)
    }

    /// Number of mapped extract files
    pub fn table_count(&self) -> usize {
        self.table_map.len()
    }

    /// Codes of a loaded lookup table, if available
    pub fn lookup_codes(&self, resource: &str) -> Option<&HashSet<String>> {
        self.lookup_tables.get(resource)
    }

    /// Register a lookup code table directly (used by tests and callers that
    /// manage their own reference data)
    pub fn insert_lookup_table(&mut self, resource: impl Into<String>, codes: HashSet<String>) {
        self.lookup_tables.insert(resource.into(), codes);
    }

    /// Build the immutable schema for one extract file from its header.
    ///
    /// A missing dtype mapping is not fatal: the schema degrades to
    /// structural-only mode where every column is free text.
    pub fn schema_for(&self, csv_path: &Path, header: &[String]) -> FileSchema {
        let file_name = csv_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let dtypes = self.load_dtypes(&file_name);
        if dtypes.is_none() {
            warn!(
                "No dtype mapping for {}; running in structural-only mode",
                file_name
            );
        }

        let columns = header
            .iter()
            .enumerate()
            .map(|(ordinal, name)| ColumnSchema {
                name: name.clone(),
                type_tag: dtypes
                    .as_ref()
                    .and_then(|d| d.get(name))
                    .map(|tag| TypeTag::parse(tag))
                    .unwrap_or(TypeTag::Text),
                ordinal,
            })
            .collect();

        FileSchema {
            table_name: self.table_name(&file_name).map(|s| s.to_string()),
            columns,
            has_dtypes: dtypes.is_some(),
            policy: self.policies.policy_for(&file_name),
            file_name,
        }
    }
}
