//! Schema resource loading from the JSON schema directory

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::SchemaCatalog;
use crate::config::PolicyCatalog;
use crate::constants::{DTYPES_DIR, LOOKUP_DIR, TABLES_RESOURCE};
use crate::{Error, Result};

impl SchemaCatalog {
    /// Load a catalog from a schema directory.
    ///
    /// A missing `tables.json` leaves the table map empty (every file is
    /// then treated as unmapped) rather than failing the run; a present but
    /// malformed one is a hard error.
    pub fn load(schema_dir: &Path, policies: PolicyCatalog) -> Result<Self> {
        let mut catalog = Self::new(schema_dir.to_path_buf(), policies);

        let tables_path = schema_dir.join(TABLES_RESOURCE);
        match std::fs::read_to_string(&tables_path) {
            Ok(content) => {
                let table_map: HashMap<String, String> =
                    serde_json::from_str(&content).map_err(|e| {
                        Error::schema_catalog(format!(
                            "Invalid table map {}: {}",
                            tables_path.display(),
                            e
                        ))
                    })?;
                info!(
                    "Loaded table map with {} entries from {}",
                    table_map.len(),
                    tables_path.display()
                );
                catalog.table_map = table_map;
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("No table map at {}", tables_path.display());
            }
            Err(e) => {
                return Err(Error::io(
                    format!("Failed to read table map {}", tables_path.display()),
                    e,
                ));
            }
        }

        Ok(catalog)
    }

    /// Load the dtype mapping for one extract file.
    ///
    /// Returns `None` when the per-file resource is absent; the validator
    /// then degrades to structural-only mode.
    pub(super) fn load_dtypes(&self, file_name: &str) -> Option<HashMap<String, String>> {
        let path = self.dtypes_path(file_name);
        let content = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str::<HashMap<String, String>>(&content) {
            Ok(dtypes) => {
                debug!("Loaded {} dtypes from {}", dtypes.len(), path.display());
                Some(dtypes)
            }
            Err(e) => {
                warn!("Ignoring malformed dtype mapping {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Path of the dtype resource for an extract file name
    pub fn dtypes_path(&self, file_name: &str) -> PathBuf {
        let stem = file_name.strip_suffix(".csv").unwrap_or(file_name);
        self.schema_dir().join(DTYPES_DIR).join(format!("{stem}.json"))
    }

    /// Eagerly load one lookup code table by resource name.
    ///
    /// Lookup checks are detection-only, so a missing or malformed resource
    /// just leaves the table unloaded.
    pub fn load_lookup_table(&mut self, resource: &str) {
        let path = self.schema_dir().join(LOOKUP_DIR).join(resource);
        let Ok(content) = std::fs::read_to_string(&path) else {
            debug!("Lookup table {} not available", path.display());
            return;
        };
        match serde_json::from_str::<HashMap<String, serde_json::Value>>(&content) {
            Ok(codes) => {
                let codes: HashSet<String> = codes.into_keys().collect();
                debug!(
                    "Loaded lookup table {} with {} codes",
                    resource,
                    codes.len()
                );
                self.insert_lookup_table(resource, codes);
            }
            Err(e) => warn!("Ignoring malformed lookup table {}: {}", path.display(), e),
        }
    }
}
