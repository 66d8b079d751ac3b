//! Configuration management and validation.
//!
//! Provides the per-file exception policies (exempt columns, null tolerance,
//! auto-realignment) as one immutable, declaratively loaded catalog keyed by
//! file name, plus run-level settings for the validator.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;

use crate::constants::{DEFAULT_BAD_ROW_SAMPLE_SIZE, DEFAULT_MAX_CONCURRENT_FILES};
use crate::{Error, Result};

/// File-specific exception policy
///
/// Known quirks of individual extract files: columns that are effectively
/// always null and should skip validation, tolerance for heavily null files,
/// and the auto-realignment rule for files that reliably carry empty
/// trailing columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExceptionPolicy {
    /// Columns exempt from all value checks (pass through pipe-stripped only)
    #[serde(default)]
    pub exempt_columns: HashSet<String>,

    /// Accept null-like values silently, without flag entries
    #[serde(default)]
    pub high_null_tolerance: bool,

    /// Allow truncation of empty trailing overflow columns
    #[serde(default)]
    pub auto_realign: bool,

    /// Overflow width the auto-realign rule expects
    #[serde(default)]
    pub expected_extra_columns: usize,
}

impl ExceptionPolicy {
    /// Whether a column is exempt from value checks
    pub fn is_exempt(&self, column: &str) -> bool {
        self.exempt_columns.contains(column)
    }
}

/// Immutable catalog of exception policies keyed by extract file name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyCatalog {
    policies: HashMap<String, ExceptionPolicy>,
}

impl Default for PolicyCatalog {
    /// Built-in policies for the extract files known to misbehave
    fn default() -> Self {
        let mut policies = HashMap::new();

        // Court motions extracts reliably carry two empty trailing columns,
        // plus a set of columns confirmed 100% null in the loaded data.
        policies.insert(
            "tbl_Court_Motions.csv".to_string(),
            ExceptionPolicy {
                exempt_columns: [
                    "REJ",
                    "DATE_TO_BIA",
                    "DECISION_RENDERED",
                    "DATE_MAILED_TO_IJ",
                    "DATE_RECD_FROM_BIA",
                    "STRDJSCENARIO",
                    "E_28_RECPTFLAG",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
                high_null_tolerance: false,
                auto_realign: true,
                expected_extra_columns: 2,
            },
        );

        // Pro bono extracts are sparsely populated by design.
        policies.insert(
            "tblProBono.csv".to_string(),
            ExceptionPolicy {
                exempt_columns: [
                    "WD_DEC",
                    "strA1",
                    "strA2",
                    "strA3",
                    "strPossibility",
                    "strIntrprLang",
                    "blnProcessed",
                    "other_comp",
                    "DEC_212C",
                    "recd_212C",
                    "blnOARequestedbyINS",
                    "Other_dec2",
                    "Charge_5",
                    "blnOARequestedbyAlien",
                    "DEC_245",
                    "recd_245",
                    "Charge_4",
                    "blnIntrpr",
                    "Charge_6",
                    "WD_recd",
                    "blnOARequestedbyAmicus",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
                high_null_tolerance: true,
                auto_realign: false,
                expected_extra_columns: 0,
            },
        );

        // Case extracts carry legacy detention fields that are 99.9%+ null.
        policies.insert(
            "A_TblCase.csv".to_string(),
            ExceptionPolicy {
                exempt_columns: [
                    "UP_BOND_DATE",
                    "UP_BOND_RSN",
                    "ZBOND_MRG_FLAG",
                    "DETENTION_DATE",
                    "DETENTION_LOCATION",
                    "DCO_LOCATION",
                    "DETENTION_FACILITY_TYPE",
                    "LPR",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
                high_null_tolerance: false,
                auto_realign: false,
                expected_extra_columns: 0,
            },
        );

        Self { policies }
    }
}

impl PolicyCatalog {
    /// Create an empty catalog (no file gets special treatment)
    pub fn empty() -> Self {
        Self {
            policies: HashMap::new(),
        }
    }

    /// Load a catalog from a JSON file of `{file_name: policy}` entries,
    /// merged over the built-in defaults (file entries win).
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read policy file {}", path.display()), e)
        })?;
        let overrides: HashMap<String, ExceptionPolicy> = serde_json::from_str(&content)
            .map_err(|e| {
                Error::configuration(format!("Invalid policy file {}: {}", path.display(), e))
            })?;

        let mut catalog = Self::default();
        for (file_name, policy) in overrides {
            debug!("Policy override for {}", file_name);
            catalog.policies.insert(file_name, policy);
        }
        Ok(catalog)
    }

    /// Policy for a file, or the default (no exceptions) when none is declared
    pub fn policy_for(&self, file_name: &str) -> ExceptionPolicy {
        self.policies.get(file_name).cloned().unwrap_or_default()
    }

    /// Number of files with declared policies
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Whether the catalog declares no policies at all
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

/// Run-level configuration for the validator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Maximum files validated concurrently by `process-all`
    pub max_concurrent_files: usize,

    /// Size of the deterministic bad-row sample kept for inspection
    pub bad_row_sample_size: usize,

    /// Keep the NUL-stripped sibling artifact after the run
    pub keep_stripped_artifact: bool,

    /// Export flagged raw rows to a sibling `_bad_rows` artifact
    pub export_bad_rows: bool,

    /// Emit flagged rows to the sink at their original width.
    ///
    /// Off by default: a flagged row has misaligned columns, so it is
    /// withheld from the load stream and surfaces only through the bad-row
    /// sample and the export artifact.
    pub emit_flagged_rows: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_files: DEFAULT_MAX_CONCURRENT_FILES,
            bad_row_sample_size: DEFAULT_BAD_ROW_SAMPLE_SIZE,
            keep_stripped_artifact: false,
            export_bad_rows: false,
            emit_flagged_rows: false,
        }
    }
}

impl ValidatorConfig {
    /// Create configuration with a custom concurrency limit
    pub fn with_max_concurrent_files(mut self, max_files: usize) -> Self {
        self.max_concurrent_files = max_files.max(1);
        self
    }

    /// Create configuration with a custom bad-row sample size
    pub fn with_bad_row_sample_size(mut self, sample_size: usize) -> Self {
        self.bad_row_sample_size = sample_size;
        self
    }

    /// Keep the NUL-stripped artifact after the run
    pub fn with_keep_stripped_artifact(mut self) -> Self {
        self.keep_stripped_artifact = true;
        self
    }

    /// Export flagged raw rows to a sibling artifact
    pub fn with_export_bad_rows(mut self) -> Self {
        self.export_bad_rows = true;
        self
    }

    /// Emit flagged rows to the sink instead of withholding them
    pub fn with_emit_flagged_rows(mut self) -> Self {
        self.emit_flagged_rows = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_has_known_files() {
        let catalog = PolicyCatalog::default();
        assert_eq!(catalog.len(), 3);

        let motions = catalog.policy_for("tbl_Court_Motions.csv");
        assert!(motions.auto_realign);
        assert_eq!(motions.expected_extra_columns, 2);
        assert!(motions.is_exempt("REJ"));

        let probono = catalog.policy_for("tblProBono.csv");
        assert!(probono.high_null_tolerance);
        assert!(!probono.auto_realign);
    }

    #[test]
    fn test_unknown_file_gets_default_policy() {
        let catalog = PolicyCatalog::default();
        let policy = catalog.policy_for("tbl_Unknown.csv");
        assert_eq!(policy, ExceptionPolicy::default());
        assert!(!policy.auto_realign);
        assert!(policy.exempt_columns.is_empty());
    }

    #[test]
    fn test_validator_config_builders() {
        let config = ValidatorConfig::default()
            .with_max_concurrent_files(2)
            .with_bad_row_sample_size(10)
            .with_export_bad_rows();
        assert_eq!(config.max_concurrent_files, 2);
        assert_eq!(config.bad_row_sample_size, 10);
        assert!(config.export_bad_rows);
        assert!(!config.keep_stripped_artifact);
        assert!(!config.emit_flagged_rows);
    }

    #[test]
    fn test_concurrency_floor_is_one() {
        let config = ValidatorConfig::default().with_max_concurrent_files(0);
        assert_eq!(config.max_concurrent_files, 1);
    }
}
