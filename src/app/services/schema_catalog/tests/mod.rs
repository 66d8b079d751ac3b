//! Tests for schema catalog loading and schema construction


use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::config::PolicyCatalog;

/// Write a complete schema directory fixture and return its root.
///
/// Contains a table map for two files, a dtype mapping for `tbl_Case.csv`,
/// and one lookup code table.
pub fn create_schema_dir() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = dir.path().to_path_buf();

    fs::write(
        root.join("tables.json"),
        r#"{"tbl_Case.csv": "tbl_case", "tbl_Court_Motions.csv": "tbl_court_motions"}"#,
    )
    .unwrap();

    fs::create_dir(root.join("table-dtypes")).unwrap();
    fs::write(
        root.join("table-dtypes/tbl_Case.json"),
        r#"{
            "IDNCASE": "integer",
            "FILED_ON": "timestamp without time zone",
            "HEARING_TIME": "time without time zone",
            "NAT_CODE": "tbl_lookup_Nationality.json",
            "CASE_TYPE": "^[A-Z]{3}$",
            "NOTES": "text"
        }"#,
    )
    .unwrap();

    fs::create_dir(root.join("lookup")).unwrap();
    fs::write(
        root.join("lookup/tbl_lookup_Nationality.json"),
        r#"{"MX": "Mexico", "CN": "China", "IN": "India"}"#,
    )
    .unwrap();

    (dir, root)
}

/// Default policy catalog used by most tests
pub fn test_policies() -> PolicyCatalog {
    PolicyCatalog::default()
}
