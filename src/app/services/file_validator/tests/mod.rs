//! Tests for the per-file validation pipeline

pub mod stream_tests;

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::app::services::schema_catalog::SchemaCatalog;
use crate::config::PolicyCatalog;

/// File with a full dtype mapping: ID integer, AMOUNT integer, FILED_ON
/// timestamp
pub const CASE_FILE: &str = "TestCase.csv";

/// File known to the table map but carrying no dtype mapping
pub const UNTYPED_FILE: &str = "TestUntyped.csv";

pub const HEADER: &str = "ID\tAMOUNT\tFILED_ON";

/// Schema directory fixture shared by the pipeline tests
pub fn schema_dir() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = dir.path().to_path_buf();

    fs::write(
        root.join("tables.json"),
        r#"{"TestCase.csv": "test_case", "TestUntyped.csv": "test_untyped"}"#,
    )
    .unwrap();

    fs::create_dir(root.join("table-dtypes")).unwrap();
    fs::write(
        root.join("table-dtypes/TestCase.json"),
        r#"{
            "ID": "integer",
            "AMOUNT": "integer",
            "FILED_ON": "timestamp without time zone"
        }"#,
    )
    .unwrap();

    (dir, root)
}

pub fn catalog(root: &Path) -> SchemaCatalog {
    SchemaCatalog::load(root, PolicyCatalog::empty()).unwrap()
}

/// Catalog whose policy file grants `TestCase.csv` the auto-realign rule
pub fn catalog_with_realign_policy(root: &Path) -> SchemaCatalog {
    let policy_path = root.join("policies.json");
    fs::write(
        &policy_path,
        r#"{"TestCase.csv": {"auto_realign": true, "expected_extra_columns": 1}}"#,
    )
    .unwrap();
    let policies = PolicyCatalog::load(&policy_path).unwrap();
    SchemaCatalog::load(root, policies).unwrap()
}

/// Write a tab-delimited source file and return its path
pub fn write_source(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(&path, content).unwrap();
    path
}

/// Split captured sink bytes into lines
pub fn output_lines(sink: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(sink)
        .lines()
        .map(|line| line.to_string())
        .collect()
}
