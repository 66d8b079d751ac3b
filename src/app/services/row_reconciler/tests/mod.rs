//! Tests for row width reconciliation and realignment

pub mod realign_tests;
pub mod reconciler_tests;

use crate::app::models::{ColumnSchema, FileSchema, TypeTag};
use crate::config::ExceptionPolicy;

/// Five free-text columns, no exception policy
pub fn plain_schema(width: usize) -> FileSchema {
    schema_with_policy(width, ExceptionPolicy::default())
}

/// Five free-text columns with a given policy
pub fn schema_with_policy(width: usize, policy: ExceptionPolicy) -> FileSchema {
    FileSchema {
        file_name: "tbl_Test.csv".to_string(),
        table_name: None,
        columns: (0..width)
            .map(|ordinal| ColumnSchema {
                name: format!("COL_{ordinal}"),
                type_tag: TypeTag::Text,
                ordinal,
            })
            .collect(),
        has_dtypes: true,
        policy,
    }
}

/// Policy allowing truncation of `extra` empty trailing columns
pub fn realign_policy(extra: usize) -> ExceptionPolicy {
    ExceptionPolicy {
        auto_realign: true,
        expected_extra_columns: extra,
        ..Default::default()
    }
}

pub fn cells(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
