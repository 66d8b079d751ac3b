//! Tests for the value validator


use std::collections::HashSet;

use crate::app::models::{ColumnSchema, FileSchema, TypeTag};
use crate::config::ExceptionPolicy;

/// Build a schema from `(name, tag)` pairs with a given policy
pub fn make_schema(columns: &[(&str, &str)], policy: ExceptionPolicy) -> FileSchema {
    FileSchema {
        file_name: "tbl_Test.csv".to_string(),
        table_name: Some("tbl_test".to_string()),
        columns: columns
            .iter()
            .enumerate()
            .map(|(ordinal, (name, tag))| ColumnSchema {
                name: name.to_string(),
                type_tag: TypeTag::parse(tag),
                ordinal,
            })
            .collect(),
        has_dtypes: true,
        policy,
    }
}

/// The schema used by the worked examples: id integer, amount integer,
/// filed_on timestamp
pub fn case_schema() -> FileSchema {
    make_schema(
        &[
            ("id", "integer"),
            ("amount", "integer"),
            ("filed_on", "timestamp without time zone"),
        ],
        ExceptionPolicy::default(),
    )
}

pub fn cells(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

pub fn exempt(names: &[&str]) -> HashSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}
