//! Tests for the lazy record stream

use std::fs;
use tempfile::TempDir;

use super::{write_source, HEADER};
use crate::app::services::file_validator::RecordStream;
use crate::Error;

#[test]
fn test_open_reads_header() {
    let dir = TempDir::new().unwrap();
    let path = write_source(dir.path(), "stream.csv", &[HEADER, "1\t42\t2020-01-01"]);

    let (header, _stream) = RecordStream::open(&path).unwrap();
    assert_eq!(header, vec!["ID", "AMOUNT", "FILED_ON"]);
}

#[test]
fn test_rows_are_numbered_from_one() {
    let dir = TempDir::new().unwrap();
    let path = write_source(
        dir.path(),
        "stream.csv",
        &[HEADER, "1\t10\t2020-01-01", "2\t20\t2020-01-02"],
    );

    let (_, stream) = RecordStream::open(&path).unwrap();
    let rows: Vec<_> = stream.map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].row_number, 1);
    assert_eq!(rows[1].row_number, 2);
    assert_eq!(rows[1].cells, vec!["2", "20", "2020-01-02"]);
}

#[test]
fn test_empty_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.csv");
    fs::write(&path, "").unwrap();

    let result = RecordStream::open(&path);
    assert!(matches!(result, Err(Error::Header { .. })));
}

#[test]
fn test_blank_header_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = write_source(dir.path(), "blank.csv", &["\t\t", "1\t2\t3"]);

    let result = RecordStream::open(&path);
    assert!(matches!(result, Err(Error::Header { .. })));
}

#[test]
fn test_flexible_widths_are_delivered_as_read() {
    let dir = TempDir::new().unwrap();
    let path = write_source(dir.path(), "ragged.csv", &[HEADER, "1", "2\t20\t2020-01-02\textra"]);

    let (_, stream) = RecordStream::open(&path).unwrap();
    let rows: Vec<_> = stream.map(|r| r.unwrap()).collect();
    assert_eq!(rows[0].cells, vec!["1"]);
    assert_eq!(rows[1].cells.len(), 4);
}

#[test]
fn test_invalid_utf8_is_substituted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bytes.csv");
    let mut content = Vec::new();
    content.extend_from_slice(b"ID\tNAME\n");
    content.extend_from_slice(b"1\tJu\xFFrez\n");
    fs::write(&path, content).unwrap();

    let (_, stream) = RecordStream::open(&path).unwrap();
    let rows: Vec<_> = stream.map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].cells[1].contains('\u{FFFD}'));
}

#[test]
fn test_pipes_in_cells_pass_through_raw() {
    let dir = TempDir::new().unwrap();
    let path = write_source(dir.path(), "pipes.csv", &["ID\tNOTES", "1\ta|b"]);

    let (_, stream) = RecordStream::open(&path).unwrap();
    let rows: Vec<_> = stream.map(|r| r.unwrap()).collect();
    assert_eq!(rows[0].cells[1], "a|b");
}
