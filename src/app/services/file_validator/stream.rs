//! Lazy record stream over a tab-delimited extract
//!
//! The stream reads byte records and converts them to strings with lossy
//! UTF-8, so a bad byte sequence substitutes instead of aborting the run.
//! It is forward-only and non-restartable; row ordinals key every ledger
//! and bad-row record downstream.

use std::fs::File;
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};

use crate::constants::{INPUT_DELIMITER, INPUT_ESCAPE};
use crate::{Error, Result};

/// One physical data row as read, before any reconciliation
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// 1-based data row ordinal (header excluded)
    pub row_number: u64,
    /// Cells exactly as decoded; any width
    pub cells: Vec<String>,
}

/// Forward-only iterator over the data rows of one extract file
#[derive(Debug)]
pub struct RecordStream {
    reader: csv::Reader<File>,
    record: ByteRecord,
    row_number: u64,
    file_name: String,
}

impl RecordStream {
    /// Open a stream and consume the header row.
    ///
    /// Fatal when the file cannot be read or the header is missing or
    /// zero-width; a file without a usable header has no schema to
    /// reconcile against.
    pub fn open(path: &Path) -> Result<(Vec<String>, Self)> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut reader = ReaderBuilder::new()
            .delimiter(INPUT_DELIMITER)
            .quoting(false)
            .escape(Some(INPUT_ESCAPE))
            .flexible(true)
            .has_headers(false)
            .from_path(path)
            .map_err(|e| Error::csv_parsing(&file_name, "failed to open file", Some(e)))?;

        let mut record = ByteRecord::new();
        let has_header = reader
            .read_byte_record(&mut record)
            .map_err(|e| Error::csv_parsing(&file_name, "failed to read header", Some(e)))?;

        if !has_header {
            return Err(Error::header(&file_name, "file contains no header row"));
        }

        let header: Vec<String> = record
            .iter()
            .map(|field| String::from_utf8_lossy(field).into_owned())
            .collect();

        if header.is_empty() || header.iter().all(|name| name.trim().is_empty()) {
            return Err(Error::header(&file_name, "header row has no column names"));
        }

        Ok((
            header,
            Self {
                reader,
                record,
                row_number: 0,
                file_name,
            },
        ))
    }

    /// Rows consumed so far
    pub fn rows_read(&self) -> u64 {
        self.row_number
    }
}

impl Iterator for RecordStream {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_byte_record(&mut self.record) {
            Ok(true) => {
                self.row_number += 1;
                let cells = self
                    .record
                    .iter()
                    .map(|field| String::from_utf8_lossy(field).into_owned())
                    .collect();
                Some(Ok(RawRecord {
                    row_number: self.row_number,
                    cells,
                }))
            }
            Ok(false) => None,
            Err(e) => {
                self.row_number += 1;
                Some(Err(Error::csv_parsing(
                    &self.file_name,
                    format!("failed to read row {}", self.row_number),
                    Some(e),
                )))
            }
        }
    }
}
