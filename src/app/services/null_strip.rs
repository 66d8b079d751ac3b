//! NUL-stripping pre-pass for raw extract files
//!
//! The legacy export embeds stray NUL bytes that break both CSV parsing and
//! bulk loading. This pre-pass writes a byte-clean sibling artifact with all
//! NUL bytes removed; the source file is never mutated. The pass is
//! idempotent and independent of any schema.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::constants::NO_NUL_SUFFIX;
use crate::{Error, Result};

const STRIP_BUFFER_SIZE: usize = 1 << 20;

/// Sibling path for the NUL-stripped artifact of a source file
///
/// `dir/tbl_Case.csv` becomes `dir/tbl_Case_no_nul.csv`.
pub fn stripped_path(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match source.extension() {
        Some(ext) => format!("{}{}.{}", stem, NO_NUL_SUFFIX, ext.to_string_lossy()),
        None => format!("{stem}{NO_NUL_SUFFIX}"),
    };
    source.with_file_name(name)
}

/// Strip all NUL bytes from `source` into its sibling artifact.
///
/// Streams the file in chunks so arbitrarily large extracts never need to
/// fit in memory. Returns the artifact path. Fatal only on I/O failure:
/// unreadable source or unwritable destination.
pub fn strip_nul_bytes(source: &Path) -> Result<PathBuf> {
    let destination = stripped_path(source);
    info!(
        "Stripping NUL bytes: {} -> {}",
        source.display(),
        destination.display()
    );

    let input = File::open(source)
        .map_err(|e| Error::io(format!("Failed to open source file {}", source.display()), e))?;
    let output = File::create(&destination).map_err(|e| {
        Error::io(
            format!("Failed to create stripped file {}", destination.display()),
            e,
        )
    })?;

    let mut reader = BufReader::with_capacity(STRIP_BUFFER_SIZE, input);
    let mut writer = BufWriter::with_capacity(STRIP_BUFFER_SIZE, output);
    let mut buffer = vec![0u8; STRIP_BUFFER_SIZE];
    let mut stripped: u64 = 0;

    loop {
        let read = reader
            .read(&mut buffer)
            .map_err(|e| Error::io(format!("Failed to read {}", source.display()), e))?;
        if read == 0 {
            break;
        }
        let chunk = &buffer[..read];
        let nul_count = chunk.iter().filter(|&&b| b == 0).count();
        if nul_count == 0 {
            writer.write_all(chunk)
        } else {
            stripped += nul_count as u64;
            let clean: Vec<u8> = chunk.iter().copied().filter(|&b| b != 0).collect();
            writer.write_all(&clean)
        }
        .map_err(|e| Error::io(format!("Failed to write {}", destination.display()), e))?;
    }

    // The reconciler must only ever see fully flushed output.
    writer
        .flush()
        .map_err(|e| Error::io(format!("Failed to flush {}", destination.display()), e))?;

    debug!("Removed {} NUL bytes from {}", stripped, source.display());
    Ok(destination)
}

/// Remove the stripped sibling artifact if present
pub fn remove_stripped(source: &Path) -> Result<()> {
    let destination = stripped_path(source);
    if destination.exists() {
        std::fs::remove_file(&destination).map_err(|e| {
            Error::io(
                format!("Failed to remove stripped file {}", destination.display()),
                e,
            )
        })?;
        debug!("Removed stripped artifact {}", destination.display());
    }
    Ok(())
}

/// Path the validator should actually read: the stripped artifact when it
/// exists, the original file otherwise.
pub fn readable_path(source: &Path) -> PathBuf {
    let stripped = stripped_path(source);
    if stripped.exists() {
        stripped
    } else {
        source.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_source(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_stripped_path_inserts_suffix_before_extension() {
        let path = stripped_path(Path::new("/data/tbl_Case.csv"));
        assert_eq!(path, PathBuf::from("/data/tbl_Case_no_nul.csv"));
    }

    #[test]
    fn test_strip_removes_all_nul_bytes() {
        let dir = TempDir::new().unwrap();
        let source = write_source(&dir, "a.csv", b"id\tname\n1\x00\tfoo\x00\x00bar\n");

        let out = strip_nul_bytes(&source).unwrap();
        assert_eq!(fs::read(&out).unwrap(), b"id\tname\n1\tfoobar\n");
        // Source untouched
        assert!(fs::read(&source).unwrap().contains(&0u8));
    }

    #[test]
    fn test_strip_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let source = write_source(&dir, "a.csv", b"1\x002\x003\n");

        let out1 = strip_nul_bytes(&source).unwrap();
        let first = fs::read(&out1).unwrap();
        let out2 = strip_nul_bytes(&source).unwrap();
        let second = fs::read(&out2).unwrap();

        assert_eq!(out1, out2);
        assert_eq!(first, second);
        assert_eq!(first, b"123\n");
    }

    #[test]
    fn test_readable_path_falls_back_to_source() {
        let dir = TempDir::new().unwrap();
        let source = write_source(&dir, "a.csv", b"1\t2\n");

        assert_eq!(readable_path(&source), source);
        let stripped = strip_nul_bytes(&source).unwrap();
        assert_eq!(readable_path(&source), stripped);
    }

    #[test]
    fn test_remove_stripped_cleans_up() {
        let dir = TempDir::new().unwrap();
        let source = write_source(&dir, "a.csv", b"1\t2\n");
        let stripped = strip_nul_bytes(&source).unwrap();
        assert!(stripped.exists());

        remove_stripped(&source).unwrap();
        assert!(!stripped.exists());
        // Removing twice is fine
        remove_stripped(&source).unwrap();
    }

    #[test]
    fn test_strip_missing_source_is_fatal() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.csv");
        assert!(strip_nul_bytes(&missing).is_err());
    }
}
