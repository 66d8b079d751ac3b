//! Extract Validator Library
//!
//! A Rust library for reconciling and type-validating fixed-schema,
//! tab-delimited extracts produced by a legacy export process, emitting
//! pipe-delimited lines fit for bulk loading.
//!
//! This library provides tools for:
//! - Stripping embedded NUL bytes from raw extracts (idempotent pre-pass)
//! - Repairing rows whose physical width disagrees with the declared schema
//! - Checking and normalizing cell values against declared column types
//! - Recording every structural or type repair in an append-only ledger
//! - Aggregating ledger entries into an end-of-run quality report

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod file_validator;
        pub mod ledger;
        pub mod null_strip;
        pub mod row_reconciler;
        pub mod schema_catalog;
        pub mod value_validator;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{BadRowEntry, FileSchema, Modification, ModificationKind, TypeTag};
pub use app::services::file_validator::FileValidator;
pub use config::ExceptionPolicy;

/// Result type alias for the extract validator
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for extract validation operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error
    #[error("CSV parsing error in file '{file}': {message}")]
    CsvParsing {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Header is unreadable or declares no columns
    #[error("Header error in file '{file}': {message}")]
    Header { file: String, message: String },

    /// Schema catalog resource error
    #[error("Schema catalog error: {message}")]
    SchemaCatalog { message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Sink write failure that aborted a whole run
    #[error("Sink error: {message}")]
    Sink {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create an I/O error with a simple message
    pub fn io_error(message: impl Into<String>) -> Self {
        let message_str = message.into();
        Self::Io {
            message: message_str.clone(),
            source: std::io::Error::other(message_str),
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a header error
    pub fn header(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Header {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a schema catalog error
    pub fn schema_catalog(message: impl Into<String>) -> Self {
        Self::SchemaCatalog {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a sink error
    pub fn sink(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Sink {
            message: message.into(),
            source,
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            file: "unknown".to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::SchemaCatalog {
            message: format!("JSON resource parsing failed: {error}"),
        }
    }
}
