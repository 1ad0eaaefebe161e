//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a CSV table
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Errors that can occur while loading the run configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode CSV for {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("Row {row} of {path} has {width} cells, header has {expected}")]
    RaggedRow {
        path: PathBuf,
        row: usize,
        width: usize,
        expected: usize,
    },
}

impl OutputError {
    /// Path of the file the error refers to, when there is one
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            OutputError::WriteFailed { path, .. }
            | OutputError::Csv { path, .. }
            | OutputError::RaggedRow { path, .. } => Some(path),
            OutputError::SerializationFailed(_) | OutputError::InvalidPath(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_failed_names_path() {
        let err = OutputError::WriteFailed {
            path: PathBuf::from("/out/AOI_RWY_Pilot_Data.csv"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/out/AOI_RWY_Pilot_Data.csv"));
        assert!(msg.contains("locked"));
        assert_eq!(err.path(), Some(std::path::Path::new("/out/AOI_RWY_Pilot_Data.csv")));
    }

    #[test]
    fn test_ragged_row_message() {
        let err = OutputError::RaggedRow {
            path: PathBuf::from("combined.csv"),
            row: 3,
            width: 2,
            expected: 5,
        };
        assert_eq!(
            err.to_string(),
            "Row 3 of combined.csv has 2 cells, header has 5"
        );
    }

    #[test]
    fn test_invalid_path_has_no_path() {
        let err = OutputError::InvalidPath("Path is empty".to_string());
        assert!(err.path().is_none());
    }
}
