//! Output writers for compiled tables and run reports.
//!
//! This module handles writing data to disk:
//! - CSV tables (per-AOI and combined)
//! - JSON run reports

pub mod csv_writer;
pub mod report;

// Re-export main types and functions
pub use csv_writer::{ensure_rectangular, write_table, CsvDirectorySink, TableSink};
pub use report::{read_report, write_report, FailedFile, MissingPair, RunReport};

use crate::utils::error::OutputError;
use std::path::Path;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}
