//! JSON run report writer.
//!
//! Records what a compile run consumed and produced: configured inputs,
//! the final header, match statistics and every written or failed file.

use crate::utils::error::OutputError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Top-level run report written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the report was generated (RFC 3339)
    pub generated_at: String,

    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub participants: Vec<String>,
    pub aois: Vec<String>,

    /// Combined-table header row
    pub columns: Vec<String>,

    /// Rows written to the combined table
    pub rows: usize,

    /// Rows whose participant had a DGM row for the AOI
    pub matched_rows: usize,

    /// Pairs that degraded to participant-only rows
    pub missing: Vec<MissingPair>,

    /// Cells that did not fit the header and were left out
    pub dropped_cells: usize,

    pub written_files: Vec<PathBuf>,

    /// Files that could not be written, with the reason
    pub failed_files: Vec<FailedFile>,
}

/// A (participant, AOI) pair without a DGM row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingPair {
    pub participant: String,
    pub aoi: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedFile {
    pub path: Option<PathBuf>,
    pub error: String,
}

/// Write a run report to a JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_report(report: &RunReport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing run report to: {}", output_path.display());

    super::validate_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(|source| OutputError::WriteFailed {
        path: output_path.to_path_buf(),
        source,
    })?;

    serde_json::to_writer_pretty(BufWriter::new(file), report)?;

    Ok(())
}

/// Read a run report back from JSON
pub fn read_report(input_path: impl AsRef<Path>) -> Result<RunReport, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading run report from: {}", input_path.display());

    let file = File::open(input_path).map_err(|source| OutputError::WriteFailed {
        path: input_path.to_path_buf(),
        source,
    })?;

    Ok(serde_json::from_reader(file)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_test_report() -> RunReport {
        RunReport {
            version: "1.0.0".to_string(),
            generated_at: "2024-01-01T00:00:00+00:00".to_string(),
            input_dir: PathBuf::from("Data/Results"),
            output_dir: PathBuf::from("Data/Output"),
            participants: vec!["p1".into(), "p2".into()],
            aois: vec!["RWY".into()],
            columns: vec!["pid".into(), "aoi_AOI".into()],
            rows: 2,
            matched_rows: 1,
            missing: vec![MissingPair {
                participant: "p2".into(),
                aoi: "RWY".into(),
            }],
            dropped_cells: 0,
            written_files: vec![PathBuf::from("Data/Output/AOI_RWY_Pilot_Data.csv")],
            failed_files: vec![],
        }
    }

    #[test]
    fn test_write_and_read_report() {
        let report = create_test_report();
        let temp_file = NamedTempFile::new().unwrap();

        write_report(&report, temp_file.path()).unwrap();
        let loaded = read_report(temp_file.path()).unwrap();

        assert_eq!(loaded.version, report.version);
        assert_eq!(loaded.missing, report.missing);
        assert_eq!(loaded.rows, 2);
    }

    #[test]
    fn test_write_report_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/report.json");

        write_report(&create_test_report(), &nested_path).unwrap();
        assert!(nested_path.exists());
    }
}
