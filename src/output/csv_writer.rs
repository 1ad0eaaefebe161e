//! CSV table output.
//!
//! Tables are written to a temporary file next to the destination and then
//! renamed into place, so a failed write leaves any existing file intact.

use super::validate_path;
use crate::table::Table;
use crate::utils::error::OutputError;
use csv::{QuoteStyle, WriterBuilder};
use log::{debug, info};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Destination for finalized tables
///
/// **Public** - the aggregator persists through this so tests can capture
/// tables in memory
pub trait TableSink {
    /// Persist `table` under `file_name`, returning where it was written
    fn persist(&mut self, file_name: &str, table: &Table) -> Result<PathBuf, OutputError>;
}

/// Writes each table as a CSV file inside one directory
#[derive(Debug, Clone)]
pub struct CsvDirectorySink {
    dir: PathBuf,
}

impl CsvDirectorySink {
    /// Create the sink, creating the directory if needed
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, OutputError> {
        let dir = dir.into();
        if dir.is_file() {
            return Err(OutputError::InvalidPath(format!(
                "Output directory is a file: {}",
                dir.display()
            )));
        }
        std::fs::create_dir_all(&dir).map_err(|source| OutputError::WriteFailed {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TableSink for CsvDirectorySink {
    fn persist(&mut self, file_name: &str, table: &Table) -> Result<PathBuf, OutputError> {
        let path = self.dir.join(file_name);
        write_table(table, &path)?;
        Ok(path)
    }
}

/// Write a table to a CSV file, quoting every cell
///
/// # Errors
/// * `OutputError::InvalidPath` - empty path or a directory
/// * `OutputError::RaggedRow` - a row's width differs from the header's
/// * `OutputError::WriteFailed` - I/O error, e.g. destination locked by another program
/// * `OutputError::Csv` - CSV encoding error
pub fn write_table(table: &Table, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    validate_path(output_path)?;
    ensure_rectangular(table, output_path)?;

    let parent = match output_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.exists() {
        debug!("Creating parent directories: {}", parent.display());
        std::fs::create_dir_all(parent).map_err(|source| OutputError::WriteFailed {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let write_failed = |source: std::io::Error| OutputError::WriteFailed {
        path: output_path.to_path_buf(),
        source,
    };

    let mut temp = NamedTempFile::new_in(parent).map_err(write_failed)?;
    {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .from_writer(temp.as_file_mut());

        for row in table.rows() {
            writer.write_record(row).map_err(|source| OutputError::Csv {
                path: output_path.to_path_buf(),
                source,
            })?;
        }
        writer.flush().map_err(write_failed)?;
    }
    temp.as_file_mut().flush().map_err(write_failed)?;

    temp.persist(output_path)
        .map_err(|e| write_failed(e.error))?;

    info!(
        "Wrote {} rows to {}",
        table.data_rows().len(),
        output_path.display()
    );

    Ok(())
}

/// Check that every row has the header's width
pub fn ensure_rectangular(table: &Table, path: &Path) -> Result<(), OutputError> {
    let expected = table.width();
    match table
        .rows()
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() != expected)
    {
        Some((row, cells)) => Err(OutputError::RaggedRow {
            path: path.to_path_buf(),
            row,
            width: cells.len(),
            expected,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::read_table;
    use std::fs;

    fn table() -> Table {
        Table::from_rows(vec![
            vec!["pid".into(), "aoi_label".into()],
            vec!["p1".into(), "a, \"quoted\" cell".into()],
        ])
    }

    #[test]
    fn test_write_and_read_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        write_table(&table(), &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("\"pid\",\"aoi_label\""));
        assert_eq!(read_table(&path).unwrap(), table());
    }

    #[test]
    fn test_ragged_table_rejected_and_existing_file_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, "previous").unwrap();

        let mut ragged = table();
        ragged.push_row(vec!["p2".into()]);

        let result = write_table(&ragged, &path);
        assert!(matches!(result, Err(OutputError::RaggedRow { row: 2, .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), "previous");
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested/dirs/out.csv");

        write_table(&table(), &nested).unwrap();
        assert!(nested.exists());
    }

    #[test]
    fn test_write_to_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = write_table(&table(), dir.path());
        assert!(matches!(result, Err(OutputError::InvalidPath(_))));
    }

    #[test]
    fn test_directory_sink_persists_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CsvDirectorySink::create(dir.path().join("Output")).unwrap();

        let path = sink.persist("AOI_RWY_Pilot_Data.csv", &table()).unwrap();
        assert_eq!(path, dir.path().join("Output/AOI_RWY_Pilot_Data.csv"));
        assert!(path.exists());
    }
}
