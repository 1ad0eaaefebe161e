//! CSV loading into [`Table`]s.
//!
//! Records are read without header handling and with flexible widths; the
//! CSV reader's unquoting is the only normalisation applied to cells.

use super::grid::Table;
use crate::utils::error::TableError;
use csv::ReaderBuilder;
use log::debug;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read a CSV file into a table
///
/// # Errors
/// * `TableError::Open` - file missing or unreadable
/// * `TableError::Csv` - malformed CSV (e.g. invalid UTF-8)
pub fn read_table(path: impl AsRef<Path>) -> Result<Table, TableError> {
    let path = path.as_ref();

    let file = File::open(path).map_err(|source| TableError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let table = read_table_from(file).map_err(|source| TableError::Csv {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Loaded {} rows from {}", table.len(), path.display());

    Ok(table)
}

/// Read CSV records from any reader into a table
pub fn read_table_from<R: Read>(reader: R) -> Result<Table, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // transition files carry no header and rows may be ragged
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table::from_rows(rows))
}
