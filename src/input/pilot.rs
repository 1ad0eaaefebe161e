//! Master pilot table.
//!
//! One header row plus one row per participant, consumed by position: the
//! participant at index `i` owns row `i + 1`. Only the first `columns`
//! cells of each row are copied into the compiled output.

use crate::naming::normalize;
use crate::table::{read_table, Table};
use crate::utils::error::TableError;
use log::warn;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct PilotTable {
    table: Table,
    columns: usize,
}

impl PilotTable {
    pub fn new(table: Table, columns: usize) -> Self {
        Self { table, columns }
    }

    /// Load the pilot table; unlike participant files it must be readable
    pub fn load(path: impl AsRef<Path>, columns: usize) -> Result<Self, TableError> {
        Ok(Self::new(read_table(path)?, columns))
    }

    /// Normalized labels of the copied columns
    pub fn headers(&self) -> Vec<String> {
        let header = self.table.header().unwrap_or(&[]);
        (0..self.columns)
            .map(|i| header.get(i).map(|h| normalize(h)).unwrap_or_default())
            .collect()
    }

    /// Copied cells for the participant at `index`, padded with empty cells
    pub fn cells_for(&self, index: usize, participant: &str) -> Vec<String> {
        let Some(row) = self.table.row(index + 1) else {
            warn!(
                "Pilot table has no row {} for participant {}",
                index + 1,
                participant
            );
            return vec![String::new(); self.columns];
        };

        (0..self.columns)
            .map(|i| row.get(i).cloned().unwrap_or_default())
            .collect()
    }
}
