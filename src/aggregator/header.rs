//! Output header bookkeeping.
//!
//! The header is built exactly once, from the first (AOI, participant) pair
//! whose DGM table matched, and then reused for every table of the run.

use crate::naming::{aoi_token, substitute_aoi_token, transition_headers};
use crate::utils::config::PID_COLUMN;

/// Column groups shared by every output row
///
/// Pilot columns are never AOI-specific; metric and transition columns carry
/// the generic `aoi` segment that per-AOI tables replace with the AOI token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    /// Normalized pilot table labels
    pub pilot: Vec<String>,

    /// `aoi_<metric>` columns, one per DGM header cell
    pub metrics: Vec<String>,

    /// Target AOI names; each contributes four transition columns
    pub transition_targets: Vec<String>,
}

impl HeaderSet {
    /// Generic column names, `pid` excluded
    pub fn columns(&self) -> Vec<String> {
        let mut columns = Vec::with_capacity(self.width() - 1);
        columns.extend(self.pilot.iter().cloned());
        columns.extend(self.aoi_columns());
        columns
    }

    /// Number of cells in a full row, `pid` included
    pub fn width(&self) -> usize {
        1 + self.pilot.len() + self.metrics.len() + 4 * self.transition_targets.len()
    }

    /// Header row of the combined table
    pub fn header_row(&self) -> Vec<String> {
        let mut row = Vec::with_capacity(self.width());
        row.push(PID_COLUMN.to_string());
        row.extend(self.columns());
        row
    }

    /// Header row of the table for one AOI
    pub fn header_row_for(&self, aoi_name: &str) -> Vec<String> {
        let token = aoi_token(aoi_name);
        let mut row = Vec::with_capacity(self.width());
        row.push(PID_COLUMN.to_string());
        row.extend(self.pilot.iter().cloned());
        row.extend(
            self.aoi_columns()
                .map(|column| substitute_aoi_token(&column, &token)),
        );
        row
    }

    fn aoi_columns(&self) -> impl Iterator<Item = String> + '_ {
        self.metrics.iter().cloned().chain(
            self.transition_targets
                .iter()
                .flat_map(|target| transition_headers(target)),
        )
    }
}

/// Columns contributed by the first matching row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderContribution {
    pub metrics: Vec<String>,
    pub transition_targets: Vec<String>,
}

/// Run-wide header plus its "finalized" flag
#[derive(Debug, Clone, Default)]
pub struct HeaderState {
    set: HeaderSet,
    finalized: bool,
}

impl HeaderState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from pilot columns, known before any participant is read
    pub fn with_pilot(pilot: Vec<String>) -> Self {
        Self {
            set: HeaderSet {
                pilot,
                ..HeaderSet::default()
            },
            finalized: false,
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn set(&self) -> &HeaderSet {
        &self.set
    }

    /// Apply a contribution; later ones are ignored
    ///
    /// Returns `true` if this call finalized the header.
    pub fn contribute(&mut self, contribution: HeaderContribution) -> bool {
        if self.finalized {
            return false;
        }
        self.set.metrics = contribution.metrics;
        self.set.transition_targets = contribution.transition_targets;
        self.finalized = true;
        true
    }
}
