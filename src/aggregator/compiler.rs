//! Drive the row builder over every (AOI, participant) pair.
//!
//! AOIs are the outer loop and participants the inner one. Each AOI's table
//! is persisted as soon as its participants are done; the combined table is
//! persisted last. The header is resolved before the first row is emitted,
//! so every persisted table carries the same columns.

use super::header::{HeaderSet, HeaderState};
use super::row_builder::RowBuilder;
use crate::input::ParticipantTables;
use crate::naming::{combined_file_name, per_aoi_file_name};
use crate::output::{MissingPair, TableSink};
use crate::table::Table;
use crate::utils::error::OutputError;
use log::{debug, error, info, warn};
use std::path::PathBuf;

/// Counters collected while compiling
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileStats {
    pub participants: usize,
    pub aois: usize,
    pub rows: usize,
    pub matched_rows: usize,
    pub missing: Vec<MissingPair>,
    pub dropped_cells: usize,
}

/// Finalized table for one AOI
#[derive(Debug, Clone)]
pub struct AoiTable {
    pub aoi: String,
    pub file_name: String,
    pub table: Table,

    /// Participants with a DGM row for this AOI
    pub matched: usize,
}

/// Result of a compile run
#[derive(Debug)]
pub struct Compilation {
    pub headers: HeaderSet,
    pub combined: Table,
    pub per_aoi: Vec<AoiTable>,
    pub stats: CompileStats,
    pub written: Vec<PathBuf>,

    /// Tables the sink could not persist; the run carried on without them
    pub failures: Vec<OutputError>,
}

impl Compilation {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn table_for(&self, aoi: &str) -> Option<&Table> {
        self.per_aoi.iter().find(|t| t.aoi == aoi).map(|t| &t.table)
    }
}

/// Owns the run-wide header state and assembles the output tables
pub struct Aggregator<'a> {
    builder: RowBuilder<'a>,
    headers: HeaderState,
}

impl<'a> Aggregator<'a> {
    pub fn new(builder: RowBuilder<'a>, headers: HeaderState) -> Self {
        Self { builder, headers }
    }

    pub fn headers(&self) -> &HeaderState {
        &self.headers
    }

    /// Finalize the header from the first matching pair in iteration order
    ///
    /// Returns `false` when no pair matches; the header then stays `pid`
    /// (plus any pilot columns).
    pub fn resolve_headers(&mut self, participants: &[ParticipantTables]) -> bool {
        if self.headers.is_finalized() {
            return true;
        }

        for aoi in self.builder.aois() {
            for participant in participants {
                let (_, contribution) = self.builder.build_row(participant, aoi, &self.headers);
                if let Some(contribution) = contribution {
                    self.headers.contribute(contribution);
                    info!(
                        "Header built from participant {} / AOI {} ({} columns)",
                        participant.id,
                        aoi,
                        self.headers.set().width()
                    );
                    return true;
                }
            }
        }

        false
    }

    /// Compile every table and persist it through `sink`
    pub fn run(mut self, participants: &[ParticipantTables], sink: &mut dyn TableSink) -> Compilation {
        if !self.resolve_headers(participants) {
            warn!("No participant has a DGM row for any AOI; tables will only hold participant IDs");
        }

        let header = self.headers.set().clone();
        let aois = self.builder.aois();

        let mut stats = CompileStats {
            participants: participants.len(),
            aois: aois.len(),
            ..CompileStats::default()
        };
        let mut combined = Table::new();
        let mut per_aoi = Vec::with_capacity(aois.len());
        let mut written = Vec::new();
        let mut failures = Vec::new();

        for aoi in aois {
            debug!("Compiling AOI {}", aoi);
            let mut table = Table::new();
            let mut matched = 0;

            for participant in participants {
                // the header is already final, so no contribution can come back
                let (row, _) = self.builder.build_row(participant, aoi, &self.headers);

                if row.is_matched() {
                    matched += 1;
                } else {
                    stats.missing.push(MissingPair {
                        participant: participant.id.clone(),
                        aoi: aoi.clone(),
                    });
                }

                let layout = row.layout(&header);
                if layout.dropped > 0 {
                    warn!(
                        "Participant {} / AOI {}: {} cells do not fit the header and were dropped",
                        participant.id, aoi, layout.dropped
                    );
                    stats.dropped_cells += layout.dropped;
                }

                table.push_row(layout.cells.clone());
                combined.push_row(layout.cells);
            }

            stats.rows += participants.len();
            stats.matched_rows += matched;

            let file_name = per_aoi_file_name(aoi);
            let table = table.with_header(header.header_row_for(aoi));
            persist(sink, &file_name, &table, &mut written, &mut failures);

            info!(
                "AOI {}: {}/{} participants matched",
                aoi,
                matched,
                participants.len()
            );

            per_aoi.push(AoiTable {
                aoi: aoi.clone(),
                file_name,
                table,
                matched,
            });
        }

        let combined = combined.with_header(header.header_row());
        persist(sink, combined_file_name(), &combined, &mut written, &mut failures);

        Compilation {
            headers: header,
            combined,
            per_aoi,
            stats,
            written,
            failures,
        }
    }
}

fn persist(
    sink: &mut dyn TableSink,
    file_name: &str,
    table: &Table,
    written: &mut Vec<PathBuf>,
    failures: &mut Vec<OutputError>,
) {
    match sink.persist(file_name, table) {
        Ok(path) => written.push(path),
        Err(e) => {
            error!("Could not write {}: {}", file_name, e);
            failures.push(e);
        }
    }
}
