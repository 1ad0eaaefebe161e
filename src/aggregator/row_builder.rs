//! Build one output row per (participant, AOI) pair.
//!
//! A row is the participant key, the participant's pilot cells, the DGM row
//! matching the AOI, and every transition record leaving that AOI towards
//! each configured AOI. The first matching row of a run also yields the
//! header columns.

use super::header::{HeaderContribution, HeaderSet, HeaderState};
use crate::input::ParticipantTables;
use crate::naming::metric_header;
use crate::table::Table;
use crate::utils::config::{DGM_AOI_COLUMN, TRANSITION_SEPARATOR};
use log::debug;
use serde::{Deserialize, Serialize};

/// How the DGM row of an AOI is located
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AoiMatch {
    /// First row (header included) holding a cell equal to the AOI name
    #[default]
    AnyCell,
    /// First data row whose `AOI` column equals the AOI name
    AoiColumn,
}

/// One transition row: pair label plus its three measures
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionRecord {
    pub pair: String,
    pub count: String,
    pub proportion_including_self: String,
    pub proportion_excluding_self: String,
}

impl TransitionRecord {
    /// Read a record from a transition row; missing measures are empty
    pub fn from_row(row: &[String]) -> Self {
        let cell = |i: usize| row.get(i).cloned().unwrap_or_default();
        Self {
            pair: cell(0),
            count: cell(1),
            proportion_including_self: cell(2),
            proportion_excluding_self: cell(3),
        }
    }

    pub fn cells(&self) -> [String; 4] {
        [
            self.pair.clone(),
            self.count.clone(),
            self.proportion_including_self.clone(),
            self.proportion_excluding_self.clone(),
        ]
    }
}

/// Transition records from the row's AOI to one target AOI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionSegment {
    pub target: String,
    pub records: Vec<TransitionRecord>,
}

/// A row laid out against the header, plus how many cells did not fit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLayout {
    pub cells: Vec<String>,
    pub dropped: usize,
}

/// Output row for one (participant, AOI) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub participant: String,
    pub pilot: Vec<String>,

    /// Matched DGM row, `None` when the participant lacks the AOI
    pub metrics: Option<Vec<String>>,

    /// Only targets with at least one matching record
    pub transitions: Vec<TransitionSegment>,
}

impl OutputRow {
    fn new(participant: &ParticipantTables) -> Self {
        Self {
            participant: participant.id.clone(),
            pilot: participant.pilot.clone(),
            metrics: None,
            transitions: Vec::new(),
        }
    }

    pub fn is_matched(&self) -> bool {
        self.metrics.is_some()
    }

    /// Flat cells: participant, pilot, DGM cells, then every matched record
    pub fn cells(&self) -> Vec<String> {
        let mut cells = vec![self.participant.clone()];
        cells.extend(self.pilot.iter().cloned());
        if let Some(metrics) = &self.metrics {
            cells.extend(metrics.iter().cloned());
        }
        for segment in &self.transitions {
            for record in &segment.records {
                cells.extend(record.cells());
            }
        }
        cells
    }

    /// Cells aligned to `header`, one column group at a time
    ///
    /// Absent groups become empty cells. Cells beyond a group's width, and
    /// records beyond the first per transition target, are dropped.
    pub fn layout(&self, header: &HeaderSet) -> RowLayout {
        let mut cells = Vec::with_capacity(header.width());
        let mut dropped = 0;

        cells.push(self.participant.clone());
        dropped += push_fitted(&mut cells, &self.pilot, header.pilot.len());
        dropped += push_fitted(
            &mut cells,
            self.metrics.as_deref().unwrap_or(&[]),
            header.metrics.len(),
        );

        for target in &header.transition_targets {
            match self.transitions.iter().find(|s| &s.target == target) {
                Some(segment) => {
                    match segment.records.first() {
                        Some(record) => cells.extend(record.cells()),
                        None => cells.extend(std::iter::repeat(String::new()).take(4)),
                    }
                    dropped += 4 * segment.records.len().saturating_sub(1);
                }
                None => cells.extend(std::iter::repeat(String::new()).take(4)),
            }
        }

        dropped += self
            .transitions
            .iter()
            .filter(|s| !header.transition_targets.contains(&s.target))
            .map(|s| 4 * s.records.len())
            .sum::<usize>();

        RowLayout { cells, dropped }
    }
}

/// Push `width` cells from `source`, padding with empty cells; returns surplus
fn push_fitted(cells: &mut Vec<String>, source: &[String], width: usize) -> usize {
    cells.extend(source.iter().take(width).cloned());
    if source.len() < width {
        cells.extend(std::iter::repeat(String::new()).take(width - source.len()));
    }
    source.len().saturating_sub(width)
}

/// Split a `"<from> -> <to>"` label into its trimmed AOI names
pub fn parse_pair_label(label: &str) -> Option<(&str, &str)> {
    let (from, to) = label.split_once(TRANSITION_SEPARATOR)?;
    Some((from.trim(), to.trim()))
}

/// Whether a pair label names exactly the transition `from -> to`
pub fn matches_pair(label: &str, from: &str, to: &str) -> bool {
    parse_pair_label(label).is_some_and(|(f, t)| f == from && t == to)
}

/// Builds rows for one run's AOI list
#[derive(Debug, Clone)]
pub struct RowBuilder<'a> {
    aois: &'a [String],
    aoi_match: AoiMatch,
}

impl<'a> RowBuilder<'a> {
    pub fn new(aois: &'a [String], aoi_match: AoiMatch) -> Self {
        Self { aois, aoi_match }
    }

    pub fn aois(&self) -> &'a [String] {
        self.aois
    }

    /// Build the row of `participant` for `aoi_name`
    ///
    /// Returns a header contribution only for a matched row while `headers`
    /// is not yet finalized.
    pub fn build_row(
        &self,
        participant: &ParticipantTables,
        aoi_name: &str,
        headers: &HeaderState,
    ) -> (OutputRow, Option<HeaderContribution>) {
        let mut row = OutputRow::new(participant);

        let Some(dgm_row) = self.find_dgm_row(&participant.dgm, aoi_name) else {
            debug!("Participant {} has no DGM row for {}", participant.id, aoi_name);
            return (row, None);
        };

        row.metrics = participant.dgm.row(dgm_row).map(<[String]>::to_vec);
        row.transitions = self.collect_transitions(&participant.transitions, aoi_name);

        let contribution = (!headers.is_finalized()).then(|| HeaderContribution {
            metrics: participant
                .dgm
                .header()
                .unwrap_or(&[])
                .iter()
                .map(|label| metric_header(label))
                .collect(),
            transition_targets: self.aois.to_vec(),
        });

        (row, contribution)
    }

    fn find_dgm_row(&self, dgm: &Table, aoi_name: &str) -> Option<usize> {
        match self.aoi_match {
            AoiMatch::AnyCell => dgm.find_value(aoi_name).map(|(row, _)| row),
            AoiMatch::AoiColumn => match dgm.header_index(DGM_AOI_COLUMN) {
                Some(column) => dgm.find_in_column(column, aoi_name),
                None => {
                    debug!("DGM table has no {DGM_AOI_COLUMN} column, scanning every cell");
                    dgm.find_value(aoi_name).map(|(row, _)| row)
                }
            },
        }
    }

    fn collect_transitions(&self, transitions: &Table, from: &str) -> Vec<TransitionSegment> {
        self.aois
            .iter()
            .filter_map(|to| {
                let records: Vec<TransitionRecord> = transitions
                    .rows()
                    .iter()
                    .filter(|row| row.first().is_some_and(|label| matches_pair(label, from, to)))
                    .map(|row| TransitionRecord::from_row(row))
                    .collect();

                (!records.is_empty()).then(|| TransitionSegment {
                    target: to.clone(),
                    records,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rows(data: &[&[&str]]) -> Table {
        Table::from_rows(
            data.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    fn aois() -> Vec<String> {
        vec!["RWY".to_string(), "PAPI".to_string()]
    }

    fn participant() -> ParticipantTables {
        ParticipantTables::new(
            "P1",
            rows(&[
                &["AOI", "Total Number of Fixations", "St.Dev. of durations"],
                &["RWY", "12", "0.1"],
                &["PAPI", "4", "0.2"],
            ]),
            rows(&[
                &["RWY -> RWY", "3", "0.30", "0.00"],
                &["RWY -> PAPI", "4", "0.50", "0.40"],
                &["RWY -> PAPIX", "9", "0.90", "0.90"],
                &["PAPI -> RWY", "1", "0.10", "0.20"],
            ]),
        )
    }

    #[test]
    fn test_parse_pair_label() {
        assert_eq!(parse_pair_label("RWY -> PAPI"), Some(("RWY", "PAPI")));
        assert_eq!(parse_pair_label("Alt VSI->ASI"), Some(("Alt VSI", "ASI")));
        assert_eq!(parse_pair_label("no arrow"), None);
    }

    #[test]
    fn test_matches_pair_is_exact() {
        assert!(matches_pair("RWY -> PAPI", "RWY", "PAPI"));
        assert!(!matches_pair("RWY -> PAPIX", "RWY", "PAPI"));
        assert!(!matches_pair("XRWY -> PAPI", "RWY", "PAPI"));
        assert!(!matches_pair("PAPI -> RWY", "RWY", "PAPI"));
    }

    #[test]
    fn test_build_row_appends_matching_transition() {
        let aois = aois();
        let builder = RowBuilder::new(&aois, AoiMatch::AnyCell);
        let (row, contribution) = builder.build_row(&participant(), "RWY", &HeaderState::new());

        assert_eq!(
            row.cells(),
            vec![
                "P1", "RWY", "12", "0.1",
                "RWY -> RWY", "3", "0.30", "0.00",
                "RWY -> PAPI", "4", "0.50", "0.40",
            ]
        );

        let contribution = contribution.unwrap();
        assert_eq!(
            contribution.metrics,
            vec!["aoi_AOI", "aoi_Total_Number_of_Fixations", "aoi_StDev_of_durations"]
        );
        assert_eq!(contribution.transition_targets, aois);
    }

    #[test]
    fn test_missing_aoi_returns_participant_only() {
        let aois = vec!["ASI".to_string()];
        let builder = RowBuilder::new(&aois, AoiMatch::AnyCell);
        let (row, contribution) = builder.build_row(&participant(), "ASI", &HeaderState::new());

        assert!(!row.is_matched());
        assert_eq!(row.cells(), vec!["P1"]);
        assert!(contribution.is_none());
    }

    #[test]
    fn test_no_contribution_once_finalized() {
        let aois = aois();
        let builder = RowBuilder::new(&aois, AoiMatch::AnyCell);
        let mut state = HeaderState::new();

        let (_, first) = builder.build_row(&participant(), "RWY", &state);
        state.contribute(first.unwrap());

        let (row, second) = builder.build_row(&participant(), "PAPI", &state);
        assert!(row.is_matched());
        assert!(second.is_none());
    }

    #[test]
    fn test_duplicate_transitions_are_kept() {
        let mut tables = participant();
        tables.transitions.push_row(vec![
            "RWY -> PAPI".into(),
            "5".into(),
            "0.6".into(),
            "0.5".into(),
        ]);
        let aois = aois();
        let builder = RowBuilder::new(&aois, AoiMatch::AnyCell);
        let (row, _) = builder.build_row(&tables, "RWY", &HeaderState::new());

        let papi = row.transitions.iter().find(|s| s.target == "PAPI").unwrap();
        assert_eq!(papi.records.len(), 2);
        assert_eq!(row.cells().len(), 4 + 3 * 4);
    }

    #[test]
    fn test_any_cell_can_match_header_row() {
        let aois = vec!["AOI".to_string()];
        let tables = participant();

        let loose = RowBuilder::new(&aois, AoiMatch::AnyCell);
        let (row, _) = loose.build_row(&tables, "AOI", &HeaderState::new());
        assert!(row.is_matched());

        let strict = RowBuilder::new(&aois, AoiMatch::AoiColumn);
        let (row, _) = strict.build_row(&tables, "AOI", &HeaderState::new());
        assert!(!row.is_matched());
    }

    #[test]
    fn test_aoi_column_ignores_other_columns() {
        let tables = ParticipantTables::new(
            "P2",
            rows(&[&["AOI", "note"], &["ASI", "RWY"], &["RWY", "x"]]),
            Table::new(),
        );
        let aois = vec!["RWY".to_string()];

        let loose = RowBuilder::new(&aois, AoiMatch::AnyCell);
        let (row, _) = loose.build_row(&tables, "RWY", &HeaderState::new());
        assert_eq!(row.metrics.unwrap(), vec!["ASI", "RWY"]);

        let strict = RowBuilder::new(&aois, AoiMatch::AoiColumn);
        let (row, _) = strict.build_row(&tables, "RWY", &HeaderState::new());
        assert_eq!(row.metrics.unwrap(), vec!["RWY", "x"]);
    }

    #[test]
    fn test_layout_pads_missing_segments() {
        let aois = aois();
        let builder = RowBuilder::new(&aois, AoiMatch::AnyCell);
        let mut state = HeaderState::new();
        let tables = participant();

        let (_, contribution) = builder.build_row(&tables, "RWY", &state);
        state.contribute(contribution.unwrap());

        // PAPI -> PAPI is absent, PAPI -> RWY present
        let (row, _) = builder.build_row(&tables, "PAPI", &state);
        let layout = row.layout(state.set());
        assert_eq!(layout.dropped, 0);
        assert_eq!(
            layout.cells,
            vec![
                "P1", "PAPI", "4", "0.2",
                "PAPI -> RWY", "1", "0.10", "0.20",
                "", "", "", "",
            ]
        );
    }

    #[test]
    fn test_layout_of_unmatched_row_is_blank() {
        let mut state = HeaderState::new();
        state.contribute(HeaderContribution {
            metrics: vec!["aoi_AOI".into(), "aoi_n".into()],
            transition_targets: vec!["RWY".into()],
        });
        let row = OutputRow::new(&ParticipantTables::new("P9", Table::new(), Table::new()));

        let layout = row.layout(state.set());
        assert_eq!(layout.cells, vec!["P9", "", "", "", "", "", ""]);
        assert_eq!(layout.cells.len(), state.set().width());
    }

    #[test]
    fn test_layout_drops_surplus_cells() {
        let mut state = HeaderState::new();
        state.contribute(HeaderContribution {
            metrics: vec!["aoi_AOI".into()],
            transition_targets: vec!["RWY".into()],
        });
        let record = TransitionRecord::from_row(&["RWY -> RWY".to_string()]);
        let row = OutputRow {
            participant: "P1".into(),
            pilot: vec![],
            metrics: Some(vec!["RWY".into(), "extra".into()]),
            transitions: vec![TransitionSegment {
                target: "RWY".into(),
                records: vec![record.clone(), record],
            }],
        };

        let layout = row.layout(state.set());
        assert_eq!(layout.cells, vec!["P1", "RWY", "RWY -> RWY", "", "", ""]);
        assert_eq!(layout.dropped, 1 + 4);
    }
}
