//! Per-participant input files.
//!
//! Each participant owns a DGM table (header row + one row per AOI) and a
//! transition table (one row per AOI pair, no header). A file that is
//! missing or unreadable is logged and treated as an empty table.

use crate::table::{read_table, Table};
use crate::utils::config::{DGM_FILE_SUFFIX, TRANSITION_FILE_SUFFIX};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Folder naming convention for participant results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ParticipantLayout {
    /// `<root>/<pid>/<pid>_AOI_DGMs.csv`
    #[default]
    Flat,
    /// `<root>/<pid>_approach/<pid>_approach_AOI_DGMs.csv`
    Approach,
}

impl ParticipantLayout {
    /// Stem shared by the participant's folder and file names
    fn stem(&self, participant: &str) -> String {
        match self {
            ParticipantLayout::Flat => participant.to_string(),
            ParticipantLayout::Approach => format!("{participant}_approach"),
        }
    }

    pub fn dgm_path(&self, root: &Path, participant: &str) -> PathBuf {
        let stem = self.stem(participant);
        root.join(&stem).join(format!("{stem}{DGM_FILE_SUFFIX}"))
    }

    pub fn transition_path(&self, root: &Path, participant: &str) -> PathBuf {
        let stem = self.stem(participant);
        root.join(&stem).join(format!("{stem}{TRANSITION_FILE_SUFFIX}"))
    }
}

/// Everything the row builder needs for one participant
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantTables {
    /// Participant key, first output column
    pub id: String,

    /// Dwell/gaze metrics, one row per AOI
    pub dgm: Table,

    /// Transition records (`"<from> -> <to>"`, count, proportions)
    pub transitions: Table,

    /// Leading cells copied from the pilot table (empty when unused)
    pub pilot: Vec<String>,
}

impl ParticipantTables {
    pub fn new(id: impl Into<String>, dgm: Table, transitions: Table) -> Self {
        Self {
            id: id.into(),
            dgm,
            transitions,
            pilot: Vec::new(),
        }
    }
}

/// Supplies a participant's tables
///
/// Loading never fails: unavailable inputs degrade to empty tables.
pub trait ParticipantSource {
    fn load(&self, participant: &str) -> ParticipantTables;
}

/// Reads participant tables from a results directory
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    layout: ParticipantLayout,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>, layout: ParticipantLayout) -> Self {
        Self {
            root: root.into(),
            layout,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn load_or_empty(&self, participant: &str, path: &Path) -> Table {
        match read_table(path) {
            Ok(table) => table,
            Err(e) => {
                warn!("Participant {participant}: {e}; treating as empty");
                Table::new()
            }
        }
    }
}

impl ParticipantSource for DirectorySource {
    fn load(&self, participant: &str) -> ParticipantTables {
        let dgm_path = self.layout.dgm_path(&self.root, participant);
        let transition_path = self.layout.transition_path(&self.root, participant);
        debug!(
            "Loading participant {} from {}",
            participant,
            dgm_path.parent().unwrap_or(&self.root).display()
        );

        ParticipantTables::new(
            participant,
            self.load_or_empty(participant, &dgm_path),
            self.load_or_empty(participant, &transition_path),
        )
    }
}

/// Participant tables held in memory, keyed by participant ID
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: HashMap<String, (Table, Table)>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a participant's DGM and transition tables
    pub fn with(mut self, participant: &str, dgm: Table, transitions: Table) -> Self {
        self.tables
            .insert(participant.to_string(), (dgm, transitions));
        self
    }
}

impl ParticipantSource for MemorySource {
    fn load(&self, participant: &str) -> ParticipantTables {
        let (dgm, transitions) = self.tables.get(participant).cloned().unwrap_or_default();
        ParticipantTables::new(participant, dgm, transitions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_flat_layout_paths() {
        let root = Path::new("/data");
        let layout = ParticipantLayout::Flat;
        assert_eq!(
            layout.dgm_path(root, "p7"),
            PathBuf::from("/data/p7/p7_AOI_DGMs.csv")
        );
        assert_eq!(
            layout.transition_path(root, "p7"),
            PathBuf::from("/data/p7/p7_AOI_Transitions.csv")
        );
    }

    #[test]
    fn test_approach_layout_paths() {
        let root = Path::new("/data");
        let layout = ParticipantLayout::Approach;
        assert_eq!(
            layout.dgm_path(root, "p7"),
            PathBuf::from("/data/p7_approach/p7_approach_AOI_DGMs.csv")
        );
        assert_eq!(
            layout.transition_path(root, "p7"),
            PathBuf::from("/data/p7_approach/p7_approach_AOI_Transitions.csv")
        );
    }

    #[test]
    fn test_directory_source_missing_files_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectorySource::new(dir.path(), ParticipantLayout::Flat);

        let tables = source.load("p1");
        assert_eq!(tables.id, "p1");
        assert!(tables.dgm.is_empty());
        assert!(tables.transitions.is_empty());
    }

    #[test]
    fn test_directory_source_reads_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("p1");
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join("p1_AOI_DGMs.csv"), "AOI,count\nRWY,3\n").unwrap();
        fs::write(folder.join("p1_AOI_Transitions.csv"), "RWY -> RWY,1,1.0,0.0\n").unwrap();

        let tables = DirectorySource::new(dir.path(), ParticipantLayout::Flat).load("p1");
        assert_eq!(tables.dgm.len(), 2);
        assert_eq!(tables.transitions.len(), 1);
    }

    #[test]
    fn test_memory_source_unknown_participant() {
        let source = MemorySource::new();
        let tables = source.load("ghost");
        assert_eq!(tables.id, "ghost");
        assert!(tables.dgm.is_empty());
    }
}
