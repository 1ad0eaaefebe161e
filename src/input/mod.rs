//! Input tables: per-participant results and the optional pilot table.

pub mod participant;
pub mod pilot;

pub use participant::{
    DirectorySource, MemorySource, ParticipantLayout, ParticipantSource, ParticipantTables,
};
pub use pilot::PilotTable;

use log::debug;

/// Load every participant once, in configured order
///
/// When a pilot table is given, each participant's leading pilot cells are
/// attached by position.
pub fn load_participants(
    source: &dyn ParticipantSource,
    participants: &[String],
    pilot: Option<&PilotTable>,
) -> Vec<ParticipantTables> {
    debug!("Loading {} participants", participants.len());

    participants
        .iter()
        .enumerate()
        .map(|(index, id)| {
            let mut tables = source.load(id);
            if let Some(pilot) = pilot {
                tables.pilot = pilot.cells_for(index, id);
            }
            tables
        })
        .collect()
}
