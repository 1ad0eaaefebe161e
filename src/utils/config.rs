//! Configuration and constants for the compiler.

use crate::aggregator::AoiMatch;
use crate::input::ParticipantLayout;
use crate::utils::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Current run report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// First column of every output table
pub const PID_COLUMN: &str = "pid";

/// Generic header segment standing in for the concrete AOI token
pub const AOI_PLACEHOLDER: &str = "aoi";

/// Separator inside transition pair labels ("RWY -> PAPI")
pub const TRANSITION_SEPARATOR: &str = "->";

/// DGM column holding the AOI name (used by `AoiMatch::AoiColumn`)
pub const DGM_AOI_COLUMN: &str = "AOI";

// Per-participant input file suffixes
pub const DGM_FILE_SUFFIX: &str = "_AOI_DGMs.csv";
pub const TRANSITION_FILE_SUFFIX: &str = "_AOI_Transitions.csv";

// Output file naming
pub const OUTPUT_FILE_PREFIX: &str = "AOI_";
pub const OUTPUT_FILE_SUFFIX: &str = "_Pilot_Data.csv";
pub const COMBINED_FILE_NAME: &str = "AOI_Combined_Pilot_Data.csv";

/// Run configuration, usually loaded from a TOML file
///
/// Every field can also be supplied on the command line, which wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Folder holding one sub-folder per participant
    #[serde(default)]
    pub input_dir: Option<PathBuf>,

    /// Folder the compiled tables are written to
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Participant IDs, in output order
    #[serde(default)]
    pub participants: Vec<String>,

    /// AOI names, in output order
    #[serde(default)]
    pub aois: Vec<String>,

    /// Participant folder naming convention
    #[serde(default)]
    pub layout: Option<ParticipantLayout>,

    /// How a participant's DGM row is located
    #[serde(default)]
    pub aoi_match: Option<AoiMatch>,

    /// Optional master pilot table
    #[serde(default)]
    pub pilot_table: Option<PathBuf>,

    /// Number of leading pilot table columns to copy
    #[serde(default)]
    pub pilot_columns: Option<usize>,
}

impl RunConfig {
    /// Overlay `overrides` on top of this config
    ///
    /// Set options and non-empty lists in `overrides` win.
    pub fn merged_with(self, overrides: RunConfig) -> RunConfig {
        fn pick_list(base: Vec<String>, over: Vec<String>) -> Vec<String> {
            if over.is_empty() {
                base
            } else {
                over
            }
        }

        RunConfig {
            input_dir: overrides.input_dir.or(self.input_dir),
            output_dir: overrides.output_dir.or(self.output_dir),
            participants: pick_list(self.participants, overrides.participants),
            aois: pick_list(self.aois, overrides.aois),
            layout: overrides.layout.or(self.layout),
            aoi_match: overrides.aoi_match.or(self.aoi_match),
            pilot_table: overrides.pilot_table.or(self.pilot_table),
            pilot_columns: overrides.pilot_columns.or(self.pilot_columns),
        }
    }
}

/// Load a run configuration from a TOML file
///
/// # Example
/// ```ignore
/// let config = load_config("run.toml")?;
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<RunConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&contents)
}

/// Parse a run configuration from TOML text
pub fn parse_config(contents: &str) -> Result<RunConfig, ConfigError> {
    let config: RunConfig = toml::from_str(contents)?;

    if config.pilot_columns.is_some() && config.pilot_table.is_none() {
        return Err(ConfigError::Invalid(
            "pilot_columns is set but pilot_table is missing".to_string(),
        ));
    }

    Ok(config)
}
