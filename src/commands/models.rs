use crate::aggregator::AoiMatch;
use crate::input::ParticipantLayout;
use crate::utils::config::RunConfig;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Arguments for the compile command
///
/// **Public** - used by main.rs to construct from CLI args and config
#[derive(Debug, Clone)]
pub struct CompileArgs {
    /// Folder holding one sub-folder per participant
    pub input_dir: PathBuf,

    /// Folder the compiled CSV files are written to
    pub output_dir: PathBuf,

    /// Participant IDs, in output order
    pub participants: Vec<String>,

    /// AOI names, in output order
    pub aois: Vec<String>,

    /// Participant folder naming convention
    pub layout: ParticipantLayout,

    /// How a participant's DGM row is located
    pub aoi_match: AoiMatch,

    /// Optional master pilot table
    pub pilot_table: Option<PathBuf>,

    /// Leading pilot table columns to copy
    pub pilot_columns: usize,

    /// Output path for the JSON run report (optional)
    pub report: Option<PathBuf>,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for CompileArgs {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("Data"),
            output_dir: PathBuf::from("Data/Output"),
            participants: Vec::new(),
            aois: Vec::new(),
            layout: ParticipantLayout::default(),
            aoi_match: AoiMatch::default(),
            pilot_table: None,
            pilot_columns: 0,
            report: None,
            print_summary: false,
        }
    }
}

impl CompileArgs {
    /// Build arguments from a merged run configuration
    pub fn from_config(config: RunConfig) -> Result<Self> {
        Ok(Self {
            input_dir: config
                .input_dir
                .context("No input directory given (--input or input_dir)")?,
            output_dir: config
                .output_dir
                .context("No output directory given (--output or output_dir)")?,
            participants: config.participants,
            aois: config.aois,
            layout: config.layout.unwrap_or_default(),
            aoi_match: config.aoi_match.unwrap_or_default(),
            pilot_table: config.pilot_table,
            pilot_columns: config.pilot_columns.unwrap_or(0),
            report: None,
            print_summary: false,
        })
    }
}

/// Arguments for the concat command
#[derive(Debug, Clone)]
pub struct ConcatArgs {
    /// Directory with CSV files to combine
    pub input_dir: PathBuf,

    /// File to save the combined table to
    pub output: PathBuf,

    /// Glob matched against file names
    pub include: String,

    /// Skip files whose path contains this text
    pub exclude: Option<String>,

    /// Descend into sub-directories
    pub recursive: bool,

    /// Prepend a PID column taken from the file name
    pub add_pid: bool,
}

impl Default for ConcatArgs {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output: PathBuf::from("combined.csv"),
            include: "*.csv".to_string(),
            exclude: None,
            recursive: false,
            add_pid: false,
        }
    }
}
