//! Pilot AOI Compiler CLI
//!
//! Compiles per-participant AOI gaze metrics and transitions into
//! one CSV per AOI and one combined CSV.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use pilot_aoi_compiler::aggregator::AoiMatch;
use pilot_aoi_compiler::commands::{
    display_version, execute_compile, execute_concat, validate_args, validate_output_file,
    CompileArgs, ConcatArgs,
};
use pilot_aoi_compiler::input::ParticipantLayout;
use pilot_aoi_compiler::utils::config::{load_config, RunConfig};

/// Pilot AOI Compiler - per-AOI and combined gaze metric tables
#[derive(Parser, Debug)]
#[command(name = "aoi-compiler")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile per-AOI and combined tables
    Compile {
        /// TOML run configuration (CLI options override it)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Folder holding one sub-folder per participant
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Folder for the compiled CSV files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Participant IDs, in output order (comma separated or repeated)
        #[arg(short, long = "participant", value_delimiter = ',')]
        participants: Vec<String>,

        /// AOI names, in output order (comma separated or repeated)
        #[arg(short, long = "aoi", value_delimiter = ',')]
        aois: Vec<String>,

        /// Participant folder naming convention
        #[arg(long, value_enum)]
        layout: Option<ParticipantLayout>,

        /// How a participant's DGM row is located
        #[arg(long = "match", value_enum)]
        aoi_match: Option<AoiMatch>,

        /// Master pilot table to prefix rows with
        #[arg(long)]
        pilot_table: Option<PathBuf>,

        /// Number of leading pilot table columns to copy
        #[arg(long)]
        pilot_columns: Option<usize>,

        /// Output path for the JSON run report
        #[arg(long)]
        report: Option<PathBuf>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Combine CSV files from a directory into one table
    Concat {
        /// Directory with CSV files to combine
        #[arg(short, long)]
        input: PathBuf,

        /// File to save the combined table to
        #[arg(short, long)]
        output: PathBuf,

        /// Glob matched against file names
        #[arg(long, default_value = "*.csv")]
        include: String,

        /// Skip files whose path contains this text
        #[arg(long)]
        exclude: Option<String>,

        /// Include sub-directories
        #[arg(short, long)]
        recursive: bool,

        /// Prepend a PID column taken from the file name
        #[arg(long)]
        add_pid: bool,
    },

    /// Validate a compiled CSV file
    Validate {
        /// Path to the compiled CSV file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Compile {
            config,
            input,
            output,
            participants,
            aois,
            layout,
            aoi_match,
            pilot_table,
            pilot_columns,
            report,
            summary,
        } => {
            let base = match config {
                Some(path) => load_config(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => RunConfig::default(),
            };

            let overrides = RunConfig {
                input_dir: input,
                output_dir: output,
                participants,
                aois,
                layout,
                aoi_match,
                pilot_table,
                pilot_columns,
            };

            let args = CompileArgs {
                report,
                print_summary: summary,
                ..CompileArgs::from_config(base.merged_with(overrides))?
            };

            // Validate args first
            validate_args(&args)?;

            execute_compile(args)?;
        }

        Commands::Concat {
            input,
            output,
            include,
            exclude,
            recursive,
            add_pid,
        } => {
            execute_concat(ConcatArgs {
                input_dir: input,
                output,
                include,
                exclude,
                recursive,
                add_pid,
            })?;
        }

        Commands::Validate { file } => {
            validate_output_file(file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
