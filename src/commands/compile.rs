//! Compile command implementation.
//!
//! The compile command:
//! 1. Loads every participant's DGM and transition tables
//! 2. Prepares the output directory
//! 3. Builds and writes the per-AOI and combined tables
//! 4. Writes the run report (if requested)

use super::models::CompileArgs;
use crate::aggregator::{Aggregator, Compilation, HeaderState, RowBuilder};
use crate::input::{load_participants, DirectorySource, PilotTable};
use crate::naming::aoi_token;
use crate::output::{write_report, CsvDirectorySink, FailedFile, RunReport};
use crate::utils::config::REPORT_VERSION;
use anyhow::{Context, Result};
use log::{debug, info};
use std::collections::HashSet;
use std::time::Instant;

/// Execute the compile command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Unreadable pilot table
/// * Output directory cannot be created
/// * Any output file could not be written (reported after all others are written)
///
/// # Example
/// ```ignore
/// let args = CompileArgs {
///     input_dir: PathBuf::from("Data/Results"),
///     output_dir: PathBuf::from("Data/Output"),
///     participants: vec!["p1".into(), "p2".into()],
///     aois: vec!["Windshield".into(), "ASI".into()],
///     ..Default::default()
/// };
///
/// execute_compile(args)?;
/// ```
pub fn execute_compile(args: CompileArgs) -> Result<Compilation> {
    let start_time = Instant::now();

    info!(
        "Compiling {} AOIs for {} participants",
        args.aois.len(),
        args.participants.len()
    );
    info!("Input directory: {}", args.input_dir.display());

    // Step 1: Load inputs
    info!("Step 1/4: Loading participant tables...");
    let pilot = match &args.pilot_table {
        Some(path) => Some(
            PilotTable::load(path, args.pilot_columns)
                .with_context(|| format!("Failed to read pilot table {}", path.display()))?,
        ),
        None => None,
    };
    let source = DirectorySource::new(&args.input_dir, args.layout);
    let participants = load_participants(&source, &args.participants, pilot.as_ref());

    debug!(
        "{} participants have a DGM table",
        participants.iter().filter(|p| !p.dgm.is_empty()).count()
    );

    // Step 2: Output directory
    info!("Step 2/4: Preparing {}...", args.output_dir.display());
    let mut sink = CsvDirectorySink::create(&args.output_dir)
        .context("Failed to create output directory")?;

    // Step 3: Compile and write tables
    info!("Step 3/4: Compiling tables...");
    let headers = pilot
        .as_ref()
        .map(|p| HeaderState::with_pilot(p.headers()))
        .unwrap_or_default();
    let aggregator = Aggregator::new(RowBuilder::new(&args.aois, args.aoi_match), headers);
    let compilation = aggregator.run(&participants, &mut sink);

    // Step 4: Report
    if let Some(report_path) = &args.report {
        info!("Step 4/4: Writing run report...");
        write_report(&build_report(&args, &compilation), report_path)
            .context("Failed to write run report")?;
        info!("✓ Report written to: {}", report_path.display());
    } else {
        info!("Step 4/4: Skipping run report (not requested)");
    }

    if args.print_summary {
        println!("{}", render_summary(&compilation));
    }

    if !compilation.is_complete() {
        let failed: Vec<String> = compilation
            .failures
            .iter()
            .map(|e| match e.path() {
                Some(path) => path.display().to_string(),
                None => e.to_string(),
            })
            .collect();
        anyhow::bail!(
            "Failed to write {} output file(s): {}. Close any program holding them open and re-run.",
            failed.len(),
            failed.join(", ")
        );
    }

    info!(
        "Compilation completed in {:.2}s ({} files)",
        start_time.elapsed().as_secs_f64(),
        compilation.written.len()
    );

    Ok(compilation)
}

/// Validate compile arguments
///
/// **Public** - can be called before execute_compile for early validation
pub fn validate_args(args: &CompileArgs) -> Result<()> {
    if !args.input_dir.is_dir() {
        anyhow::bail!(
            "Input directory does not exist: {}",
            args.input_dir.display()
        );
    }

    if args.output_dir.as_os_str().is_empty() {
        anyhow::bail!("Output directory cannot be empty");
    }

    if args.output_dir.is_file() {
        anyhow::bail!(
            "Output directory is a file: {}",
            args.output_dir.display()
        );
    }

    if args.participants.is_empty() {
        anyhow::bail!("At least one participant ID is required");
    }

    if args.aois.is_empty() {
        anyhow::bail!("At least one AOI name is required");
    }

    check_unique("participant ID", args.participants.iter().cloned())?;
    check_unique("AOI name", args.aois.iter().cloned())?;
    // per-AOI files and header tokens must not collide
    check_unique("AOI token", args.aois.iter().map(|a| aoi_token(a)))?;

    match &args.pilot_table {
        Some(path) => {
            if !path.is_file() {
                anyhow::bail!("Pilot table does not exist: {}", path.display());
            }
            if args.pilot_columns == 0 {
                anyhow::bail!("pilot_columns must be greater than 0 when a pilot table is given");
            }
        }
        None if args.pilot_columns > 0 => {
            anyhow::bail!("pilot_columns is set but no pilot table is given");
        }
        None => {}
    }

    Ok(())
}

fn check_unique(what: &str, values: impl Iterator<Item = String>) -> Result<()> {
    let mut seen = HashSet::new();
    for value in values {
        if value.trim().is_empty() {
            anyhow::bail!("Empty {what}");
        }
        if !seen.insert(value.clone()) {
            anyhow::bail!("Duplicate {what}: {value}");
        }
    }
    Ok(())
}

/// Build the JSON run report for a finished compilation
pub fn build_report(args: &CompileArgs, compilation: &Compilation) -> RunReport {
    RunReport {
        version: REPORT_VERSION.to_string(),
        generated_at: chrono::Utc::now().to_rfc3339(),
        input_dir: args.input_dir.clone(),
        output_dir: args.output_dir.clone(),
        participants: args.participants.clone(),
        aois: args.aois.clone(),
        columns: compilation.headers.header_row(),
        rows: compilation.stats.rows,
        matched_rows: compilation.stats.matched_rows,
        missing: compilation.stats.missing.clone(),
        dropped_cells: compilation.stats.dropped_cells,
        written_files: compilation.written.clone(),
        failed_files: compilation
            .failures
            .iter()
            .map(|e| FailedFile {
                path: e.path().map(|p| p.to_path_buf()),
                error: e.to_string(),
            })
            .collect(),
    }
}

/// Text summary of a compilation
pub fn render_summary(compilation: &Compilation) -> String {
    let mut out = String::new();
    let rule = "=".repeat(80);

    out.push_str(&format!("\n{rule}\nCOMPILE SUMMARY\n{rule}\n"));
    out.push_str(&format!(
        "Participants: {}\nAOIs:         {}\nColumns:      {}\nRows:         {} ({} matched)\n\n",
        compilation.stats.participants,
        compilation.stats.aois,
        compilation.headers.width(),
        compilation.stats.rows,
        compilation.stats.matched_rows,
    ));

    for table in &compilation.per_aoi {
        out.push_str(&format!(
            "  {:<24} {:>4}/{:<4} {}\n",
            table.aoi,
            table.matched,
            compilation.stats.participants,
            table.file_name
        ));
    }

    if !compilation.stats.missing.is_empty() {
        out.push_str("\nMissing AOI rows:\n");
        for pair in &compilation.stats.missing {
            out.push_str(&format!("  {} / {}\n", pair.participant, pair.aoi));
        }
    }

    if compilation.stats.dropped_cells > 0 {
        out.push_str(&format!(
            "\nDropped cells (did not fit header): {}\n",
            compilation.stats.dropped_cells
        ));
    }

    out.push_str(&rule);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_args(dir: &std::path::Path) -> CompileArgs {
        CompileArgs {
            input_dir: dir.to_path_buf(),
            output_dir: dir.join("Output"),
            participants: vec!["p1".into(), "p2".into()],
            aois: vec!["RWY".into(), "PAPI".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_args_valid() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_args(&valid_args(dir.path())).is_ok());
    }

    #[test]
    fn test_validate_args_missing_input_dir() {
        let dir = tempfile::tempdir().unwrap();
        let args = CompileArgs {
            input_dir: dir.path().join("nope"),
            ..valid_args(dir.path())
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_no_participants() {
        let dir = tempfile::tempdir().unwrap();
        let args = CompileArgs {
            participants: vec![],
            ..valid_args(dir.path())
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_no_aois() {
        let dir = tempfile::tempdir().unwrap();
        let args = CompileArgs {
            aois: vec![],
            ..valid_args(dir.path())
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_duplicate_participant() {
        let dir = tempfile::tempdir().unwrap();
        let args = CompileArgs {
            participants: vec!["p1".into(), "p1".into()],
            ..valid_args(dir.path())
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_colliding_aoi_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let args = CompileArgs {
            aois: vec!["Alt VSI".into(), "alt_vsi".into()],
            ..valid_args(dir.path())
        };
        let err = validate_args(&args).unwrap_err();
        assert!(err.to_string().contains("AOI token"));
    }

    #[test]
    fn test_validate_args_blank_aoi() {
        let dir = tempfile::tempdir().unwrap();
        let args = CompileArgs {
            aois: vec!["RWY".into(), "  ".into()],
            ..valid_args(dir.path())
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_pilot_columns_without_table() {
        let dir = tempfile::tempdir().unwrap();
        let args = CompileArgs {
            pilot_columns: 4,
            ..valid_args(dir.path())
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_pilot_table_needs_columns() {
        let dir = tempfile::tempdir().unwrap();
        let pilot = dir.path().join("pilots.csv");
        std::fs::write(&pilot, "id\np1\n").unwrap();
        let args = CompileArgs {
            pilot_table: Some(pilot),
            ..valid_args(dir.path())
        };
        assert!(validate_args(&args).is_err());
    }
}
