//! Concat command implementation.
//!
//! Stacks many CSV files with headers into one table. Columns are aligned by
//! header label; a file lacking a column leaves its cells empty.

use super::models::ConcatArgs;
use crate::output::write_table;
use crate::table::{read_table, Table};
use anyhow::{Context, Result};
use glob::Pattern;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Label of the participant column added by `--add-pid`
pub const PID_LABEL: &str = "PID";

/// Execute the concat command
///
/// Returns the combined table that was written.
pub fn execute_concat(args: ConcatArgs) -> Result<Table> {
    validate_concat_args(&args)?;

    let inputs = find_inputs(&args)?;
    if inputs.is_empty() {
        anyhow::bail!("No files matched \"{}\" in {}", args.include, args.input_dir.display());
    }
    info!("{} files found", inputs.len());

    let mut tables = Vec::with_capacity(inputs.len());
    for path in &inputs {
        match read_table(path) {
            Ok(table) if table.is_empty() => debug!("Skipping empty file {}", path.display()),
            Ok(table) => tables.push((pid_from_path(path), table)),
            Err(e) => warn!("Skipping {e}"),
        }
    }

    let combined = concat_tables(&tables, args.add_pid);
    write_table(&combined, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    info!(
        "✓ Combined {} files ({} rows) into {}",
        tables.len(),
        combined.data_rows().len(),
        args.output.display()
    );

    Ok(combined)
}

/// Validate concat arguments
pub fn validate_concat_args(args: &ConcatArgs) -> Result<()> {
    if !args.input_dir.is_dir() {
        anyhow::bail!("Input directory does not exist: {}", args.input_dir.display());
    }
    if !args.include.contains("csv") {
        anyhow::bail!("Include pattern \"{}\" does not look for csv files", args.include);
    }
    Pattern::new(&args.include)
        .with_context(|| format!("Invalid include pattern \"{}\"", args.include))?;
    Ok(())
}

/// CSV files under the input directory matching the include/exclude filters
///
/// Sorted by path; the output file itself is never included.
pub fn find_inputs(args: &ConcatArgs) -> Result<Vec<PathBuf>> {
    let pattern = Pattern::new(&args.include)
        .with_context(|| format!("Invalid include pattern \"{}\"", args.include))?;
    let output = args.output.canonicalize().ok();
    let max_depth = if args.recursive { usize::MAX } else { 1 };

    let mut files: Vec<PathBuf> = WalkDir::new(&args.input_dir)
        .min_depth(1)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| pattern.matches(name))
        })
        .map(|entry| entry.into_path())
        .filter(|path| match &args.exclude {
            Some(exclude) if !exclude.is_empty() => !path.to_string_lossy().contains(exclude.as_str()),
            _ => true,
        })
        .filter(|path| output.is_none() || path.canonicalize().ok() != output)
        .collect();

    files.sort();
    Ok(files)
}

/// Participant ID encoded in a file name: the text before the first `_`
pub fn pid_from_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.split('_').next())
        .unwrap_or_default()
        .to_string()
}

/// Stack `(pid, table)` pairs into one table
///
/// Columns are the union of all headers in first-seen order. With `add_pid`
/// a `PID` column comes first (replacing any the files carry); whenever a
/// `PID` column exists rows are sorted by it, keeping file order for ties.
pub fn concat_tables(tables: &[(String, Table)], add_pid: bool) -> Table {
    let mut columns: Vec<String> = Vec::new();
    if add_pid {
        columns.push(PID_LABEL.to_string());
    }
    for (_, table) in tables {
        for label in table.header().unwrap_or(&[]) {
            if !columns.contains(label) {
                columns.push(label.clone());
            }
        }
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (pid, table) in tables {
        let header = table.header().unwrap_or(&[]);
        if add_pid && header.iter().any(|h| h == PID_LABEL) {
            warn!("File for {pid} already has a {PID_LABEL} column; using the file name");
        }

        for data in table.data_rows() {
            let row = columns
                .iter()
                .map(|column| {
                    if add_pid && column == PID_LABEL {
                        return pid.clone();
                    }
                    header
                        .iter()
                        .position(|h| h == column)
                        .and_then(|i| data.get(i))
                        .cloned()
                        .unwrap_or_default()
                })
                .collect();
            rows.push(row);
        }
    }

    if let Some(pid_column) = columns.iter().position(|c| c == PID_LABEL) {
        rows.sort_by(|a, b| a[pid_column].cmp(&b[pid_column]));
    }

    Table::from_rows(rows).with_header(columns)
}
