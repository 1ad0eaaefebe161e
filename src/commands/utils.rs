use anyhow::{Context, Result};
use std::path::PathBuf;
use crate::output::ensure_rectangular;
use crate::table::{read_table, Table};
use crate::utils::config::{PID_COLUMN, REPORT_VERSION};

/// Validate a compiled CSV file: a header row and equally wide data rows
pub fn validate_output_file(file_path: PathBuf) -> Result<Table> {
    println!("Validating table: {}", file_path.display());

    let table = read_table(&file_path)
        .with_context(|| format!("Failed to read {}", file_path.display()))?;

    if table.is_empty() {
        anyhow::bail!("{} is empty", file_path.display());
    }

    ensure_rectangular(&table, &file_path)?;

    println!("✓ Valid compiled table");
    println!("  Columns: {}", table.width());
    println!("  Data rows: {}", table.data_rows().len());
    if table.header().and_then(|h| h.first()).map(String::as_str) != Some(PID_COLUMN) {
        println!("  Note: first column is not \"{}\"", PID_COLUMN);
    }

    Ok(table)
}

/// Display version information
pub fn display_version() {
    println!("Pilot AOI Compiler v{}", env!("CARGO_PKG_VERSION"));
    println!("Run Report Schema: v{}", REPORT_VERSION);
    println!();
    println!("Compiles per-participant AOI gaze metrics into per-AOI and combined tables.");
}
