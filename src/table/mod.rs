//! Tabular data loaded from, and written to, CSV files.

pub mod grid;
pub mod reader;

// Re-export main types and functions
pub use grid::Table;
pub use reader::{read_table, read_table_from};
