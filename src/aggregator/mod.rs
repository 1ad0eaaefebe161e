//! Join/aggregation engine.
//!
//! This module turns per-participant DGM and transition tables into:
//! - One table per AOI (one row per participant)
//! - One combined table (one row per AOI and participant)
//! - A single header shared by every table

pub mod compiler;
pub mod header;
pub mod row_builder;

// Re-export main types and functions
pub use compiler::{Aggregator, AoiTable, Compilation, CompileStats};
pub use header::{HeaderContribution, HeaderSet, HeaderState};
pub use row_builder::{
    matches_pair, parse_pair_label, AoiMatch, OutputRow, RowBuilder, RowLayout, TransitionRecord,
    TransitionSegment,
};
