//! Pilot AOI Compiler
//!
//! Aggregates per-participant, per-AOI eye-tracking metrics (DGM files) and
//! AOI transition files into one table per AOI plus one combined table.
//!
//! This crate provides the core implementation for the
//! `aoi-compiler` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! aoi-compiler compile --config run.toml
//! aoi-compiler --help
//! ```

pub mod aggregator;
pub mod commands;
pub mod input;
pub mod naming;
pub mod output;
pub mod table;
pub mod utils;
