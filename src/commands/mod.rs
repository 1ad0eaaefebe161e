//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod compile;
pub mod concat;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use compile::{build_report, execute_compile, render_summary, validate_args};
pub use concat::{concat_tables, execute_concat, validate_concat_args};
pub use models::{CompileArgs, ConcatArgs};
pub use utils::{display_version, validate_output_file};
