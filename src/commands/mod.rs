//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod loc;
pub mod models;
pub mod time;
pub mod utils;

// Re-export main command functions
pub use loc::{execute_loc, validate_args};
pub use models::{LocArgs, RulesArgs, TimeArgs};
pub use time::execute_time;
pub use utils::{display_rules, display_version, validate_table_file};
