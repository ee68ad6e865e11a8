//! Output writers for classifier results.
//!
//! The only format is JSON: category name → counter name → value for line
//! aggregates, and a flat counter object for time summaries.

pub mod json;

// Re-export main functions
pub use json::{aggregate_to_string, read_aggregate, read_time_summary, write_aggregate};
