//! Report readers and the input data model.
//!
//! This module handles:
//! - Parsing and validating the pipe-delimited line-count table
//! - Parsing the verifier's JSON time report
//! - Defining the record types both readers produce

pub mod schema;
pub mod table;
pub mod time_report;

// Re-export main types
pub use schema::{Column, FileRecord, FunctionTime, ModuleTime, TimeReport};
pub use table::{parse_table, ParsedTable};
pub use time_report::{parse_time_report, read_time_report};
