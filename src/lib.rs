//! Proof Census
//!
//! Re-classifies the line-count table and the time report produced by a
//! verification toolchain into semantic categories (liveness proof,
//! controller implementation, trusted wrapper, ...) and emits per-category
//! totals as JSON for downstream report tables.
//!
//! ## Pipelines
//!
//! - table text → [`parser::parse_table`] → [`aggregator::classify_records`]
//!   → [`output::write_aggregate`]
//! - time report → [`parser::read_time_report`] → [`aggregator::classify_time`]
//!   → [`output::write_aggregate`]
//!
//! Most users should use the CLI:
//!
//! ```bash
//! proof-census loc --table zookeeper_loc_table --target zookeeper
//! proof-census --help
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;
