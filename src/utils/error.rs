//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors raised while reading the line-count table.
///
/// Row numbers are 1-based, matching what an editor shows.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TableError {
    #[error("schema violation at row {row}, column {column}: expected {expected:?}, found {found:?}")]
    SchemaViolation {
        row: usize,
        column: usize,
        expected: String,
        found: String,
    },

    #[error("malformed count at row {row}, column {column} ({label}): {value:?} is not a non-negative integer")]
    MalformedCount {
        row: usize,
        column: usize,
        label: &'static str,
        value: String,
    },

    #[error("{label} total overflows at row {row}, column {column}")]
    CountOverflow {
        row: usize,
        column: usize,
        label: &'static str,
    },
}

/// Errors that can occur while reading a verification time report
#[derive(Error, Debug)]
pub enum TimeReportError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to read time report: {0}")]
    ReadFailed(#[from] std::io::Error),

    #[error("{entry} has time {value}, expected a non-negative number of milliseconds")]
    InvalidTime { entry: String, value: f64 },
}

/// Errors that can occur while assembling a classification rule set
#[derive(Error, Debug)]
pub enum RulesError {
    #[error("Failed to parse rule overlay file: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Failed to read rule overlay file: {0}")]
    ReadFailed(#[from] std::io::Error),

    #[error("rule {rule:?} maps into counter {counter} which engine {engine} does not track")]
    UnknownCounter {
        rule: String,
        counter: String,
        engine: String,
    },

    #[error("rule {rule:?} routes into undeclared category {category:?}")]
    UnknownCategory { rule: String, category: String },

    #[error("rule {rule:?} has no destination")]
    NoDestination { rule: String },

    #[error("engine {engine} cannot analyse target {target:?}")]
    TargetMismatch { engine: String, target: String },
}

/// Errors that can occur during classification
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("no rule classifies {path:?} and the catch-all policy is fail")]
    Unclassified { path: String },
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
