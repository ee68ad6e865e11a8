//! JSON aggregate writer.
//!
//! Writes classifier output (a `LineAggregate` or a `TimeSummary`) as
//! pretty-printed JSON. Both serialize with every counter present, zeros
//! included, and map keys in sorted order.

use crate::aggregator::buckets::{LineAggregate, TimeSummary};
use crate::utils::error::OutputError;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Write an aggregate to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `aggregate` - Classifier output to write
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_aggregate<T: Serialize>(
    aggregate: &T,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing aggregate to: {}", output_path.display());

    validate_output_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    // Serialize first so a failure never leaves a truncated file behind
    let body = aggregate_to_string(aggregate)?;

    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(body.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    info!("Aggregate written successfully ({} bytes)", body.len() + 1);

    Ok(())
}

/// Serialize an aggregate to a pretty JSON string
pub fn aggregate_to_string<T: Serialize>(aggregate: &T) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(aggregate)?)
}

/// Validate that output path is writable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

fn read_json<T: DeserializeOwned>(input_path: &Path) -> Result<T, OutputError> {
    debug!("Reading aggregate from: {}", input_path.display());
    let file = File::open(input_path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Read a line-count aggregate back from a JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_aggregate(input_path: impl AsRef<Path>) -> Result<LineAggregate, OutputError> {
    read_json(input_path.as_ref())
}

/// Read a time summary back from a JSON file
pub fn read_time_summary(input_path: impl AsRef<Path>) -> Result<TimeSummary, OutputError> {
    read_json(input_path.as_ref())
}
