//! Reader for the verifier's JSON timing output.

use super::schema::TimeReport;
use crate::utils::error::TimeReportError;
use log::debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Parse a time report from JSON text
///
/// Missing sections deserialize as empty, so a report without module
/// timings yields an all-zero summary rather than an error.
pub fn parse_time_report(text: &str) -> Result<TimeReport, TimeReportError> {
    let report: TimeReport = serde_json::from_str(text)?;
    validate_times(&report)?;
    debug!(
        "Time report has {} module entries",
        report.times.smt.modules.len()
    );
    Ok(report)
}

/// Read a time report from a JSON file
pub fn read_time_report(path: impl AsRef<Path>) -> Result<TimeReport, TimeReportError> {
    let path = path.as_ref();
    debug!("Reading time report from: {}", path.display());

    let file = File::open(path)?;
    let report: TimeReport = serde_json::from_reader(BufReader::new(file))?;
    validate_times(&report)?;
    Ok(report)
}

/// Reject negative module and function times
///
/// **Private** - shared by both readers
fn validate_times(report: &TimeReport) -> Result<(), TimeReportError> {
    let check = |entry: &str, value: f64| {
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(TimeReportError::InvalidTime {
                entry: entry.to_string(),
                value,
            })
        }
    };

    for module in &report.times.smt.modules {
        if let Some(time) = module.time {
            check(&module.module, time)?;
        }
        for function in &module.functions {
            check(&function.function, function.time)?;
        }
    }
    Ok(())
}
