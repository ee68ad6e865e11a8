//! Input data model shared by the table and time-report readers.
//!
//! `FileRecord` is one data row of the line-count table. The time report
//! structs mirror the JSON written by the verifier with timing enabled.

use crate::utils::config::{EXEC_COL, PROOF_AND_EXEC_COL, PROOF_COL, SPEC_COL, TRUSTED_COL};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One numeric column of the line-count table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Trusted,
    Spec,
    Proof,
    Exec,
    ProofAndExec,
}

impl Column {
    /// Every numeric column, in table order
    pub const ALL: [Column; 5] = [
        Column::Trusted,
        Column::Spec,
        Column::Proof,
        Column::Exec,
        Column::ProofAndExec,
    ];

    /// Position of the column in a split table row
    pub fn position(self) -> usize {
        match self {
            Column::Trusted => TRUSTED_COL,
            Column::Spec => SPEC_COL,
            Column::Proof => PROOF_COL,
            Column::Exec => EXEC_COL,
            Column::ProofAndExec => PROOF_AND_EXEC_COL,
        }
    }

    /// Header label used by the table for this column
    pub fn label(self) -> &'static str {
        match self {
            Column::Trusted => "Trusted",
            Column::Spec => "Spec",
            Column::Proof => "Proof",
            Column::Exec => "Exec",
            Column::ProofAndExec => "Proof+Exec",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single per-file row of the line-count table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Project-relative path, used only as a classification key
    pub path: String,
    pub trusted: u64,
    pub spec: u64,
    pub proof: u64,
    pub exec: u64,
    /// Lines that are simultaneously proof and exec
    pub proof_and_exec: u64,
}

impl FileRecord {
    /// Create a record from its path and the five counts in table order
    pub fn new(
        path: impl Into<String>,
        trusted: u64,
        spec: u64,
        proof: u64,
        exec: u64,
        proof_and_exec: u64,
    ) -> Self {
        Self {
            path: path.into(),
            trusted,
            spec,
            proof,
            exec,
            proof_and_exec,
        }
    }

    /// Value of one numeric column
    pub fn count(&self, column: Column) -> u64 {
        match column {
            Column::Trusted => self.trusted,
            Column::Spec => self.spec,
            Column::Proof => self.proof,
            Column::Exec => self.exec,
            Column::ProofAndExec => self.proof_and_exec,
        }
    }

    fn count_mut(&mut self, column: Column) -> &mut u64 {
        match column {
            Column::Trusted => &mut self.trusted,
            Column::Spec => &mut self.spec,
            Column::Proof => &mut self.proof,
            Column::Exec => &mut self.exec,
            Column::ProofAndExec => &mut self.proof_and_exec,
        }
    }

    /// Add `other`'s counts column by column.
    ///
    /// Fails with the first column whose sum does not fit in a `u64`.
    pub fn checked_add(&self, other: &FileRecord) -> Result<FileRecord, Column> {
        let mut sum = self.clone();
        for column in Column::ALL {
            let slot = sum.count_mut(column);
            *slot = slot.checked_add(other.count(column)).ok_or(column)?;
        }
        Ok(sum)
    }
}

/// Top-level verifier JSON output. Only the timing section is read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeReport {
    #[serde(rename = "times-ms", default)]
    pub times: Times,
}

/// The `times-ms` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Times {
    /// Wall-clock time of the whole run (parallel)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,

    #[serde(rename = "total-verify", default, skip_serializing_if = "Option::is_none")]
    pub total_verify: Option<f64>,

    #[serde(default)]
    pub smt: SmtTimes,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmtTimes {
    #[serde(rename = "smt-run-module-times", default)]
    pub modules: Vec<ModuleTime>,
}

/// Verification time of one module.
///
/// Times are non-negative milliseconds and may be fractional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleTime {
    /// Namespaced module name, e.g. `zookeeper_controller::exec::reconciler`
    pub module: String,

    /// Module time in milliseconds; absent in some runs, see [`ModuleTime::time_ms`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,

    #[serde(rename = "function-breakdown", default)]
    pub functions: Vec<FunctionTime>,
}

impl ModuleTime {
    /// Module time, falling back to the sum of its function breakdown
    pub fn time_ms(&self) -> f64 {
        match self.time {
            Some(t) => t,
            None => self.functions.iter().map(|f| f.time).sum(),
        }
    }
}

/// Verification time of one function inside a module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionTime {
    pub function: String,
    pub time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
}
