//! Reader for the pipe-delimited line-count table.
//!
//! Layout, one row per line:
//!
//! ```text
//! | file               | Trusted | Spec | Proof | Exec | Proof+Exec | ...
//! |--------------------|---------|------|-------|------|------------| ...
//! | foo/exec/bar.rs    | 0       | 2    | 3     | 10   | 1          | ...
//! |------------------- | ...
//! | total              | 0       | 2    | 3     | 10   | 1          | ...
//! ```
//!
//! The first two rows and the last two rows carry no data. Extra columns
//! after `Proof+Exec` are ignored.

use super::schema::{Column, FileRecord};
use crate::utils::config::{
    EXEC_COL, FILE_COL, HEADER_LABELS, MIN_TABLE_FIELDS, PROOF_AND_EXEC_COL, PROOF_COL,
    SEPARATOR_MARKER, SPEC_COL, TOTAL_MARKER, TRUSTED_COL,
};
use crate::utils::error::TableError;
use log::{debug, warn};

/// Header, header rule, separator and totals rows
const MIN_ROWS: usize = 4;

/// 1-based row number of the first data row
const FIRST_DATA_ROW: usize = 3;

/// Result of reading a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTable {
    /// Data rows in table order
    pub records: Vec<FileRecord>,

    /// Counts printed on the totals row, if they parse as integers
    pub reported_total: Option<FileRecord>,

    /// Column-wise sum of every data row
    pub computed_total: FileRecord,
}

impl ParsedTable {
    /// Whether the totals row agrees with the data rows.
    ///
    /// `None` when the totals row carries no parseable counts.
    pub fn totals_match(&self) -> Option<bool> {
        let reported = self.reported_total.as_ref()?;
        Some(
            Column::ALL
                .iter()
                .all(|&c| reported.count(c) == self.computed_total.count(c)),
        )
    }
}

/// Parse and validate a line-count table
///
/// **Public** - main entry point for the table reader
///
/// # Errors
/// * `TableError::SchemaViolation` - header label, separator or total marker
///   mismatch (a table too short to hold a separator row included), or a
///   data row with too few columns
/// * `TableError::MalformedCount` - a numeric column is not a non-negative integer
/// * `TableError::CountOverflow` - a column total does not fit in a `u64`
pub fn parse_table(text: &str) -> Result<ParsedTable, TableError> {
    let mut rows: Vec<&str> = text.lines().collect();
    while rows.last().is_some_and(|r| r.trim().is_empty()) {
        rows.pop();
    }

    validate_header(&split_row(rows.first().copied().unwrap_or_default()))?;

    let row_count = rows.len();
    if row_count < MIN_ROWS {
        // Too short for both footer rows; report the first one missing
        let fields = split_row(rows.get(FIRST_DATA_ROW - 1).copied().unwrap_or_default());
        expect_marker(FIRST_DATA_ROW, &fields, SEPARATOR_MARKER)?;
        return Err(TableError::SchemaViolation {
            row: FIRST_DATA_ROW + 1,
            column: FILE_COL,
            expected: TOTAL_MARKER.to_string(),
            found: String::new(),
        });
    }

    expect_marker(row_count - 1, &split_row(rows[row_count - 2]), SEPARATOR_MARKER)?;
    let total_fields = split_row(rows[row_count - 1]);
    expect_marker(row_count, &total_fields, TOTAL_MARKER)?;

    // Data rows sit strictly between the header rule (row 2) and the separator
    let mut records = Vec::with_capacity(row_count - MIN_ROWS);
    let mut computed_total = FileRecord::new(TOTAL_MARKER, 0, 0, 0, 0, 0);
    for (index, line) in rows[FIRST_DATA_ROW - 1..row_count - 2].iter().enumerate() {
        let row = index + FIRST_DATA_ROW;
        let record = parse_data_row(row, &split_row(line))?;
        computed_total = computed_total
            .checked_add(&record)
            .map_err(|column| TableError::CountOverflow {
                row,
                column: column.position(),
                label: column.label(),
            })?;
        records.push(record);
    }

    debug!("Parsed {} data rows from line-count table", records.len());

    let reported_total = parse_data_row(row_count, &total_fields).ok();
    let table = ParsedTable {
        records,
        reported_total,
        computed_total,
    };
    if table.totals_match() == Some(false) {
        warn!("Totals row does not match the sum of the data rows");
    }

    Ok(table)
}

/// Split a row on `|` and trim every field
///
/// **Private** - internal helper for parse_table
fn split_row(line: &str) -> Vec<&str> {
    line.trim().split('|').map(str::trim).collect()
}

/// Check the header labels at their fixed positions
///
/// **Private** - internal helper for parse_table
fn validate_header(fields: &[&str]) -> Result<(), TableError> {
    for &(column, label) in HEADER_LABELS {
        let found = fields.get(column).copied().unwrap_or_default();
        if found != label {
            return Err(TableError::SchemaViolation {
                row: 1,
                column,
                expected: label.to_string(),
                found: found.to_string(),
            });
        }
    }
    Ok(())
}

/// Check that the file column of a footer row contains `marker`
///
/// **Private** - internal helper for parse_table
fn expect_marker(row: usize, fields: &[&str], marker: &str) -> Result<(), TableError> {
    let found = fields.get(FILE_COL).copied().unwrap_or_default();
    if found.contains(marker) {
        Ok(())
    } else {
        Err(TableError::SchemaViolation {
            row,
            column: FILE_COL,
            expected: marker.to_string(),
            found: found.to_string(),
        })
    }
}

/// Parse one data row into a record
///
/// **Private** - internal helper for parse_table
fn parse_data_row(row: usize, fields: &[&str]) -> Result<FileRecord, TableError> {
    if fields.len() < MIN_TABLE_FIELDS {
        return Err(TableError::SchemaViolation {
            row,
            column: fields.len(),
            expected: format!("at least {} columns", MIN_TABLE_FIELDS),
            found: format!("{} columns", fields.len()),
        });
    }

    let count = |column: usize, kind: Column| -> Result<u64, TableError> {
        fields[column]
            .parse::<u64>()
            .map_err(|_| TableError::MalformedCount {
                row,
                column,
                label: kind.label(),
                value: fields[column].to_string(),
            })
    };

    Ok(FileRecord {
        path: fields[FILE_COL].to_string(),
        trusted: count(TRUSTED_COL, Column::Trusted)?,
        spec: count(SPEC_COL, Column::Spec)?,
        proof: count(PROOF_COL, Column::Proof)?,
        exec: count(EXEC_COL, Column::Exec)?,
        proof_and_exec: count(PROOF_AND_EXEC_COL, Column::ProofAndExec)?,
    })
}
