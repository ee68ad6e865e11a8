//! Configuration and constants for the census engines.

/// Column positions in the line-count table (position 0 is the unused label column)
pub const FILE_COL: usize = 1;
pub const TRUSTED_COL: usize = 2;
pub const SPEC_COL: usize = 3;
pub const PROOF_COL: usize = 4;
pub const EXEC_COL: usize = 5;
pub const PROOF_AND_EXEC_COL: usize = 6;

/// Minimum number of `|`-delimited fields a table row must carry
pub const MIN_TABLE_FIELDS: usize = PROOF_AND_EXEC_COL + 1;

/// Expected header labels, paired with their column position
pub const HEADER_LABELS: &[(usize, &str)] = &[
    (FILE_COL, "file"),
    (TRUSTED_COL, "Trusted"),
    (SPEC_COL, "Spec"),
    (PROOF_COL, "Proof"),
    (EXEC_COL, "Exec"),
    (PROOF_AND_EXEC_COL, "Proof+Exec"),
];

// Footer markers. The separator row only has to contain the dash run,
// the totals row only has to contain the token.
pub const SEPARATOR_MARKER: &str = "----------------";
pub const TOTAL_MARKER: &str = "total";

/// Suffix appended to a controller name to build its path pre-filter
pub const CONTROLLER_SUFFIX: &str = "_controller";

/// Placeholder substituted with the controller name inside rule patterns
pub const TARGET_PLACEHOLDER: &str = "{target}";

/// CLI token selecting the library-wide analysis target
pub const LIBRARY_TARGET: &str = "library";

// Module-name markers for the time classifier. Impl is checked first.
pub const IMPL_MARKER: &str = "exec";
pub const SAFETY_MARKER: &str = "proof::safety";

/// Number of slowest functions listed by `time --summary`
pub const DEFAULT_TOP_FUNCTIONS: usize = 10;

/// Environment variables that can stand in for CLI arguments
pub const TABLE_ENV: &str = "PROOF_CENSUS_TABLE";
pub const TARGET_ENV: &str = "PROOF_CENSUS_TARGET";
