//! Loc command implementation.
//!
//! The loc command:
//! 1. Reads and validates the line-count table
//! 2. Builds the rule set for the engine and target
//! 3. Classifies every record of the target
//! 4. Writes the aggregate JSON
//!
//! Nothing is written unless every step succeeds.

use super::models::LocArgs;
use crate::aggregator::{build_rule_set, classify_records, load_overlays, Classification, Overlay};
use crate::output::write_aggregate;
use crate::parser::parse_table;
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Execute the loc command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The classification that was written, for callers that want the stats
///
/// # Errors
/// * Unreadable table or overlay file
/// * Table schema violations and malformed counts
/// * Inconsistent rule overlays
/// * Catch-all reached under the `fail` policy
/// * File write errors
pub fn execute_loc(args: LocArgs) -> Result<Classification> {
    let start_time = Instant::now();
    let engine = args.engine();

    info!("Starting {} census for target: {}", engine, args.target);

    info!("Step 1/4: Reading line-count table...");
    let text = std::fs::read_to_string(&args.table)
        .with_context(|| format!("Failed to read table {}", args.table.display()))?;
    let table = parse_table(&text)
        .with_context(|| format!("Invalid line-count table {}", args.table.display()))?;
    debug!("Table has {} data rows", table.records.len());

    info!("Step 2/4: Building rule set...");
    let overlays: Vec<Overlay> = match &args.rules_file {
        Some(path) => load_overlays(path)
            .with_context(|| format!("Failed to load rule overlays from {}", path.display()))?,
        None => Vec::new(),
    };
    let rules = build_rule_set(engine, &args.target, &overlays, args.catch_all)
        .context("Failed to build rule set")?;
    for line in rules.describe() {
        debug!("  {}", line);
    }

    info!("Step 3/4: Classifying records...");
    let classification = classify_records(&table.records, &args.target, &rules)
        .context("Classification aborted")?;
    info!(
        "Classified {} records ({} outside target, {} via catch-all)",
        classification.stats.considered,
        classification.stats.skipped,
        classification.stats.unclassified.len()
    );
    for (category, bucket) in classification.aggregate.iter() {
        debug!("  {:<24} {}", category, bucket.total());
    }

    info!("Step 4/4: Writing aggregate...");
    let output = args.output_path();
    write_aggregate(&classification.aggregate, &output)
        .context("Failed to write aggregate JSON")?;
    info!("✓ Aggregate written to: {}", output.display());

    info!("Census completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(classification)
}

/// Validate loc arguments
///
/// **Public** - can be called before execute_loc for early validation
pub fn validate_args(args: &LocArgs) -> Result<()> {
    if args.table.as_os_str().is_empty() {
        anyhow::bail!("Table path cannot be empty");
    }

    if !args.table.is_file() {
        anyhow::bail!("Table file not found: {}", args.table.display());
    }

    if let Some(rules) = &args.rules_file {
        if !rules.is_file() {
            anyhow::bail!("Rule overlay file not found: {}", rules.display());
        }
    }

    Ok(())
}
