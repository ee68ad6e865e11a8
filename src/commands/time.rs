//! Time command implementation: classify a verifier time report.

use super::models::TimeArgs;
use crate::aggregator::{classify_time, slowest_functions, wall_clock_ms, TimeSummary};
use crate::output::write_aggregate;
use crate::parser::read_time_report;
use anyhow::{Context, Result};
use log::info;

/// Execute the time command
///
/// **Public** - main entry point called from main.rs
pub fn execute_time(args: TimeArgs) -> Result<TimeSummary> {
    info!("Reading time report: {}", args.report.display());
    let report = read_time_report(&args.report)
        .with_context(|| format!("Failed to read time report {}", args.report.display()))?;

    let summary = classify_time(&report, &args.markers);
    info!(
        "Impl {} ms | Liveness {} ms | Safety {} ms | Total {} ms",
        summary.impl_ms, summary.liveness_ms, summary.safety_ms, summary.total_ms
    );

    let output = args.output_path();
    write_aggregate(&summary, &output).context("Failed to write time summary JSON")?;
    info!("✓ Time summary written to: {}", output.display());

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("VERIFICATION TIME SUMMARY: {}", args.target);
        println!("{}", "=".repeat(80));
        println!("Total (sum of modules): {} ms", summary.total_ms);
        if let Some(wall) = wall_clock_ms(&report) {
            println!("Wall clock:             {} ms", wall);
        }
        println!("\nSlowest functions:");
        for (i, f) in slowest_functions(&report, args.top_functions).iter().enumerate() {
            println!("  {:>2}. {:>8} ms  {}", i + 1, f.time_ms, f.function);
        }
        println!("{}", "=".repeat(80));
    }

    Ok(summary)
}

/// Validate time arguments
pub fn validate_args(args: &TimeArgs) -> Result<()> {
    if args.target.trim().is_empty() {
        anyhow::bail!("Target name cannot be empty");
    }

    if !args.report.is_file() {
        anyhow::bail!("Time report not found: {}", args.report.display());
    }

    if args.markers.impl_marker.is_empty() || args.markers.safety_marker.is_empty() {
        anyhow::bail!("Time markers cannot be empty");
    }

    Ok(())
}
