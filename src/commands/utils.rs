use super::models::RulesArgs;
use crate::aggregator::{build_rule_set, load_overlays, Engine, Overlay};
use crate::parser::{parse_table, ParsedTable};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Validate a line-count table file
pub fn validate_table_file(file_path: PathBuf) -> Result<ParsedTable> {
    println!("Validating table: {}", file_path.display());

    let text = std::fs::read_to_string(&file_path)
        .with_context(|| format!("Failed to read {}", file_path.display()))?;
    let table = parse_table(&text)?;

    println!("✓ Valid line-count table");
    println!("  Data rows: {}", table.records.len());
    match table.totals_match() {
        Some(true) => println!("  Totals row: consistent"),
        Some(false) => println!("  Totals row: does NOT match the data rows"),
        None => println!("  Totals row: no counts"),
    }

    Ok(table)
}

/// Print the resolved rule set in precedence order
pub fn display_rules(args: RulesArgs) -> Result<()> {
    let engine = args.engine.unwrap_or_else(|| Engine::default_for(&args.target));
    let overlays: Vec<Overlay> = match &args.rules_file {
        Some(path) => load_overlays(path)?,
        None => Vec::new(),
    };
    let rules = build_rule_set(engine, &args.target, &overlays, None)?;

    println!("Engine: {}  Target: {}", engine, args.target);
    println!("Categories: {}", rules.categories.join(", "));
    for line in rules.describe() {
        println!("{}", line);
    }

    if let Some(path) = args.path {
        println!();
        if !args.target.admits(&path) {
            println!("{} is outside target {} and is skipped", path, args.target);
        } else {
            match rules.first_match(&path) {
                Some(rule) => println!("{} -> rule {}", path, rule.name),
                None => println!("{} -> catch-all", path),
            }
        }
    }

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("Proof Census v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Line-count and verification-time census for verified controllers.");
}
