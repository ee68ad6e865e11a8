//! Route table records into category buckets.
//!
//! Records outside the analysis target are skipped before any rule is
//! consulted. Every remaining record lands in at least one bucket: the
//! first matching rule decides where, and the catch-all takes the rest.

use super::buckets::LineAggregate;
use super::rules::{CatchAllPolicy, RuleSet};
use super::targets::AnalysisTarget;
use crate::parser::schema::FileRecord;
use crate::utils::error::ClassifyError;
use log::{debug, warn};
use std::collections::BTreeMap;

/// Rule name recorded in the stats for catch-all matches
pub const CATCH_ALL_RULE: &str = "catch-all";

/// Bookkeeping for one classification pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationStats {
    /// Records that passed the target pre-filter
    pub considered: usize,
    /// Records dropped by the pre-filter
    pub skipped: usize,
    /// Records matched per rule name
    pub per_rule: BTreeMap<String, usize>,
    /// Paths only the catch-all matched
    pub unclassified: Vec<String>,
}

impl ClassificationStats {
    pub fn merge(&mut self, other: &ClassificationStats) {
        self.considered += other.considered;
        self.skipped += other.skipped;
        for (rule, count) in &other.per_rule {
            *self.per_rule.entry(rule.clone()).or_insert(0) += count;
        }
        self.unclassified.extend(other.unclassified.iter().cloned());
    }
}

/// Output of the line classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub aggregate: LineAggregate,
    pub stats: ClassificationStats,
}

impl Classification {
    pub fn merge(&mut self, other: &Classification) {
        self.aggregate.merge(&other.aggregate);
        self.stats.merge(&other.stats);
    }
}

/// Classify records for one analysis target
///
/// **Public** - main entry point for line classification
///
/// # Arguments
/// * `records` - Data rows from the table reader
/// * `target` - Controller or library being analysed (drives the pre-filter)
/// * `rules` - Rule set built for the same target
///
/// # Returns
/// Aggregate holding a bucket for every declared category, plus stats
///
/// # Errors
/// * `ClassifyError::Unclassified` - catch-all reached under the `fail` policy
pub fn classify_records(
    records: &[FileRecord],
    target: &AnalysisTarget,
    rules: &RuleSet,
) -> Result<Classification, ClassifyError> {
    let mut aggregate = rules.empty_aggregate();
    let mut stats = ClassificationStats::default();

    for record in records {
        if !target.admits(&record.path) {
            stats.skipped += 1;
            continue;
        }
        stats.considered += 1;

        let (rule_name, destinations) = match rules.first_match(&record.path) {
            Some(rule) => (rule.name.as_str(), &rule.destinations),
            None => {
                match rules.catch_all_policy {
                    CatchAllPolicy::Fail => {
                        return Err(ClassifyError::Unclassified {
                            path: record.path.clone(),
                        })
                    }
                    CatchAllPolicy::Warn => {
                        warn!("No rule matches {}, counting it in the catch-all", record.path)
                    }
                    CatchAllPolicy::Silent => {}
                }
                stats.unclassified.push(record.path.clone());
                (CATCH_ALL_RULE, &rules.catch_all)
            }
        };

        for dest in destinations {
            dest.mapping.apply(record, &dest.category, &mut aggregate);
        }
        *stats.per_rule.entry(rule_name.to_string()).or_insert(0) += 1;
    }

    debug!(
        "Classified {} records for {} ({} skipped, {} to catch-all)",
        stats.considered,
        target,
        stats.skipped,
        stats.unclassified.len()
    );

    Ok(Classification { aggregate, stats })
}

/// Classify in fixed-size chunks and reduce the partial results.
///
/// Produces the same buckets as [`classify_records`] on the whole slice.
pub fn classify_chunked(
    records: &[FileRecord],
    target: &AnalysisTarget,
    rules: &RuleSet,
    chunk_size: usize,
) -> Result<Classification, ClassifyError> {
    let mut result = Classification {
        aggregate: rules.empty_aggregate(),
        stats: ClassificationStats::default(),
    };
    for chunk in records.chunks(chunk_size.max(1)) {
        result.merge(&classify_records(chunk, target, rules)?);
    }
    Ok(result)
}
