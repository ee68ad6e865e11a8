//! Ordered classification rules.
//!
//! A rule pairs a path predicate with one or more destinations. Each
//! destination names a category and the column mapping that decides which
//! table columns flow into which counters of that category's bucket.
//! Rules are evaluated top to bottom and the first match wins; records no
//! rule matches go to the rule set's catch-all destinations.

use super::buckets::{Counter, LineAggregate};
use crate::parser::schema::{Column, FileRecord};
use crate::utils::config::TARGET_PLACEHOLDER;
use crate::utils::error::RulesError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Predicate over a record's path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathMatcher {
    /// Path contains the substring
    Contains(String),
    /// Path is exactly the string
    Equals(String),
    /// Any inner matcher matches
    Any(Vec<PathMatcher>),
    /// Every inner matcher matches
    All(Vec<PathMatcher>),
}

impl PathMatcher {
    pub fn contains(pattern: impl Into<String>) -> Self {
        PathMatcher::Contains(pattern.into())
    }

    pub fn equals(pattern: impl Into<String>) -> Self {
        PathMatcher::Equals(pattern.into())
    }

    /// Shorthand for `Any` over several substrings
    pub fn contains_any(patterns: &[&str]) -> Self {
        PathMatcher::Any(patterns.iter().map(|p| PathMatcher::contains(*p)).collect())
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathMatcher::Contains(p) => path.contains(p.as_str()),
            PathMatcher::Equals(p) => path == p,
            PathMatcher::Any(inner) => inner.iter().any(|m| m.matches(path)),
            PathMatcher::All(inner) => inner.iter().all(|m| m.matches(path)),
        }
    }

    /// Substitute the target placeholder in every pattern
    pub fn resolve(&self, target: &str) -> PathMatcher {
        match self {
            PathMatcher::Contains(p) => PathMatcher::Contains(p.replace(TARGET_PLACEHOLDER, target)),
            PathMatcher::Equals(p) => PathMatcher::Equals(p.replace(TARGET_PLACEHOLDER, target)),
            PathMatcher::Any(inner) => PathMatcher::Any(inner.iter().map(|m| m.resolve(target)).collect()),
            PathMatcher::All(inner) => PathMatcher::All(inner.iter().map(|m| m.resolve(target)).collect()),
        }
    }
}

impl fmt::Display for PathMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathMatcher::Contains(p) => write!(f, "contains {:?}", p),
            PathMatcher::Equals(p) => write!(f, "equals {:?}", p),
            PathMatcher::Any(inner) => write_joined(f, inner, " or "),
            PathMatcher::All(inner) => write_joined(f, inner, " and "),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, inner: &[PathMatcher], sep: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, m) in inner.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", m)?;
    }
    f.write_str(")")
}

/// Which table columns flow into which bucket counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MappingSpec", into = "MappingSpec")]
pub struct ColumnMapping {
    flows: BTreeMap<Counter, Vec<Column>>,
}

/// Serialized form of a mapping: a preset name or an explicit table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum MappingSpec {
    Preset(String),
    Explicit(BTreeMap<Counter, Vec<Column>>),
}

impl TryFrom<MappingSpec> for ColumnMapping {
    type Error = String;

    fn try_from(spec: MappingSpec) -> Result<Self, Self::Error> {
        match spec {
            MappingSpec::Preset(name) => {
                ColumnMapping::preset(&name).ok_or_else(|| format!("unknown mapping preset {:?}", name))
            }
            MappingSpec::Explicit(flows) => Ok(ColumnMapping { flows }),
        }
    }
}

impl From<ColumnMapping> for MappingSpec {
    fn from(mapping: ColumnMapping) -> Self {
        MappingSpec::Explicit(mapping.flows)
    }
}

impl ColumnMapping {
    pub fn new(flows: impl IntoIterator<Item = (Counter, Vec<Column>)>) -> Self {
        Self {
            flows: flows.into_iter().collect(),
        }
    }

    /// Every non-trusted column counts as trusted code
    pub fn trusted_fold() -> Self {
        Self::new([(
            Counter::Trusted,
            vec![Column::Spec, Column::Proof, Column::Exec, Column::ProofAndExec],
        )])
    }

    /// Proof+Exec feeds both counters; spec lines are proof burden
    pub fn proof_burden() -> Self {
        Self::new([
            (Counter::Exec, vec![Column::Exec, Column::ProofAndExec]),
            (Counter::Proof, vec![Column::Proof, Column::ProofAndExec, Column::Spec]),
        ])
    }

    /// Like `proof_burden` but spec lines keep their own counter
    pub fn spec_separate() -> Self {
        Self::new([
            (Counter::Exec, vec![Column::Exec, Column::ProofAndExec]),
            (Counter::Proof, vec![Column::Proof, Column::ProofAndExec]),
            (Counter::Spec, vec![Column::Spec]),
        ])
    }

    pub fn exec_and_proof() -> Self {
        Self::new([
            (Counter::Exec, vec![Column::Exec, Column::ProofAndExec]),
            (Counter::Proof, vec![Column::Proof, Column::ProofAndExec]),
        ])
    }

    pub fn spec_only() -> Self {
        Self::new([(Counter::Spec, vec![Column::Spec])])
    }

    /// Exec code counts as exec, everything else as trusted model code
    pub fn model_trusted() -> Self {
        Self::new([
            (Counter::Exec, vec![Column::Exec, Column::ProofAndExec]),
            (Counter::Trusted, vec![Column::Proof, Column::ProofAndExec, Column::Spec]),
        ])
    }

    /// Look up a named preset
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "trusted_fold" => Some(Self::trusted_fold()),
            "proof_burden" => Some(Self::proof_burden()),
            "spec_separate" => Some(Self::spec_separate()),
            "exec_and_proof" => Some(Self::exec_and_proof()),
            "spec_only" => Some(Self::spec_only()),
            "model_trusted" => Some(Self::model_trusted()),
            _ => None,
        }
    }

    pub fn counters(&self) -> impl Iterator<Item = Counter> + '_ {
        self.flows.keys().copied()
    }

    /// How many times a column is counted by this mapping
    pub fn multiplicity(&self, column: Column) -> u64 {
        self.flows
            .values()
            .map(|cols| cols.iter().filter(|&&c| c == column).count() as u64)
            .sum()
    }

    /// Amount this mapping adds to `counter` for `record`
    pub fn contribution(&self, record: &FileRecord, counter: Counter) -> u64 {
        self.flows
            .get(&counter)
            .map(|cols| column_sum(record, cols))
            .unwrap_or(0)
    }

    /// Add `record` into `category` of `aggregate`
    pub fn apply(&self, record: &FileRecord, category: &str, aggregate: &mut LineAggregate) {
        for (&counter, columns) in &self.flows {
            aggregate.accumulate(category, counter, column_sum(record, columns));
        }
    }
}

/// Saturating sum of the given columns of `record`
fn column_sum(record: &FileRecord, columns: &[Column]) -> u64 {
    columns
        .iter()
        .fold(0, |acc, &c| acc.saturating_add(record.count(c)))
}

impl fmt::Display for ColumnMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (counter, columns)) in self.flows.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            let sources: Vec<&str> = columns.iter().map(|c| c.label()).collect();
            write!(f, "{} <- {}", counter, sources.join(" + "))?;
        }
        Ok(())
    }
}

/// Where a matching record is accumulated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub category: String,
    pub mapping: ColumnMapping,
}

impl Destination {
    pub fn new(category: impl Into<String>, mapping: ColumnMapping) -> Self {
        Self {
            category: category.into(),
            mapping,
        }
    }
}

/// A single classification rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub when: PathMatcher,
    /// Usually one destination; several when a file feeds more than one view
    #[serde(rename = "into")]
    pub destinations: Vec<Destination>,
}

impl Rule {
    pub fn new(name: impl Into<String>, when: PathMatcher, destinations: Vec<Destination>) -> Self {
        Self {
            name: name.into(),
            when,
            destinations,
        }
    }

    /// Rule with a single destination
    pub fn single(
        name: impl Into<String>,
        when: PathMatcher,
        category: impl Into<String>,
        mapping: ColumnMapping,
    ) -> Self {
        Self::new(name, when, vec![Destination::new(category, mapping)])
    }

    pub fn resolve(&self, target: &str) -> Rule {
        Rule {
            name: self.name.clone(),
            when: self.when.resolve(target),
            destinations: self.destinations.clone(),
        }
    }
}

/// What happens to a record that only the catch-all matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatchAllPolicy {
    /// Route to the catch-all bucket quietly
    Silent,
    /// Route to the catch-all bucket and log the path
    Warn,
    /// Abort the pass
    Fail,
}

impl FromStr for CatchAllPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "silent" => Ok(CatchAllPolicy::Silent),
            "warn" => Ok(CatchAllPolicy::Warn),
            "fail" => Ok(CatchAllPolicy::Fail),
            other => Err(format!("unknown catch-all policy {:?} (silent, warn, fail)", other)),
        }
    }
}

impl fmt::Display for CatchAllPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CatchAllPolicy::Silent => "silent",
            CatchAllPolicy::Warn => "warn",
            CatchAllPolicy::Fail => "fail",
        })
    }
}

/// A complete, resolved rule set for one engine and target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    /// Engine name, used in diagnostics
    pub engine: String,
    /// Counters every bucket carries
    pub counters: &'static [Counter],
    /// Categories emitted even when empty, in declaration order
    pub categories: Vec<String>,
    /// Ordered rules, first match wins
    pub rules: Vec<Rule>,
    /// Destinations for records no rule matches
    pub catch_all: Vec<Destination>,
    pub catch_all_policy: CatchAllPolicy,
}

impl RuleSet {
    /// First rule whose predicate matches `path`
    pub fn first_match(&self, path: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.when.matches(path))
    }

    /// Zeroed aggregate with a bucket per declared category
    pub fn empty_aggregate(&self) -> LineAggregate {
        LineAggregate::zeroed(&self.categories, self.counters)
    }

    /// Check every destination against the declared categories and counters
    pub fn validate(&self) -> Result<(), RulesError> {
        let declared: BTreeSet<&str> = self.categories.iter().map(String::as_str).collect();
        let fallback = ("catch-all", &self.catch_all);
        let named = self.rules.iter().map(|r| (r.name.as_str(), &r.destinations));

        for (name, destinations) in named.chain(std::iter::once(fallback)) {
            if destinations.is_empty() {
                return Err(RulesError::NoDestination {
                    rule: name.to_string(),
                });
            }
            for dest in destinations {
                if !declared.contains(dest.category.as_str()) {
                    return Err(RulesError::UnknownCategory {
                        rule: name.to_string(),
                        category: dest.category.clone(),
                    });
                }
                if let Some(counter) = dest.mapping.counters().find(|c| !self.counters.contains(c)) {
                    return Err(RulesError::UnknownCounter {
                        rule: name.to_string(),
                        counter: counter.to_string(),
                        engine: self.engine.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Human-readable precedence listing, one line per rule
    pub fn describe(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .rules
            .iter()
            .enumerate()
            .map(|(i, r)| format!("{:>2}. {}: {} -> {}", i + 1, r.name, r.when, render_destinations(&r.destinations)))
            .collect();
        lines.push(format!(
            "{:>2}. catch-all ({}): -> {}",
            self.rules.len() + 1,
            self.catch_all_policy,
            render_destinations(&self.catch_all)
        ));
        lines
    }
}

fn render_destinations(dests: &[Destination]) -> String {
    dests
        .iter()
        .map(|d| format!("{} [{}]", d.category, d.mapping))
        .collect::<Vec<_>>()
        .join(" + ")
}
