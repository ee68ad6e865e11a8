//! Category buckets: the accumulators both classifiers write into.
//!
//! Buckets are created zeroed and only ever grow. Everything is keyed
//! through `BTreeMap` so serialization order is stable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A named counter inside a line-count bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Counter {
    Trusted,
    Spec,
    Exec,
    Proof,
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Counter::Trusted => "Trusted",
            Counter::Spec => "Spec",
            Counter::Exec => "Exec",
            Counter::Proof => "Proof",
        };
        f.write_str(name)
    }
}

/// Counter set of the trusted/exec/proof engines
pub const TRUSTED_EXEC_PROOF: &[Counter] = &[Counter::Trusted, Counter::Exec, Counter::Proof];

/// Counter set of the engine that keeps spec lines apart
pub const SPEC_EXEC_PROOF: &[Counter] = &[Counter::Spec, Counter::Exec, Counter::Proof];

/// Fixed set of counters for one category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryBucket {
    counters: BTreeMap<Counter, u64>,
}

impl CategoryBucket {
    /// Create a bucket with every counter present and zero
    pub fn zeroed(counters: &[Counter]) -> Self {
        Self {
            counters: counters.iter().map(|&c| (c, 0)).collect(),
        }
    }

    /// Add to a counter, saturating at `u64::MAX`
    pub fn add(&mut self, counter: Counter, amount: u64) {
        let slot = self.counters.entry(counter).or_insert(0);
        *slot = slot.saturating_add(amount);
    }

    /// Value of a counter (zero when the bucket does not track it)
    pub fn get(&self, counter: Counter) -> u64 {
        self.counters.get(&counter).copied().unwrap_or(0)
    }

    /// Sum of all counters
    pub fn total(&self) -> u64 {
        self.counters.values().fold(0, |acc, &v| acc.saturating_add(v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Counter, u64)> + '_ {
        self.counters.iter().map(|(&c, &v)| (c, v))
    }
}

/// Category name → bucket, the output of the line classifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineAggregate {
    buckets: BTreeMap<String, CategoryBucket>,
}

impl LineAggregate {
    /// Create an aggregate holding a zeroed bucket for each category
    pub fn zeroed<S: AsRef<str>>(categories: &[S], counters: &[Counter]) -> Self {
        Self {
            buckets: categories
                .iter()
                .map(|c| (c.as_ref().to_string(), CategoryBucket::zeroed(counters)))
                .collect(),
        }
    }

    pub fn bucket(&self, category: &str) -> Option<&CategoryBucket> {
        self.buckets.get(category)
    }

    /// Counter value of a category (zero when either is absent)
    pub fn get(&self, category: &str, counter: Counter) -> u64 {
        self.bucket(category).map(|b| b.get(counter)).unwrap_or(0)
    }

    pub fn accumulate(&mut self, category: &str, counter: Counter, amount: u64) {
        self.buckets
            .entry(category.to_string())
            .or_default()
            .add(counter, amount);
    }

    /// Fold another aggregate into this one.
    ///
    /// Addition commutes, so classifying disjoint record slices and
    /// merging gives the same result as one pass over all records.
    pub fn merge(&mut self, other: &LineAggregate) {
        for (category, bucket) in &other.buckets {
            let target = self.buckets.entry(category.clone()).or_default();
            for (counter, value) in bucket.iter() {
                target.add(counter, value);
            }
        }
    }

    /// Sum of every counter of every bucket
    pub fn grand_total(&self) -> u64 {
        self.buckets
            .values()
            .fold(0, |acc, b| acc.saturating_add(b.total()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategoryBucket)> {
        self.buckets.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Sub-category of a verification time entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeCategory {
    Impl,
    Liveness,
    Safety,
}

/// Millisecond totals of the time classifier.
///
/// `total` receives every module; exactly one of the other three does.
/// Times stay fractional, as the verifier reports them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSummary {
    #[serde(rename = "Impl")]
    pub impl_ms: f64,
    #[serde(rename = "Liveness")]
    pub liveness_ms: f64,
    #[serde(rename = "Safety")]
    pub safety_ms: f64,
    #[serde(rename = "Total")]
    pub total_ms: f64,
}

impl TimeSummary {
    pub fn add(&mut self, category: TimeCategory, ms: f64) {
        match category {
            TimeCategory::Impl => self.impl_ms += ms,
            TimeCategory::Liveness => self.liveness_ms += ms,
            TimeCategory::Safety => self.safety_ms += ms,
        }
        self.total_ms += ms;
    }

    pub fn merge(&mut self, other: &TimeSummary) {
        self.impl_ms += other.impl_ms;
        self.liveness_ms += other.liveness_ms;
        self.safety_ms += other.safety_ms;
        self.total_ms += other.total_ms;
    }
}
