//! Classification and aggregation of raw report data.
//!
//! This module transforms parsed reports into:
//! - Per-category line-count buckets (ordered, first-match rule sets)
//! - Per-category verification time totals
//! - Rule sets for each engine and analysis target

pub mod buckets;
pub mod line_classifier;
pub mod rules;
pub mod targets;
pub mod time_classifier;

// Re-export main types and functions
pub use buckets::{CategoryBucket, Counter, LineAggregate, TimeCategory, TimeSummary};
pub use line_classifier::{classify_chunked, classify_records, Classification, ClassificationStats};
pub use rules::{CatchAllPolicy, ColumnMapping, Destination, PathMatcher, Rule, RuleSet};
pub use targets::{build_rule_set, load_overlays, parse_overlays, AnalysisTarget, Engine, Overlay};
pub use time_classifier::{classify_time, slowest_functions, wall_clock_ms, FunctionTiming, TimeMarkers};
