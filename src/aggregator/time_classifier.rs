//! Bucket verification time by module kind.
//!
//! Every module's time goes into `Total`. It also goes into exactly one
//! of `Impl`, `Safety` or `Liveness`, chosen by substring markers in the
//! module name.

use super::buckets::{TimeCategory, TimeSummary};
use crate::parser::schema::TimeReport;
use crate::utils::config::{IMPL_MARKER, SAFETY_MARKER};
use log::debug;

/// Module-name markers used to pick a time category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeMarkers {
    /// Checked first; matching modules count as implementation
    pub impl_marker: String,
    /// Matching modules count as safety proof
    pub safety_marker: String,
}

impl Default for TimeMarkers {
    fn default() -> Self {
        Self {
            impl_marker: IMPL_MARKER.to_string(),
            safety_marker: SAFETY_MARKER.to_string(),
        }
    }
}

impl TimeMarkers {
    pub fn categorize(&self, module: &str) -> TimeCategory {
        if module.contains(&self.impl_marker) {
            TimeCategory::Impl
        } else if module.contains(&self.safety_marker) {
            TimeCategory::Safety
        } else {
            TimeCategory::Liveness
        }
    }
}

/// Sum module times into a summary
///
/// **Public** - main entry point for time classification
pub fn classify_time(report: &TimeReport, markers: &TimeMarkers) -> TimeSummary {
    let mut summary = TimeSummary::default();
    for module in &report.times.smt.modules {
        let category = markers.categorize(&module.module);
        summary.add(category, module.time_ms());
    }

    debug!(
        "Time summary over {} modules: {} ms total",
        report.times.smt.modules.len(),
        summary.total_ms
    );
    summary
}

/// One function-level timing, ranked by [`slowest_functions`]
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionTiming {
    pub module: String,
    pub function: String,
    pub time_ms: f64,
}

/// The `top_n` slowest functions across all modules, slowest first.
///
/// Ties are broken by function name so the ranking is stable.
pub fn slowest_functions(report: &TimeReport, top_n: usize) -> Vec<FunctionTiming> {
    let mut all: Vec<FunctionTiming> = report
        .times
        .smt
        .modules
        .iter()
        .flat_map(|m| {
            m.functions.iter().map(move |f| FunctionTiming {
                module: m.module.clone(),
                function: f.function.clone(),
                time_ms: f.time,
            })
        })
        .collect();

    all.sort_by(|a, b| {
        b.time_ms
            .total_cmp(&a.time_ms)
            .then_with(|| a.function.cmp(&b.function))
    });
    all.truncate(top_n);
    all
}

/// Wall-clock time of the whole run, when the report carries it
pub fn wall_clock_ms(report: &TimeReport) -> Option<f64> {
    report.times.total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::{FunctionTime, ModuleTime};

    fn module(name: &str, time: f64) -> ModuleTime {
        ModuleTime {
            module: name.to_string(),
            time: Some(time),
            functions: Vec::new(),
        }
    }

    fn report(modules: Vec<ModuleTime>) -> TimeReport {
        let mut report = TimeReport::default();
        report.times.smt.modules = modules;
        report
    }

    #[test]
    fn test_markers() {
        let markers = TimeMarkers::default();
        assert_eq!(markers.categorize("ns::exec::a"), TimeCategory::Impl);
        assert_eq!(markers.categorize("ns::proof::safety::b"), TimeCategory::Safety);
        assert_eq!(markers.categorize("ns::liveness::c"), TimeCategory::Liveness);
        // impl marker is checked first
        assert_eq!(markers.categorize("ns::proof::safety::exec_x"), TimeCategory::Impl);
    }

    #[test]
    fn test_classify_time() {
        let r = report(vec![
            module("ns::exec::a", 100.0),
            module("ns::proof::safety::b", 50.0),
            module("ns::liveness::c", 30.0),
        ]);
        let summary = classify_time(&r, &TimeMarkers::default());

        assert_eq!(summary.impl_ms, 100.0);
        assert_eq!(summary.safety_ms, 50.0);
        assert_eq!(summary.liveness_ms, 30.0);
        assert_eq!(summary.total_ms, 180.0);
    }

    #[test]
    fn test_empty_report() {
        let summary = classify_time(&TimeReport::default(), &TimeMarkers::default());
        assert_eq!(summary, TimeSummary::default());
    }

    #[test]
    fn test_slowest_functions() {
        let mut m = module("ns::exec::a", 100.0);
        m.functions = vec![
            FunctionTime { function: "f".to_string(), time: 10.0, success: Some(true) },
            FunctionTime { function: "g".to_string(), time: 70.0, success: Some(true) },
            FunctionTime { function: "h".to_string(), time: 10.0, success: Some(false) },
        ];
        let top = slowest_functions(&report(vec![m]), 2);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].function, "g");
        assert_eq!(top[1].function, "f");
        assert_eq!(top[1].module, "ns::exec::a");
    }
}
