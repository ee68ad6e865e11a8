//! Built-in engines, analysis targets and rule-set overlays.
//!
//! Each engine has one base rule set shared by every target. Target
//! specific cases live in overlays, plain data that is spliced into the
//! base set at its overlay slot. Adding a target therefore means adding
//! an overlay (built in here, or from a TOML file), not new code.

use super::buckets::{Counter, SPEC_EXEC_PROOF, TRUSTED_EXEC_PROOF};
use super::rules::{CatchAllPolicy, ColumnMapping, Destination, PathMatcher, Rule, RuleSet};
use crate::utils::config::{CONTROLLER_SUFFIX, LIBRARY_TARGET};
use crate::utils::error::RulesError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Which base rule set and counter set to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Engine {
    /// Per-controller trusted/exec/proof breakdown
    Loc,
    /// Per-controller spec/exec/proof breakdown
    Lines,
    /// Library-wide trusted/exec/proof breakdown
    Library,
}

const LOC_CATEGORIES: &[&str] = &[
    "liveness_theorem",
    "reconcile_model",
    "reconcile_impl",
    "liveness_proof",
    "liveness_inv",
    "safety_theorem",
    "safety_proof",
    "external_model",
    "wrapper",
    "entry",
    "other",
];

const LINES_CATEGORIES: &[&str] = &[
    "liveness_theorem",
    "reconcile_spec",
    "reconcile_impl",
    "liveness_proof",
    "liveness_inv",
    "safety_theorem",
    "safety_proof",
    "external_model",
    "exec_cr",
    "spec_cr",
];

const LIBRARY_CATEGORIES: &[&str] = &[
    "test_lines",
    "tla_embedding_lines",
    "tla_lemma_lines",
    "k8s_lemma_lines",
    "object_model_lines",
    "object_wrapper_lines",
    "other_lines",
];

impl Engine {
    pub fn name(self) -> &'static str {
        match self {
            Engine::Loc => "loc",
            Engine::Lines => "lines",
            Engine::Library => "library",
        }
    }

    pub fn counters(self) -> &'static [Counter] {
        match self {
            Engine::Loc | Engine::Library => TRUSTED_EXEC_PROOF,
            Engine::Lines => SPEC_EXEC_PROOF,
        }
    }

    /// Categories always present in this engine's output
    pub fn categories(self) -> &'static [&'static str] {
        match self {
            Engine::Loc => LOC_CATEGORIES,
            Engine::Lines => LINES_CATEGORIES,
            Engine::Library => LIBRARY_CATEGORIES,
        }
    }

    pub fn default_policy(self) -> CatchAllPolicy {
        match self {
            Engine::Lines => CatchAllPolicy::Warn,
            Engine::Loc | Engine::Library => CatchAllPolicy::Silent,
        }
    }

    /// Engine used when none is requested
    pub fn default_for(target: &AnalysisTarget) -> Engine {
        match target {
            AnalysisTarget::Library => Engine::Library,
            AnalysisTarget::Controller(_) => Engine::Loc,
        }
    }

    /// Suffix of the default output file, `<target>-<suffix>.json`
    pub fn output_suffix(self) -> &'static str {
        match self {
            Engine::Lines => "lines",
            Engine::Loc | Engine::Library => "loc",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "loc" => Ok(Engine::Loc),
            "lines" => Ok(Engine::Lines),
            "library" => Ok(Engine::Library),
            other => Err(format!("unknown engine {:?} (loc, lines, library)", other)),
        }
    }
}

/// What a classification pass measures
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnalysisTarget {
    /// One controller; only paths containing `<name>_controller` are kept
    Controller(String),
    /// The shared library; every path is kept
    Library,
}

impl AnalysisTarget {
    pub fn controller(name: impl Into<String>) -> Self {
        AnalysisTarget::Controller(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            AnalysisTarget::Controller(name) => name,
            AnalysisTarget::Library => LIBRARY_TARGET,
        }
    }

    /// Path pre-filter: does this record belong to the target at all?
    pub fn admits(&self, path: &str) -> bool {
        match self {
            AnalysisTarget::Controller(name) => {
                path.contains(&format!("{}{}", name, CONTROLLER_SUFFIX))
            }
            AnalysisTarget::Library => true,
        }
    }
}

impl FromStr for AnalysisTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            Err("analysis target cannot be empty".to_string())
        } else if s == LIBRARY_TARGET {
            Ok(AnalysisTarget::Library)
        } else {
            Ok(AnalysisTarget::Controller(s.to_string()))
        }
    }
}

impl fmt::Display for AnalysisTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Target-specific rules layered onto an engine's base rule set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overlay {
    pub engine: Engine,
    pub target: String,
    /// Extra categories the overlay's rules route into
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(rename = "rule", default)]
    pub rules: Vec<Rule>,
}

impl Overlay {
    fn applies_to(&self, engine: Engine, target: &AnalysisTarget) -> bool {
        self.engine == engine && self.target == target.name()
    }
}

/// On-disk overlay file: a list of `[[overlay]]` tables
#[derive(Debug, Clone, Default, Deserialize)]
struct OverlayFile {
    #[serde(rename = "overlay", default)]
    overlays: Vec<Overlay>,
}

/// Parse overlays from TOML text
pub fn parse_overlays(text: &str) -> Result<Vec<Overlay>, RulesError> {
    let file: OverlayFile = toml::from_str(text)?;
    Ok(file.overlays)
}

/// Read overlays from a TOML file
pub fn load_overlays(path: impl AsRef<Path>) -> Result<Vec<Overlay>, RulesError> {
    let path = path.as_ref();
    debug!("Loading rule overlays from: {}", path.display());
    let text = std::fs::read_to_string(path)?;
    parse_overlays(&text)
}

/// Overlays shipped with the tool
pub fn builtin_overlays() -> Vec<Overlay> {
    let rabbitmq_safety = Rule::single(
        "safety_proof",
        PathMatcher::contains("/proof/safety/"),
        "safety_proof",
        ColumnMapping::proof_burden(),
    );

    vec![
        Overlay {
            engine: Engine::Loc,
            target: "rabbitmq".to_string(),
            categories: Vec::new(),
            rules: vec![rabbitmq_safety.clone()],
        },
        Overlay {
            engine: Engine::Loc,
            target: "zookeeper".to_string(),
            categories: Vec::new(),
            rules: vec![Rule::single(
                "external_api",
                PathMatcher::contains_any(&[
                    "/trusted/zookeeper_api_spec.rs",
                    "/trusted/zookeeper_api_exec.rs",
                    "/trusted/config_map.rs",
                ]),
                "external_model",
                ColumnMapping::trusted_fold(),
            )],
        },
        Overlay {
            engine: Engine::Lines,
            target: "rabbitmq".to_string(),
            categories: Vec::new(),
            rules: vec![rabbitmq_safety],
        },
        Overlay {
            engine: Engine::Lines,
            target: "zookeeper".to_string(),
            categories: Vec::new(),
            rules: vec![Rule::single(
                "external_api",
                PathMatcher::contains_any(&["/exec/zookeeper_api.rs", "/spec/zookeeper_api.rs"]),
                "external_model",
                ColumnMapping::spec_separate(),
            )],
        },
    ]
}

/// Base rules of an engine
struct BaseRules {
    rules: Vec<Rule>,
    /// Index at which overlay rules are spliced in
    overlay_slot: usize,
    catch_all: Vec<Destination>,
}

fn base_rules(engine: Engine) -> BaseRules {
    match engine {
        Engine::Loc => loc_base(),
        Engine::Lines => lines_base(),
        Engine::Library => library_base(),
    }
}

fn entry_matcher() -> PathMatcher {
    PathMatcher::equals("{target}_controller.rs")
}

fn loc_base() -> BaseRules {
    let burden = ColumnMapping::proof_burden;
    let trusted = ColumnMapping::trusted_fold;
    BaseRules {
        rules: vec![
            Rule::single("entry", entry_matcher(), "entry", trusted()),
            Rule::single(
                "wrapper",
                PathMatcher::contains_any(&[
                    "/trusted/spec_types.rs",
                    "/trusted/exec_types.rs",
                    "/trusted/step.rs",
                ]),
                "wrapper",
                trusted(),
            ),
            Rule::single("exec", PathMatcher::contains("/exec/"), "reconcile_impl", burden()),
            Rule::single("model", PathMatcher::contains("/model/"), "reconcile_model", burden()),
            Rule::single(
                "liveness_theorem",
                PathMatcher::contains_any(&["/trusted/liveness_theorem.rs", "trusted/maker.rs"]),
                "liveness_theorem",
                trusted(),
            ),
            Rule::single(
                "safety_theorem",
                PathMatcher::contains("/trusted/safety_theorem.rs"),
                "safety_theorem",
                trusted(),
            ),
            // Helper invariants are part of the liveness proof and also reported on their own
            Rule::new(
                "helper_invariants",
                PathMatcher::contains("/proof/helper_invariants"),
                vec![
                    Destination::new("liveness_inv", burden()),
                    Destination::new("liveness_proof", burden()),
                ],
            ),
            Rule::single("proof", PathMatcher::contains("/proof/"), "liveness_proof", burden()),
        ],
        overlay_slot: 1,
        catch_all: vec![Destination::new("other", burden())],
    }
}

fn lines_base() -> BaseRules {
    let separate = ColumnMapping::spec_separate;
    let burden = ColumnMapping::proof_burden;
    BaseRules {
        rules: vec![
            Rule::single("entry", entry_matcher(), "reconcile_impl", separate()),
            Rule::single("exec_cr", PathMatcher::contains("/exec/types.rs"), "exec_cr", separate()),
            Rule::single("spec_cr", PathMatcher::contains("/spec/types.rs"), "spec_cr", separate()),
            Rule::single("exec", PathMatcher::contains("/exec/"), "reconcile_impl", separate()),
            // Stray exec or proof code under spec/ is charged to the implementation
            Rule::new(
                "spec",
                PathMatcher::contains("/spec/"),
                vec![
                    Destination::new("reconcile_impl", ColumnMapping::exec_and_proof()),
                    Destination::new("reconcile_spec", ColumnMapping::spec_only()),
                ],
            ),
            Rule::single(
                "liveness_theorem",
                PathMatcher::contains("/liveness_theorem.rs"),
                "liveness_theorem",
                separate(),
            ),
            Rule::single(
                "safety_theorem",
                PathMatcher::contains("/safety_theorem.rs"),
                "safety_theorem",
                separate(),
            ),
            Rule::single(
                "helper_invariants",
                PathMatcher::contains("/proof/helper_invariants"),
                "liveness_inv",
                burden(),
            ),
            Rule::single("proof", PathMatcher::contains("/proof/"), "liveness_proof", burden()),
        ],
        overlay_slot: 1,
        catch_all: vec![Destination::new("reconcile_impl", separate())],
    }
}

fn library_base() -> BaseRules {
    let burden = ColumnMapping::proof_burden;
    let trusted = ColumnMapping::trusted_fold;
    BaseRules {
        rules: vec![
            Rule::single("unit_tests", PathMatcher::contains("unit_tests/"), "test_lines", burden()),
            Rule::single(
                "tla_lemma",
                PathMatcher::equals("temporal_logic/rules.rs"),
                "tla_lemma_lines",
                burden(),
            ),
            Rule::single(
                "tla_embedding",
                PathMatcher::equals("temporal_logic/defs.rs"),
                "tla_embedding_lines",
                trusted(),
            ),
            Rule::single(
                "k8s_lemma",
                PathMatcher::Any(vec![
                    PathMatcher::contains("/proof/"),
                    PathMatcher::equals("vstd_ext/multiset_lib.rs"),
                    PathMatcher::equals("vstd_ext/seq_lib.rs"),
                ]),
                "k8s_lemma_lines",
                burden(),
            ),
            Rule::single(
                "object_model",
                PathMatcher::contains("kubernetes_api_objects/spec"),
                "object_model_lines",
                trusted(),
            ),
            Rule::single(
                "object_wrapper",
                PathMatcher::contains("kubernetes_api_objects/exec"),
                "object_wrapper_lines",
                trusted(),
            ),
        ],
        overlay_slot: 0,
        catch_all: vec![Destination::new("other_lines", ColumnMapping::model_trusted())],
    }
}

/// Assemble and validate the rule set for `engine` analysing `target`
///
/// **Public** - main entry point for rule-set construction
///
/// Built-in overlays for the target come first, then `extra` overlays in
/// the order given. `policy` overrides the engine's default catch-all policy.
///
/// # Errors
/// * `RulesError::TargetMismatch` - library engine with a controller target or vice versa
/// * `RulesError::UnknownCategory` / `UnknownCounter` / `NoDestination` - inconsistent overlay
pub fn build_rule_set(
    engine: Engine,
    target: &AnalysisTarget,
    extra: &[Overlay],
    policy: Option<CatchAllPolicy>,
) -> Result<RuleSet, RulesError> {
    let library_pair = matches!(engine, Engine::Library) == matches!(target, AnalysisTarget::Library);
    if !library_pair {
        return Err(RulesError::TargetMismatch {
            engine: engine.to_string(),
            target: target.name().to_string(),
        });
    }

    let base = base_rules(engine);
    let builtin = builtin_overlays();
    let overlays: Vec<&Overlay> = builtin
        .iter()
        .chain(extra.iter())
        .filter(|o| o.applies_to(engine, target))
        .collect();

    let mut categories: Vec<String> = engine.categories().iter().map(|c| c.to_string()).collect();
    for category in overlays.iter().flat_map(|o| o.categories.iter()) {
        if !categories.contains(category) {
            categories.push(category.clone());
        }
    }

    let mut rules = base.rules;
    let overlay_rules: Vec<Rule> = overlays.iter().flat_map(|o| o.rules.iter().cloned()).collect();
    debug!(
        "Splicing {} overlay rules for {} into {} base rules",
        overlay_rules.len(),
        target,
        rules.len()
    );
    let tail = rules.split_off(base.overlay_slot);
    rules.extend(overlay_rules);
    rules.extend(tail);

    let rule_set = RuleSet {
        engine: engine.to_string(),
        counters: engine.counters(),
        categories,
        rules: rules.iter().map(|r| r.resolve(target.name())).collect(),
        catch_all: base.catch_all,
        catch_all_policy: policy.unwrap_or_else(|| engine.default_policy()),
    };
    rule_set.validate()?;
    Ok(rule_set)
}
