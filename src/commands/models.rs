use crate::aggregator::{AnalysisTarget, CatchAllPolicy, Engine, TimeMarkers};
use crate::utils::config::DEFAULT_TOP_FUNCTIONS;
use std::path::PathBuf;

/// Arguments for the loc command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct LocArgs {
    /// Line-count table to read
    pub table: PathBuf,

    /// Controller or library being analysed
    pub target: AnalysisTarget,

    /// Engine override (None = engine default for the target)
    pub engine: Option<Engine>,

    /// Catch-all policy override (None = engine default)
    pub catch_all: Option<CatchAllPolicy>,

    /// Optional TOML file with extra rule overlays
    pub rules_file: Option<PathBuf>,

    /// Output path (None = `<target>-<engine suffix>.json`)
    pub output: Option<PathBuf>,
}

impl LocArgs {
    pub fn engine(&self) -> Engine {
        self.engine.unwrap_or_else(|| Engine::default_for(&self.target))
    }

    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            PathBuf::from(format!("{}-{}.json", self.target.name(), self.engine().output_suffix()))
        })
    }
}

impl Default for LocArgs {
    fn default() -> Self {
        Self {
            table: PathBuf::new(),
            target: AnalysisTarget::Library,
            engine: None,
            catch_all: None,
            rules_file: None,
            output: None,
        }
    }
}

/// Arguments for the time command
#[derive(Debug, Clone)]
pub struct TimeArgs {
    /// Verifier JSON report to read
    pub report: PathBuf,

    /// Name used for the default output file
    pub target: String,

    /// Output path (None = `<target>-time.json`)
    pub output: Option<PathBuf>,

    /// Print the slowest functions to stdout
    pub print_summary: bool,

    /// Number of functions in the summary
    pub top_functions: usize,

    pub markers: TimeMarkers,
}

impl TimeArgs {
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}-time.json", self.target)))
    }
}

impl Default for TimeArgs {
    fn default() -> Self {
        Self {
            report: PathBuf::new(),
            target: String::new(),
            output: None,
            print_summary: false,
            top_functions: DEFAULT_TOP_FUNCTIONS,
            markers: TimeMarkers::default(),
        }
    }
}

/// Arguments for the rules command
#[derive(Debug, Clone)]
pub struct RulesArgs {
    pub target: AnalysisTarget,
    pub engine: Option<Engine>,
    pub rules_file: Option<PathBuf>,
    /// When set, report which rule classifies this path
    pub path: Option<String>,
}
