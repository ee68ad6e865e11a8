//! Proof Census CLI
//!
//! Turns verifier line-count tables and time reports into per-category
//! JSON totals.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use proof_census::aggregator::{AnalysisTarget, CatchAllPolicy, Engine, TimeMarkers};
use proof_census::commands::{
    self, display_rules, display_version, execute_loc, execute_time, validate_table_file, LocArgs,
    RulesArgs, TimeArgs,
};
use proof_census::utils::config::{
    DEFAULT_TOP_FUNCTIONS, IMPL_MARKER, SAFETY_MARKER, TABLE_ENV, TARGET_ENV,
};

/// Proof Census - line and time accounting for verified controllers
#[derive(Parser, Debug)]
#[command(name = "proof-census")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a line-count table into category totals
    Loc {
        /// Line-count table produced by the verifier
        #[arg(short = 'i', long, env = TABLE_ENV)]
        table: PathBuf,

        /// Controller name, or "library" for the shared library
        #[arg(short, long, env = TARGET_ENV)]
        target: AnalysisTarget,

        /// Engine: loc, lines or library (defaults from the target)
        #[arg(short, long)]
        engine: Option<Engine>,

        /// What to do with files no rule classifies: silent, warn or fail
        #[arg(long)]
        catch_all: Option<CatchAllPolicy>,

        /// TOML file with extra rule overlays
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Output path for the aggregate JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Classify a verifier time report into Impl/Liveness/Safety totals
    Time {
        /// Verifier JSON output with timing information
        #[arg(short, long)]
        report: PathBuf,

        /// Controller name, used for the default output file
        #[arg(short, long, env = TARGET_ENV)]
        target: String,

        /// Output path for the time summary JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the slowest functions to stdout
        #[arg(long)]
        summary: bool,

        /// Number of slowest functions to list
        #[arg(long, default_value_t = DEFAULT_TOP_FUNCTIONS)]
        top: usize,

        /// Module-name marker for implementation modules
        #[arg(long, default_value = IMPL_MARKER)]
        impl_marker: String,

        /// Module-name marker for safety proof modules
        #[arg(long, default_value = SAFETY_MARKER)]
        safety_marker: String,
    },

    /// Validate a line-count table without classifying it
    Validate {
        /// Path to the table
        #[arg(short, long, env = TABLE_ENV)]
        table: PathBuf,
    },

    /// Show the rule precedence for an engine and target
    Rules {
        /// Controller name, or "library"
        #[arg(short, long, env = TARGET_ENV)]
        target: AnalysisTarget,

        #[arg(short, long)]
        engine: Option<Engine>,

        /// TOML file with extra rule overlays
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Report which rule classifies this path
        #[arg(long)]
        path: Option<String>,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Loc {
            table,
            target,
            engine,
            catch_all,
            rules,
            output,
        } => {
            let args = LocArgs {
                table,
                target,
                engine,
                catch_all,
                rules_file: rules,
                output,
            };

            commands::validate_args(&args)?;
            execute_loc(args)?;
        }

        Commands::Time {
            report,
            target,
            output,
            summary,
            top,
            impl_marker,
            safety_marker,
        } => {
            let args = TimeArgs {
                report,
                target,
                output,
                print_summary: summary,
                top_functions: top,
                markers: TimeMarkers {
                    impl_marker,
                    safety_marker,
                },
            };

            commands::time::validate_args(&args)?;
            execute_time(args)?;
        }

        Commands::Validate { table } => {
            validate_table_file(table)?;
        }

        Commands::Rules {
            target,
            engine,
            rules,
            path,
        } => {
            display_rules(RulesArgs {
                target,
                engine,
                rules_file: rules,
                path,
            })?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
