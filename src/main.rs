//! Loopflow - Mesh-Current Circuit Solver
//!
//! Resolves a grid layout into electrical nodes and loops, solves the mesh
//! equations, and prints both as JSON.
//!
//! # Usage
//!
//! ```bash
//! loopflow layout.json --pretty
//! loopflow --textbook --voltage 10 --resistance 10
//! loopflow -vv layout.json
//! RUST_LOG=debug loopflow layout.json
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use log::LevelFilter;
use loopflow_core::{
    analyze, analyze_strict,
    circuit::Layout,
    error::Result,
    textbook, SolverConfig,
};

/// Mesh-current circuit solver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the layout description file (.json)
    #[arg(value_name = "LAYOUT_FILE", required_unless_present = "textbook")]
    layout_file: Option<PathBuf>,

    /// Solver configuration file (.json); missing fields keep their defaults
    #[arg(short, long, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Maximum diode-state iterations
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Analyze the generated two-mesh textbook circuit instead of a file
    #[arg(long, conflicts_with = "layout_file")]
    textbook: bool,

    /// Source voltage of the textbook circuit
    #[arg(long, default_value_t = 10.0)]
    voltage: f64,

    /// Resistor value of the textbook circuit
    #[arg(long, default_value_t = 10.0)]
    resistance: f64,

    /// Fail on invalid layouts and on circuits without a closed loop
    #[arg(long)]
    strict: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Increase log verbosity (-v debug, -vv trace); overrides RUST_LOG
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_default_env();
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    builder.init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    // Load the solver configuration
    let mut config = match &args.config {
        Some(path) => SolverConfig::from_file(path)?,
        None => SolverConfig::default(),
    };
    if let Some(max_iterations) = args.max_iterations {
        config = config.with_max_iterations(max_iterations);
    }

    // Load the layout
    let layout = match &args.layout_file {
        Some(path) => Layout::from_file(path)?,
        None => textbook::two_mesh(args.voltage, args.resistance),
    };

    // Resolve and solve
    let analysis = if args.strict {
        analyze_strict(&layout, &config)?
    } else {
        analyze(&layout, &config)
    };

    let output = if args.pretty {
        serde_json::to_string_pretty(&analysis)?
    } else {
        serde_json::to_string(&analysis)?
    };
    println!("{}", output);

    Ok(())
}
