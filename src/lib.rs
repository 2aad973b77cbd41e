//! # Loopflow Core
//!
//! Circuit topology resolver and mesh-current solver for circuits drawn on
//! a grid.
//!
//! This library provides:
//! - Merging of coincident terminal points into electrical nodes
//! - Discovery of the independent loops (meshes) of the component graph
//! - Mesh analysis of resistive DC circuits, with two-state diodes
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`circuit`] - Layout input, topology resolution and loop discovery
//! - [`components`] - Device models (resistors, sources, diodes, etc.)
//! - [`solver`] - Loop matrix assembly and numerical solving
//! - [`textbook`] - Generated reference circuits
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! loopflow layout.json --pretty
//! ```
//!
//! ### Library
//!
//! ```
//! use loopflow_core::{circuit, solver, textbook};
//!
//! let state = circuit::resolve_layout(&textbook::two_mesh(10.0, 10.0));
//! let result = solver::solve(&state);
//! assert!(result.solvable);
//! assert_eq!(result.loop_currents.len(), 2);
//! ```
//!
//! ## Pipeline
//!
//! 1. Union all wire endpoints; register every component terminal
//! 2. Map each disjoint-set root to a node and remap components onto nodes,
//!    dropping components whose terminals share a node
//! 3. Grow a BFS spanning forest; every back edge closes one loop
//! 4. Assemble R·I = V over the loops and solve by Gaussian elimination
//! 5. For circuits with diodes, re-solve until no diode changes state
//!
//! Both stages are pure functions of their input. Independent analyses can
//! run on separate threads without coordination.

pub mod circuit;
pub mod components;
pub mod error;
pub mod solver;
pub mod textbook;

// Re-export main types for convenience
pub use circuit::{resolve, resolve_layout, CircuitState, Layout};
pub use error::{LoopflowError, Result};
pub use solver::{solve, AnalysisResult, MeshSolver, SolverConfig};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmMeshSolver;

use serde::{Deserialize, Serialize};

/// A resolved circuit together with its mesh analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub circuit: CircuitState,
    pub analysis: AnalysisResult,
}

/// Resolve and solve a layout in one call.
pub fn analyze(layout: &Layout, config: &SolverConfig) -> Analysis {
    let circuit = resolve_layout(layout);
    let analysis = MeshSolver::with_config(config.clone()).solve(&circuit);
    Analysis { circuit, analysis }
}

/// Validate, resolve and solve a layout.
///
/// The layout must pass [`validate_layout`](circuit::validate_layout) and
/// the resolved circuit must close at least one loop
/// ([`validate_circuit`](circuit::validate_circuit)). The CLI `--strict` flag
/// and the WASM `strict` property both go through here.
pub fn analyze_strict(layout: &Layout, config: &SolverConfig) -> Result<Analysis> {
    circuit::validate_layout(layout)?;
    let analysis = analyze(layout, config);
    circuit::validate_circuit(&analysis.circuit)?;
    Ok(analysis)
}
