//! Mesh (loop-current) solver.
//!
//! ## Mesh Analysis
//!
//! Each independent loop found by the resolver carries one unknown loop
//! current. Kirchhoff's voltage law around loop i gives one row of
//! R·I = V, where:
//!
//! - `R[i][i]` is the total resistance of loop i
//! - `R[i][j]` is the signed resistance shared by loops i and j
//!   (positive when both traverse it the same way)
//! - `V[i]` is the signed sum of EMFs around loop i
//!
//! The current through a component is the signed sum of the currents of
//! every loop that contains it.
//!
//! Diodes are piecewise linear (conducting or blocking); their states are
//! found by re-solving the linear system until they stop changing.

mod analysis;
mod matrix;
mod mesh;

pub use analysis::AnalysisResult;
pub use matrix::LoopMatrix;
pub use mesh::{solve, DiodeStates, MeshSolver, SolverConfig};

/// Maximum outer iterations over diode states.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Pivot magnitude below which the loop matrix is treated as singular.
pub const PIVOT_EPSILON: f64 = 1e-10;
