//! Error types for the Loopflow resolver and solver.
//!
//! This module provides a unified error type [`LoopflowError`] that covers
//! the conditions raised by layout validation, the internal linear solver,
//! and the CLI/WASM front ends.
//!
//! The two core operations, [`resolve`](crate::circuit::resolve) and
//! [`solve`](crate::solver::solve), never return these errors: topological
//! anomalies are dropped and singular systems are reported as data.

use thiserror::Error;

/// Result type alias using [`LoopflowError`].
pub type Result<T> = std::result::Result<T, LoopflowError>;

/// Unified error type for all Loopflow operations.
#[derive(Error, Debug)]
pub enum LoopflowError {
    // ============ Layout Errors ============
    /// Two placed components share the same id
    #[error("Duplicate component id '{id}'")]
    DuplicateComponent { id: String },

    /// Two wires share the same id
    #[error("Duplicate wire id '{id}'")]
    DuplicateWire { id: String },

    /// Wire whose endpoints coincide
    #[error("Wire '{id}' starts and ends at the same point")]
    DegenerateWire { id: String },

    /// Component value is out of range for its device kind
    #[error("Invalid value {value} for component '{id}': {message}")]
    InvalidValue {
        id: String,
        value: f64,
        message: String,
    },

    /// Component has neither a grid placement nor explicit terminals
    #[error("Invalid placement for component '{id}': {message}")]
    InvalidPlacement { id: String, message: String },

    /// Orientation is not one of 0/90/180/270
    #[error("Invalid orientation {degrees} (expected 0, 90, 180 or 270)")]
    InvalidOrientation { degrees: i64 },

    // ============ Topology Errors ============
    /// Components exist but none of them closes a loop
    #[error("No complete circuit: {components} component(s) placed but no closed loop found")]
    NoCompleteCircuit { components: usize },

    // ============ Solver Errors ============
    /// Loop matrix is singular and cannot be solved
    #[error("Singular loop matrix - no unique mesh-current solution (pivot {pivot:.2e} at row {row})")]
    SingularMatrix { row: usize, pivot: f64 },

    // ============ I/O Errors ============
    /// Error reading a layout or config file
    #[error("Failed to read file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON input or unserialisable output
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ============ WASM Errors ============
    /// WASM-specific error
    #[cfg(feature = "wasm")]
    #[error("WASM error: {message}")]
    WasmError { message: String },
}

impl LoopflowError {
    /// Create an invalid value error
    pub fn invalid_value(id: impl Into<String>, value: f64, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            id: id.into(),
            value,
            message: message.into(),
        }
    }

    /// Create a singular matrix error
    pub fn singular(row: usize, pivot: f64) -> Self {
        Self::SingularMatrix { row, pivot }
    }

    /// Create a file read error
    pub fn file_read(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::FileReadError {
            path: path.display().to_string(),
            source,
        }
    }
}
