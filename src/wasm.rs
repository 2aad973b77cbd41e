//! WASM bindings for Loopflow Core.
//!
//! This module provides JavaScript-friendly bindings for use in web browsers.
//! Layouts go in and analyses come out as JSON strings, in the same shapes
//! the native CLI reads and prints. Like the CLI, the solver accepts any
//! layout unless `strict` is set, which matches the CLI's `--strict`.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmMeshSolver } from 'loopflow_core';
//!
//! await init();
//!
//! const layout = {
//!   components: [
//!     { id: 'V1', kind: 'dc_source', value: 9, node1: 'gnd', node2: 'top' },
//!     { id: 'R1', kind: 'resistor', value: 1000, node1: 'top', node2: 'gnd' },
//!   ],
//!   wires: [],
//! };
//!
//! const solver = new WasmMeshSolver();
//! solver.strict = true;
//! const { circuit, analysis } = JSON.parse(solver.analyze(JSON.stringify(layout)));
//! console.log(analysis.branchCurrents.R1);
//! ```

use wasm_bindgen::prelude::*;

use crate::circuit::Layout;
use crate::components::DiodeParams;
use crate::error::LoopflowError;
use crate::solver::SolverConfig;

fn to_js(err: LoopflowError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// WASM-compatible mesh solver.
///
/// Holds a solver configuration; every call to [`analyze`](Self::analyze)
/// resolves and solves a fresh layout.
#[wasm_bindgen]
pub struct WasmMeshSolver {
    config: SolverConfig,
    strict: bool,
}

#[wasm_bindgen]
impl WasmMeshSolver {
    /// Create a solver with the default configuration.
    ///
    /// # Example
    /// ```javascript
    /// const solver = new WasmMeshSolver();
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmMeshSolver {
        WasmMeshSolver {
            config: SolverConfig::default(),
            strict: false,
        }
    }

    /// Create a solver with a custom iteration cap and diode barrier.
    ///
    /// # Arguments
    /// * `max_iterations` - Maximum diode-state iterations (default: 10)
    /// * `forward_drop` - Diode barrier voltage while conducting (default: 0.7)
    #[wasm_bindgen]
    pub fn with_config(max_iterations: usize, forward_drop: f64) -> Result<WasmMeshSolver, JsValue> {
        if max_iterations == 0 {
            return Err(to_js(LoopflowError::WasmError {
                message: "max_iterations must be at least 1".to_string(),
            }));
        }
        if !forward_drop.is_finite() || forward_drop < 0.0 {
            return Err(to_js(LoopflowError::WasmError {
                message: format!("invalid diode forward drop {}", forward_drop),
            }));
        }

        let diode = DiodeParams {
            forward_drop,
            ..DiodeParams::default()
        };
        let config = SolverConfig::new()
            .with_max_iterations(max_iterations)
            .with_diode_params(diode);
        Ok(WasmMeshSolver {
            config,
            strict: false,
        })
    }

    /// Create a solver from a JSON solver configuration.
    ///
    /// Missing fields keep their defaults.
    #[wasm_bindgen]
    pub fn from_config_json(config_json: &str) -> Result<WasmMeshSolver, JsValue> {
        let config: SolverConfig = serde_json::from_str(config_json)
            .map_err(|e| to_js(LoopflowError::from(e)))?;
        Ok(WasmMeshSolver {
            config,
            strict: false,
        })
    }

    /// Resolve and solve a layout given as JSON.
    ///
    /// # Returns
    /// The resolved circuit and its analysis as a JSON string, or an error
    /// if the layout is malformed. With `strict` set, an invalid layout or a
    /// circuit without a closed loop is an error too.
    #[wasm_bindgen]
    pub fn analyze(&self, layout_json: &str) -> Result<String, JsValue> {
        let layout = Layout::from_json(layout_json).map_err(to_js)?;

        let analysis = if self.strict {
            crate::analyze_strict(&layout, &self.config).map_err(to_js)?
        } else {
            crate::analyze(&layout, &self.config)
        };
        serde_json::to_string(&analysis).map_err(|e| to_js(LoopflowError::from(e)))
    }

    /// Whether `analyze` validates the layout and requires a closed loop.
    #[wasm_bindgen(getter)]
    pub fn strict(&self) -> bool {
        self.strict
    }

    #[wasm_bindgen(setter)]
    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    /// Maximum diode-state iterations this solver was configured with.
    #[wasm_bindgen(getter)]
    pub fn max_iterations(&self) -> usize {
        self.config.max_iterations
    }
}

impl Default for WasmMeshSolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Get the default diode-state iteration cap.
#[wasm_bindgen]
pub fn default_max_iterations() -> usize {
    crate::solver::DEFAULT_MAX_ITERATIONS
}
