//! Mesh analysis output.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::circuit::{ComponentId, LoopId};
use crate::components::DiodeState;

/// Result of one mesh analysis.
///
/// When `solvable` is false both current maps are empty. `converged` is
/// false when diode states were still changing at the iteration cap; the
/// currents are then those of the last solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Signed current per loop, along the loop's traversal direction
    pub loop_currents: BTreeMap<LoopId, f64>,
    /// Signed current per component, terminal-1 → terminal-2
    pub branch_currents: BTreeMap<ComponentId, f64>,
    pub solvable: bool,
    #[serde(default = "default_true")]
    pub converged: bool,
    /// Number of matrix solves in the outer diode iteration
    #[serde(default)]
    pub iterations: usize,
    /// Final state of every diode that belongs to a loop
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub diode_states: BTreeMap<ComponentId, DiodeState>,
}

fn default_true() -> bool {
    true
}

impl AnalysisResult {
    /// Nothing to solve: no loops.
    pub fn trivial() -> Self {
        Self {
            loop_currents: BTreeMap::new(),
            branch_currents: BTreeMap::new(),
            solvable: true,
            converged: true,
            iterations: 0,
            diode_states: BTreeMap::new(),
        }
    }

    /// The loop system has no unique solution.
    pub fn unsolvable(iterations: usize) -> Self {
        Self {
            solvable: false,
            converged: false,
            iterations,
            ..Self::trivial()
        }
    }

    /// Current through a component, terminal-1 → terminal-2.
    pub fn branch_current(&self, id: &ComponentId) -> Option<f64> {
        self.branch_currents.get(id).copied()
    }

    pub fn loop_current(&self, id: LoopId) -> Option<f64> {
        self.loop_currents.get(&id).copied()
    }

    pub fn diode_state(&self, id: &ComponentId) -> Option<DiodeState> {
        self.diode_states.get(id).copied()
    }
}
