//! Mesh-current solver.

use std::collections::{BTreeMap, HashMap};

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::circuit::{CircuitState, ComponentId, LoopId};
use crate::components::{DeviceParams, DiodeParams, DiodeState, Element};
use crate::error::{LoopflowError, Result};

use super::analysis::AnalysisResult;
use super::matrix::LoopMatrix;
use super::{DEFAULT_MAX_ITERATIONS, PIVOT_EPSILON};

/// Diode states threaded through the outer iteration.
pub type DiodeStates = BTreeMap<ComponentId, DiodeState>;

/// Configuration for the mesh solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum outer iterations over diode states.
    pub max_iterations: usize,
    /// Smallest pivot magnitude accepted by the elimination.
    pub pivot_epsilon: f64,
    /// Device model parameters.
    pub devices: DeviceParams,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            pivot_epsilon: PIVOT_EPSILON,
            devices: DeviceParams::default(),
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum diode-state iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the singular-pivot threshold.
    pub fn with_pivot_epsilon(mut self, pivot_epsilon: f64) -> Self {
        self.pivot_epsilon = pivot_epsilon;
        self
    }

    /// Set the ammeter series resistance (ohms).
    pub fn with_ammeter_resistance(mut self, resistance: f64) -> Self {
        self.devices.ammeter_resistance = resistance;
        self
    }

    /// Set the diode model.
    pub fn with_diode_params(mut self, diode: DiodeParams) -> Self {
        self.devices.diode = diode;
        self
    }

    /// Read a configuration from a JSON file. Missing fields keep defaults.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| LoopflowError::file_read(path, e))?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// One component as seen by the loop system.
struct Branch<'a> {
    id: &'a ComponentId,
    element: Element,
    /// (loop index, direction) for every loop containing this component
    loops: Vec<(usize, f64)>,
}

impl Branch<'_> {
    fn current(&self, loop_currents: &[f64]) -> f64 {
        self.loops.iter().map(|&(i, d)| d * loop_currents[i]).sum()
    }
}

/// Solves the mesh equations of a [`CircuitState`].
#[derive(Debug, Clone, Default)]
pub struct MeshSolver {
    config: SolverConfig,
}

impl MeshSolver {
    /// Create a solver with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a solver with a custom configuration.
    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Compute loop and branch currents.
    ///
    /// Diodes start out conducting. After each solve, conducting diodes
    /// without forward current switch to blocking and blocking diodes are
    /// re-tried as conducting; the iteration stops when no diode changes
    /// state or the iteration cap is hit.
    pub fn solve(&self, state: &CircuitState) -> AnalysisResult {
        if state.loops.is_empty() {
            return AnalysisResult::trivial();
        }

        let branches = self.branches(state);
        let mut states: DiodeStates = branches
            .iter()
            .filter(|b| b.element.is_diode())
            .map(|b| (b.id.clone(), DiodeState::Conducting))
            .collect();

        let max_iterations = self.config.max_iterations.max(1);
        let mut last = None;

        for iteration in 1..=max_iterations {
            let currents = match self.solve_loops(state.loops.len(), &branches, &states) {
                Ok(currents) => currents,
                Err(e) => {
                    warn!("Mesh system not solvable: {}", e);
                    return AnalysisResult::unsolvable(iteration);
                }
            };

            let next = self.relax(state.loops.len(), &branches, &states, &currents);
            let settled = next == states;
            debug!(
                "Iteration {}: {} diode(s), {}",
                iteration,
                states.len(),
                if settled { "settled" } else { "states changed" }
            );

            last = Some((currents, states, iteration, settled));
            if settled {
                break;
            }
            states = next;
        }

        let Some((currents, states, iterations, converged)) = last else {
            return AnalysisResult::trivial();
        };
        if !converged {
            warn!(
                "Diode states did not settle after {} iterations, returning last solve",
                iterations
            );
        }

        let loop_currents = state
            .loops
            .iter()
            .zip(&currents)
            .map(|(l, &i)| (l.id, i))
            .collect::<BTreeMap<LoopId, f64>>();

        let branch_currents = branches
            .iter()
            .map(|b| (b.id.clone(), b.current(&currents)))
            .collect();

        AnalysisResult {
            loop_currents,
            branch_currents,
            solvable: true,
            converged,
            iterations,
            diode_states: states,
        }
    }

    /// Collect every component that belongs to at least one loop.
    fn branches<'a>(&self, state: &'a CircuitState) -> Vec<Branch<'a>> {
        let mut memberships: HashMap<&ComponentId, Vec<(usize, f64)>> = HashMap::new();
        for (i, l) in state.loops.iter().enumerate() {
            for (id, dir) in l.iter() {
                memberships.entry(id).or_default().push((i, dir as f64));
            }
        }

        let branches: Vec<Branch<'a>> = state
            .components
            .iter()
            .filter_map(|c| {
                memberships.remove(&c.id).map(|loops| Branch {
                    id: &c.id,
                    element: c.element,
                    loops,
                })
            })
            .collect();

        for id in memberships.keys() {
            warn!("Loop references unknown component '{}', ignoring it", id);
        }
        branches
    }

    /// Assemble and solve R·I = V for the given diode states.
    fn solve_loops(
        &self,
        num_loops: usize,
        branches: &[Branch<'_>],
        states: &DiodeStates,
    ) -> Result<Vec<f64>> {
        let devices = &self.config.devices;
        let mut matrix = LoopMatrix::new(num_loops);
        for b in branches {
            let state = states.get(b.id).copied().unwrap_or_default();
            matrix.stamp_branch(
                &b.loops,
                b.element.resistance(devices, state),
                b.element.emf(devices, state),
            );
        }
        matrix.solve(self.config.pivot_epsilon)
    }

    /// Compute the next diode states from the currents of the last solve.
    fn relax(
        &self,
        num_loops: usize,
        branches: &[Branch<'_>],
        states: &DiodeStates,
        currents: &[f64],
    ) -> DiodeStates {
        let params = &self.config.devices.diode;
        let mut next = states.clone();

        for b in branches.iter().filter(|b| b.element.is_diode()) {
            match states.get(b.id).copied().unwrap_or_default() {
                DiodeState::Conducting => {
                    let forward = b.current(currents);
                    if !params.conducts(forward) {
                        trace!("{}: {:.3e} A, now blocking", b.id, forward);
                        next.insert(b.id.clone(), DiodeState::Blocking);
                    }
                }
                DiodeState::Blocking => {
                    // Re-try conduction with everything else unchanged
                    let mut trial = states.clone();
                    trial.insert(b.id.clone(), DiodeState::Conducting);
                    let forward = self
                        .solve_loops(num_loops, branches, &trial)
                        .map(|c| b.current(&c));
                    if let Ok(forward) = forward {
                        if params.conducts(forward) {
                            trace!("{}: {:.3e} A when re-tried, now conducting", b.id, forward);
                            next.insert(b.id.clone(), DiodeState::Conducting);
                        }
                    }
                }
            }
        }

        next
    }
}

/// Solve a circuit with the default configuration.
pub fn solve(state: &CircuitState) -> AnalysisResult {
    MeshSolver::default().solve(state)
}
