//! Diode model.
//!
//! Uses a two-state piecewise-linear model instead of the Shockley equation:
//!
//! - Conducting: a fixed barrier voltage in series with a small resistance
//! - Blocking: an effectively infinite resistance
//!
//! The mesh solver picks a state per diode and iterates until the states are
//! consistent with the computed currents.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Discrete operating state of a diode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiodeState {
    /// Forward biased: barrier drop + on-resistance
    #[default]
    Conducting,
    /// Reverse biased: off-resistance, no barrier
    Blocking,
}

impl fmt::Display for DiodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiodeState::Conducting => write!(f, "CONDUCTING"),
            DiodeState::Blocking => write!(f, "BLOCKING"),
        }
    }
}

/// Parameters for the two-state diode model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiodeParams {
    /// Barrier voltage while conducting, typically 0.6-0.7V for silicon
    pub forward_drop: f64,
    /// Series resistance while conducting (ohms)
    pub on_resistance: f64,
    /// Resistance while blocking (ohms); also used for DC-open capacitors
    pub off_resistance: f64,
}

impl Default for DiodeParams {
    fn default() -> Self {
        Self {
            forward_drop: 0.7,
            on_resistance: 0.1,
            off_resistance: 1e9,
        }
    }
}

impl DiodeParams {
    /// Create parameters for a germanium diode (lower forward voltage).
    pub fn germanium() -> Self {
        Self {
            forward_drop: 0.3,
            ..Self::default()
        }
    }

    /// Series resistance in the given state.
    pub fn resistance(&self, state: DiodeState) -> f64 {
        match state {
            DiodeState::Conducting => self.on_resistance,
            DiodeState::Blocking => self.off_resistance,
        }
    }

    /// Barrier voltage in the given state.
    pub fn barrier(&self, state: DiodeState) -> f64 {
        match state {
            DiodeState::Conducting => self.forward_drop,
            DiodeState::Blocking => 0.0,
        }
    }

    /// Whether a forward current is consistent with conduction.
    pub fn conducts(&self, forward_current: f64) -> bool {
        forward_current > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diode_states() {
        let p = DiodeParams::default();
        assert_eq!(p.resistance(DiodeState::Conducting), 0.1);
        assert_eq!(p.barrier(DiodeState::Conducting), 0.7);
        assert_eq!(p.resistance(DiodeState::Blocking), 1e9);
        assert_eq!(p.barrier(DiodeState::Blocking), 0.0);
        assert_eq!(DiodeState::default(), DiodeState::Conducting);
    }

    #[test]
    fn test_zero_current_is_not_conduction() {
        let p = DiodeParams::germanium();
        assert!(p.conducts(1e-6));
        assert!(!p.conducts(0.0));
        assert!(!p.conducts(-0.5));
    }

    #[test]
    fn test_state_serde() {
        assert_eq!(
            serde_json::to_string(&DiodeState::Blocking).unwrap(),
            "\"BLOCKING\""
        );
    }
}
