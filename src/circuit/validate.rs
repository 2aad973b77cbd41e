//! Opt-in circuit checks.
//!
//! [`resolve`](super::resolve) accepts any input. These checks are for callers
//! that want to reject a layout or flag an incomplete circuit before showing
//! results.

use std::collections::HashSet;

use crate::components::Element;
use crate::error::{LoopflowError, Result};

use super::{CircuitState, Layout};

/// Validate a raw layout.
///
/// Checks:
/// - Component ids and wire ids are unique
/// - Every component's terminals lie on the grid
/// - Component values are finite
/// - Resistances and capacitances are not negative
/// - No wire starts and ends at the same point
pub fn validate_layout(layout: &Layout) -> Result<()> {
    let mut seen = HashSet::new();
    for component in &layout.components {
        if !seen.insert(component.id.as_str()) {
            return Err(LoopflowError::DuplicateComponent {
                id: component.id.to_string(),
            });
        }

        if component.terminals().is_none() {
            return Err(LoopflowError::InvalidPlacement {
                id: component.id.to_string(),
                message: "terminals fall outside the grid".to_string(),
            });
        }

        let value = component.element.value();
        if !value.is_finite() {
            return Err(LoopflowError::invalid_value(
                component.id.as_str(),
                value,
                "value must be finite",
            ));
        }
        match component.element {
            Element::Resistor(r) if r < 0.0 => {
                return Err(LoopflowError::invalid_value(
                    component.id.as_str(),
                    r,
                    "resistance cannot be negative",
                ));
            }
            Element::Capacitor(c) if c < 0.0 => {
                return Err(LoopflowError::invalid_value(
                    component.id.as_str(),
                    c,
                    "capacitance cannot be negative",
                ));
            }
            _ => {}
        }
    }

    let mut seen = HashSet::new();
    for wire in &layout.wires {
        if !seen.insert(wire.id.as_str()) {
            return Err(LoopflowError::DuplicateWire {
                id: wire.id.clone(),
            });
        }
        if wire.start_point == wire.end_point {
            return Err(LoopflowError::DegenerateWire {
                id: wire.id.clone(),
            });
        }
    }

    Ok(())
}

/// Check that a resolved circuit has something to solve.
///
/// An empty circuit is fine; components without any closed loop are not.
pub fn validate_circuit(state: &CircuitState) -> Result<()> {
    let placed = state.placed_components();
    if placed > 0 && !state.has_complete_circuit() {
        return Err(LoopflowError::NoCompleteCircuit { components: placed });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{resolve_layout, GridPoint, Orientation, PlacedComponent, Wire};

    fn r(id: &str, value: f64) -> PlacedComponent {
        PlacedComponent::on_grid(id, Element::Resistor(value), GridPoint::new(0, 0), Orientation::Deg0)
    }

    #[test]
    fn test_duplicate_component() {
        let layout = Layout::new(vec![r("R1", 1.0), r("R1", 2.0)], vec![]);
        assert!(matches!(
            validate_layout(&layout),
            Err(LoopflowError::DuplicateComponent { .. })
        ));
    }

    #[test]
    fn test_duplicate_wire() {
        let w = Wire::new("w", GridPoint::new(0, 0), GridPoint::new(1, 0));
        let layout = Layout::new(vec![], vec![w.clone(), w]);
        assert!(matches!(
            validate_layout(&layout),
            Err(LoopflowError::DuplicateWire { .. })
        ));
    }

    #[test]
    fn test_off_grid_component() {
        let edge = PlacedComponent::on_grid(
            "R1",
            Element::Resistor(1.0),
            GridPoint::new(i64::MIN, 0),
            Orientation::Deg180,
        );
        assert!(matches!(
            validate_layout(&Layout::new(vec![edge], vec![])),
            Err(LoopflowError::InvalidPlacement { .. })
        ));
    }

    #[test]
    fn test_degenerate_wire() {
        let w = Wire::new("dot", GridPoint::new(2, 2), GridPoint::new(2, 2));
        let layout = Layout::new(vec![], vec![w]);
        assert!(matches!(
            validate_layout(&layout),
            Err(LoopflowError::DegenerateWire { .. })
        ));
        // The resolver still accepts it as a single-point node
        assert_eq!(resolve_layout(&layout).nodes.len(), 1);
    }

    #[test]
    fn test_bad_values() {
        let layout = Layout::new(vec![r("R1", -5.0)], vec![]);
        assert!(matches!(
            validate_layout(&layout),
            Err(LoopflowError::InvalidValue { .. })
        ));

        let layout = Layout::new(vec![r("R1", f64::NAN)], vec![]);
        assert!(validate_layout(&layout).is_err());

        // Negative source values are just reversed polarity
        let v = PlacedComponent::between("V1", Element::DcSource(-3.0), "a", "b");
        assert!(validate_layout(&Layout::new(vec![v], vec![])).is_ok());
    }

    #[test]
    fn test_incomplete_circuit() {
        assert!(validate_circuit(&CircuitState::default()).is_ok());

        let open = Layout::new(vec![r("R1", 10.0)], vec![]);
        let state = resolve_layout(&open);
        assert!(matches!(
            validate_circuit(&state),
            Err(LoopflowError::NoCompleteCircuit { components: 1 })
        ));
    }
}
