//! Generated reference circuits.
//!
//! These are built with named terminals rather than grid placements, so
//! they resolve to the same topology regardless of any drawing.

use crate::circuit::{Layout, PlacedComponent};
use crate::components::Element;

/// Two stacked meshes sharing a middle branch.
///
/// ```text
///   n1 --R1-- n2 --R2-- n3
///   |         |         |
///   V1        R3        R4
///   |         |         |
///   n4 --W1-- n5 --W2-- n6
/// ```
///
/// `V1` drives current up from n4 to n1; all four resistors have value
/// `resistance`. The mesh currents are `I1 = 3V / 5R` (left) and
/// `I2 = V / 5R` (right), both clockwise.
pub fn two_mesh(voltage: f64, resistance: f64) -> Layout {
    let r = Element::Resistor(resistance);
    let components = vec![
        PlacedComponent::between("V1", Element::DcSource(voltage), "n4", "n1"),
        PlacedComponent::between("R1", r, "n1", "n2"),
        PlacedComponent::between("R2", r, "n2", "n3"),
        PlacedComponent::between("R3", r, "n2", "n5"),
        PlacedComponent::between("R4", r, "n3", "n6"),
        PlacedComponent::between("W1", Element::Wire, "n5", "n4"),
        PlacedComponent::between("W2", Element::Wire, "n6", "n5"),
    ];
    Layout::new(components, Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::resolve_layout;

    #[test]
    fn test_two_mesh_topology() {
        let state = resolve_layout(&two_mesh(10.0, 10.0));
        assert_eq!(state.nodes.len(), 6);
        assert_eq!(state.components.len(), 7);
        assert_eq!(state.loops.len(), 2);
        assert_eq!(state.cycle_rank(), 2);
        assert!(state.dropped_components.is_empty());
    }
}
