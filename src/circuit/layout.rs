//! Raw placement data supplied by an editor.
//!
//! A [`Layout`] is what a user draws: components dropped on a grid at a
//! center point with a rotation, plus wire segments between grid points.
//! Nothing here is electrical yet; [`resolve`](super::resolve) turns it into
//! a [`CircuitState`](super::CircuitState).

use serde::{Deserialize, Serialize};

use super::types::{ComponentId, GridPoint, Orientation};
use crate::components::{DeviceKind, Element};
use crate::error::{LoopflowError, Result};

/// Distance, in grid units, from a component's center to each terminal.
pub const TERMINAL_OFFSET: i64 = 1;

/// Compute the two terminal points of a component placed at `center`.
///
/// Terminals sit one grid unit either side of the center along the
/// horizontal (0°/180°) or vertical (90°/270°) axis. 180° and 270° swap
/// which physical point is terminal-1, which reverses the component's
/// polarity in every loop it belongs to.
///
/// Returns `None` when a terminal would fall outside the `i64` grid.
///
/// This is the only place the orientation → terminal mapping lives; the
/// resolver and any renderer must both go through it.
pub fn terminal_points(
    center: GridPoint,
    orientation: Orientation,
) -> Option<(GridPoint, GridPoint)> {
    if orientation.is_reversed() {
        let (t1, t2) = terminal_points(center, orientation.flipped())?;
        return Some((t2, t1));
    }
    let d = TERMINAL_OFFSET;
    let (dx, dy) = match orientation {
        Orientation::Deg90 | Orientation::Deg270 => (0, d),
        Orientation::Deg0 | Orientation::Deg180 => (d, 0),
    };
    Some((
        center.checked_offset(-dx, -dy)?,
        center.checked_offset(dx, dy)?,
    ))
}

/// Identity of a terminal for the purpose of node merging.
///
/// Grid points merge by coordinate equality; named terminals merge by name.
/// A named terminal never merges with a grid point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TerminalKey {
    Point(GridPoint),
    Named(String),
}

impl TerminalKey {
    /// Grid position, if this terminal has one.
    pub fn point(&self) -> Option<GridPoint> {
        match self {
            TerminalKey::Point(p) => Some(*p),
            TerminalKey::Named(_) => None,
        }
    }
}

/// Where a component's two terminals are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Placed on the grid by the editor
    Grid {
        center: GridPoint,
        orientation: Orientation,
    },
    /// Pre-resolved terminal names (generator-produced circuits)
    Terminals { node1: String, node2: String },
}

impl Placement {
    /// Terminal-1 and terminal-2 keys, in canonical order.
    ///
    /// `None` for a grid placement whose terminals fall off the grid.
    pub fn terminals(&self) -> Option<(TerminalKey, TerminalKey)> {
        match self {
            Placement::Grid {
                center,
                orientation,
            } => {
                let (t1, t2) = terminal_points(*center, *orientation)?;
                Some((TerminalKey::Point(t1), TerminalKey::Point(t2)))
            }
            Placement::Terminals { node1, node2 } => Some((
                TerminalKey::Named(node1.clone()),
                TerminalKey::Named(node2.clone()),
            )),
        }
    }
}

/// A two-terminal device placed by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PlacedComponentDef", into = "PlacedComponentDef")]
pub struct PlacedComponent {
    pub id: ComponentId,
    pub element: Element,
    pub placement: Placement,
}

impl PlacedComponent {
    /// Place a component on the grid.
    pub fn on_grid(
        id: impl Into<String>,
        element: Element,
        center: GridPoint,
        orientation: Orientation,
    ) -> Self {
        Self {
            id: ComponentId::new(id),
            element,
            placement: Placement::Grid {
                center,
                orientation,
            },
        }
    }

    /// Attach a component between two named terminals.
    pub fn between(
        id: impl Into<String>,
        element: Element,
        node1: impl Into<String>,
        node2: impl Into<String>,
    ) -> Self {
        Self {
            id: ComponentId::new(id),
            element,
            placement: Placement::Terminals {
                node1: node1.into(),
                node2: node2.into(),
            },
        }
    }

    /// Terminal-1 and terminal-2 keys, if they lie on the grid.
    pub fn terminals(&self) -> Option<(TerminalKey, TerminalKey)> {
        self.placement.terminals()
    }
}

/// Wire form of [`PlacedComponent`]: either `center` (+ `orientation`) or
/// `node1`/`node2` must be present.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PlacedComponentDef {
    id: ComponentId,
    kind: DeviceKind,
    #[serde(default)]
    value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    center: Option<GridPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    orientation: Option<Orientation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    node1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    node2: Option<String>,
}

impl TryFrom<PlacedComponentDef> for PlacedComponent {
    type Error = LoopflowError;

    fn try_from(def: PlacedComponentDef) -> Result<Self> {
        let placement = match (def.center, def.orientation, def.node1, def.node2) {
            (Some(center), orientation, None, None) => Placement::Grid {
                center,
                orientation: orientation.unwrap_or_default(),
            },
            (None, None, Some(node1), Some(node2)) => Placement::Terminals { node1, node2 },
            (None, Some(_), Some(_), Some(_)) => {
                return Err(LoopflowError::InvalidPlacement {
                    id: def.id.0,
                    message: "`orientation` only applies to a `center` placement".to_string(),
                })
            }
            _ => {
                return Err(LoopflowError::InvalidPlacement {
                    id: def.id.0,
                    message: "expected either `center` or both `node1` and `node2`".to_string(),
                })
            }
        };
        Ok(Self {
            id: def.id,
            element: Element::from_parts(def.kind, def.value),
            placement,
        })
    }
}

impl From<PlacedComponent> for PlacedComponentDef {
    fn from(c: PlacedComponent) -> Self {
        let (center, orientation, node1, node2) = match c.placement {
            Placement::Grid {
                center,
                orientation,
            } => (Some(center), Some(orientation), None, None),
            Placement::Terminals { node1, node2 } => (None, None, Some(node1), Some(node2)),
        };
        Self {
            id: c.id,
            kind: c.element.kind(),
            value: c.element.value(),
            center,
            orientation,
            node1,
            node2,
        }
    }
}

/// A zero-resistance connection between two grid points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wire {
    pub id: String,
    pub start_point: GridPoint,
    pub end_point: GridPoint,
}

impl Wire {
    pub fn new(id: impl Into<String>, start_point: GridPoint, end_point: GridPoint) -> Self {
        Self {
            id: id.into(),
            start_point,
            end_point,
        }
    }
}

/// Everything the editor hands over for one analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub components: Vec<PlacedComponent>,
    pub wires: Vec<Wire>,
}

impl Layout {
    pub fn new(components: Vec<PlacedComponent>, wires: Vec<Wire>) -> Self {
        Self { components, wires }
    }

    /// Parse a layout from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a layout JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| LoopflowError::file_read(path, e))?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_points_axes() {
        let c = GridPoint::new(5, 5);
        assert_eq!(
            terminal_points(c, Orientation::Deg0),
            Some((GridPoint::new(4, 5), GridPoint::new(6, 5)))
        );
        assert_eq!(
            terminal_points(c, Orientation::Deg90),
            Some((GridPoint::new(5, 4), GridPoint::new(5, 6)))
        );
    }

    #[test]
    fn test_half_turn_swaps_terminals() {
        let c = GridPoint::new(-2, 3);
        for o in [Orientation::Deg0, Orientation::Deg90] {
            let (a1, a2) = terminal_points(c, o).unwrap();
            let (b1, b2) = terminal_points(c, o.flipped()).unwrap();
            assert_eq!((a1, a2), (b2, b1));
        }
    }

    #[test]
    fn test_terminal_off_grid() {
        let edge = GridPoint::new(i64::MAX, 0);
        assert_eq!(terminal_points(edge, Orientation::Deg0), None);
        assert_eq!(terminal_points(edge, Orientation::Deg180), None);
        // The vertical axis still fits
        assert!(terminal_points(edge, Orientation::Deg90).is_some());
        assert_eq!(terminal_points(GridPoint::new(0, i64::MIN), Orientation::Deg270), None);
    }

    #[test]
    fn test_parse_layout_json() {
        let json = r#"{
            "components": [
                {"id": "R1", "kind": "resistor", "value": 100, "center": {"x": 1, "y": 0}, "orientation": 90},
                {"id": "V1", "kind": "dc_source", "value": 5, "node1": "a", "node2": "b"}
            ],
            "wires": [
                {"id": "w1", "startPoint": {"x": 0, "y": 0}, "endPoint": {"x": 2, "y": 0}}
            ]
        }"#;
        let layout = Layout::from_json(json).unwrap();
        assert_eq!(layout.components.len(), 2);
        assert_eq!(layout.components[0].element, Element::Resistor(100.0));
        assert_eq!(
            layout.components[0].placement,
            Placement::Grid {
                center: GridPoint::new(1, 0),
                orientation: Orientation::Deg90
            }
        );
        assert_eq!(
            layout.components[1].terminals(),
            Some((TerminalKey::Named("a".into()), TerminalKey::Named("b".into())))
        );
        assert_eq!(layout.wires[0].end_point, GridPoint::new(2, 0));
    }

    #[test]
    fn test_missing_placement_is_rejected() {
        let json = r#"{"components": [{"id": "R1", "kind": "resistor", "value": 1, "node1": "a"}]}"#;
        assert!(Layout::from_json(json).is_err());
    }

    #[test]
    fn test_orientation_with_named_terminals_is_rejected() {
        let json = r#"{"components": [
            {"id": "R1", "kind": "resistor", "value": 1, "orientation": 90, "node1": "a", "node2": "b"}
        ]}"#;
        let err = Layout::from_json(json).unwrap_err();
        assert!(err.to_string().contains("orientation"));
    }

    #[test]
    fn test_layout_serde_keeps_placement() {
        let layout = Layout::new(
            vec![PlacedComponent::on_grid(
                "D1",
                Element::Diode,
                GridPoint::new(3, 3),
                Orientation::Deg270,
            )],
            vec![],
        );
        let json = serde_json::to_string(&layout).unwrap();
        assert_eq!(Layout::from_json(&json).unwrap(), layout);
    }
}
