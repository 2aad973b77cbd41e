//! Topology resolution: raw layout → electrical graph.

use std::collections::{HashMap, HashSet};

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use super::disjoint::TerminalSet;
use super::layout::{Layout, PlacedComponent, TerminalKey, Wire};
use super::loops::{count_components, discover_loops};
use super::types::{ComponentId, LoopId, NodeId};
use crate::components::Element;

/// An electrical node: a set of terminal points at one potential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Centroid of the member grid points (display only)
    pub x: f64,
    pub y: f64,
}

/// A component remapped onto electrical nodes.
///
/// `node1_id` is terminal-1 and `node2_id` is terminal-2; they always differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedComponent {
    pub id: ComponentId,
    #[serde(flatten)]
    pub element: Element,
    pub node1_id: NodeId,
    pub node2_id: NodeId,
}

impl ResolvedComponent {
    /// The terminal opposite `node`, or `None` if `node` is not a terminal.
    pub fn other_end(&self, node: NodeId) -> Option<NodeId> {
        if node == self.node1_id {
            Some(self.node2_id)
        } else if node == self.node2_id {
            Some(self.node1_id)
        } else {
            None
        }
    }
}

/// One independent loop of the component graph.
///
/// `direction[k]` is `+1` if the loop traverses `component_ids[k]` from its
/// terminal-1 to its terminal-2 and `-1` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loop {
    pub id: LoopId,
    pub component_ids: Vec<ComponentId>,
    pub direction: Vec<i8>,
}

impl Loop {
    /// Iterate over (component, direction) pairs in traversal order.
    pub fn iter(&self) -> impl Iterator<Item = (&ComponentId, i8)> + '_ {
        self.component_ids
            .iter()
            .zip(self.direction.iter().copied())
    }

    /// Traversal direction of `component` in this loop, if it belongs to it.
    pub fn direction_of(&self, component: &ComponentId) -> Option<i8> {
        self.iter()
            .find(|(id, _)| *id == component)
            .map(|(_, dir)| dir)
    }

    pub fn contains(&self, component: &ComponentId) -> bool {
        self.component_ids.contains(component)
    }

    pub fn len(&self) -> usize {
        self.component_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.component_ids.is_empty()
    }
}

/// Resolved snapshot of a circuit, ready for mesh analysis.
///
/// Component ids in `components` are unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitState {
    pub nodes: Vec<Node>,
    pub components: Vec<ResolvedComponent>,
    pub loops: Vec<Loop>,
    /// Components left out of the graph: repeated ids, terminals off the
    /// grid, and dead shorts (both terminals on one node)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dropped_components: Vec<ComponentId>,
}

impl CircuitState {
    /// Find a remapped component by id.
    pub fn component(&self, id: &ComponentId) -> Option<&ResolvedComponent> {
        self.components.iter().find(|c| &c.id == id)
    }

    /// Number of connected pieces of the node graph (isolated nodes count).
    pub fn connected_components(&self) -> usize {
        count_components(&self.nodes, &self.components)
    }

    /// Dimension of the cycle space: `E - V + C`.
    pub fn cycle_rank(&self) -> usize {
        (self.components.len() + self.connected_components()).saturating_sub(self.nodes.len())
    }

    /// Whether at least one closed loop exists.
    pub fn has_complete_circuit(&self) -> bool {
        !self.loops.is_empty()
    }

    /// Number of components in the input, including dropped dead shorts.
    pub fn placed_components(&self) -> usize {
        self.components.len() + self.dropped_components.len()
    }
}

/// Resolve a [`Layout`] into a [`CircuitState`].
pub fn resolve_layout(layout: &Layout) -> CircuitState {
    resolve(&layout.components, &layout.wires)
}

/// Collapse placed components and wires into electrical nodes and
/// enumerate the independent loops.
///
/// Wires merge their endpoints; component terminals are registered but
/// never merged with each other. A component whose terminals land on the
/// same node is a dead short and is dropped. So is a component whose id
/// repeats an earlier one, or whose terminals would fall off the grid.
/// Dropped ids are listed in [`CircuitState::dropped_components`].
pub fn resolve(components: &[PlacedComponent], wires: &[Wire]) -> CircuitState {
    let mut terminals = TerminalSet::new();

    for wire in wires {
        terminals.union(
            TerminalKey::Point(wire.start_point),
            TerminalKey::Point(wire.end_point),
        );
    }

    // Loops refer to components by id, so only the first of a repeated id
    // takes part.
    let mut seen: HashSet<&ComponentId> = HashSet::new();
    let mut dropped_components = Vec::new();
    let mut placed: Vec<(&PlacedComponent, TerminalKey, TerminalKey)> =
        Vec::with_capacity(components.len());
    for component in components {
        if !seen.insert(&component.id) {
            warn!("Duplicate component id '{}', dropping the later one", component.id);
            dropped_components.push(component.id.clone());
            continue;
        }
        let Some((t1, t2)) = component.terminals() else {
            warn!("Component '{}' has a terminal off the grid, dropping it", component.id);
            dropped_components.push(component.id.clone());
            continue;
        };
        terminals.insert(t1.clone());
        terminals.insert(t2.clone());
        placed.push((component, t1, t2));
    }

    // One node per root, numbered in order of first member
    let mut root_to_node: HashMap<usize, NodeId> = HashMap::new();
    let mut centroids: Vec<(f64, f64, usize)> = Vec::new();
    for i in 0..terminals.len() {
        let root = terminals.find(i);
        let node = *root_to_node.entry(root).or_insert_with(|| {
            centroids.push((0.0, 0.0, 0));
            NodeId(centroids.len() - 1)
        });
        if let Some(p) = terminals.keys()[i].point() {
            let acc = &mut centroids[node.0];
            acc.0 += p.x as f64;
            acc.1 += p.y as f64;
            acc.2 += 1;
        }
    }

    let nodes: Vec<Node> = centroids
        .iter()
        .enumerate()
        .map(|(i, &(sx, sy, count))| {
            let (x, y) = if count > 0 {
                (sx / count as f64, sy / count as f64)
            } else {
                (0.0, 0.0)
            };
            Node { id: NodeId(i), x, y }
        })
        .collect();

    let mut resolved = Vec::with_capacity(placed.len());
    for (component, t1, t2) in placed {
        let i1 = terminals.insert(t1);
        let i2 = terminals.insert(t2);
        let n1 = root_to_node[&terminals.find(i1)];
        let n2 = root_to_node[&terminals.find(i2)];

        if n1 == n2 {
            warn!(
                "Component '{}' is shorted (both terminals on {}), dropping it",
                component.id, n1
            );
            dropped_components.push(component.id.clone());
            continue;
        }

        trace!("{} ({}) : {} -> {}", component.id, component.element, n1, n2);
        resolved.push(ResolvedComponent {
            id: component.id.clone(),
            element: component.element,
            node1_id: n1,
            node2_id: n2,
        });
    }

    let loops = discover_loops(&nodes, &resolved);

    debug!(
        "Resolved {} terminal(s) into {} node(s), {} component(s), {} loop(s)",
        terminals.len(),
        nodes.len(),
        resolved.len(),
        loops.len()
    );

    CircuitState {
        nodes,
        components: resolved,
        loops,
        dropped_components,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{GridPoint, Orientation};

    fn resistor(id: &str, x: i64, y: i64, o: Orientation) -> PlacedComponent {
        PlacedComponent::on_grid(id, Element::Resistor(10.0), GridPoint::new(x, y), o)
    }

    fn wire(id: &str, a: (i64, i64), b: (i64, i64)) -> Wire {
        Wire::new(id, GridPoint::new(a.0, a.1), GridPoint::new(b.0, b.1))
    }

    /// Source on the left edge, resistor on the right edge, wired into a
    /// rectangle.
    fn square_loop() -> (Vec<PlacedComponent>, Vec<Wire>) {
        let components = vec![
            PlacedComponent::on_grid(
                "V1",
                Element::DcSource(10.0),
                GridPoint::new(0, 1),
                Orientation::Deg270,
            ),
            resistor("R1", 4, 1, Orientation::Deg90),
        ];
        let wires = vec![wire("top", (0, 0), (4, 0)), wire("bottom", (0, 2), (4, 2))];
        (components, wires)
    }

    #[test]
    fn test_empty_input() {
        let state = resolve(&[], &[]);
        assert!(state.nodes.is_empty());
        assert!(state.components.is_empty());
        assert!(state.loops.is_empty());
        assert!(!state.has_complete_circuit());
    }

    #[test]
    fn test_square_loop_resolves_two_nodes() {
        let (components, wires) = square_loop();
        let state = resolve(&components, &wires);

        assert_eq!(state.nodes.len(), 2);
        assert_eq!(state.components.len(), 2);
        assert_eq!(state.loops.len(), 1);

        let l = &state.loops[0];
        assert_eq!(l.len(), 2);
        assert!(l.contains(&"V1".into()));
        assert!(l.contains(&"R1".into()));
    }

    #[test]
    fn test_coincident_points_merge() {
        // A wire endpoint and a component terminal at the same coordinate
        // end up on the same node, as do two component terminals.
        let components = vec![
            resistor("R1", 1, 0, Orientation::Deg0),
            resistor("R2", 3, 0, Orientation::Deg0),
        ];
        let wires = vec![wire("w", (4, 0), (4, 5))];
        let state = resolve(&components, &wires);

        let r1 = state.component(&"R1".into()).unwrap();
        let r2 = state.component(&"R2".into()).unwrap();
        // R1 terminal-2 at (2,0) == R2 terminal-1 at (2,0)
        assert_eq!(r1.node2_id, r2.node1_id);
        // Groups: {(4,0),(4,5)}, (0,0), (2,0)
        assert_eq!(state.nodes.len(), 3);
    }

    #[test]
    fn test_node_centroid() {
        let wires = vec![wire("w", (0, 0), (4, 2))];
        let state = resolve(&[], &wires);
        assert_eq!(state.nodes.len(), 1);
        assert_eq!(state.nodes[0].x, 2.0);
        assert_eq!(state.nodes[0].y, 1.0);
    }

    #[test]
    fn test_dead_short_is_dropped() {
        let (mut components, mut wires) = square_loop();
        components.push(resistor("Rshort", 2, 5, Orientation::Deg0));
        wires.push(wire("bridge", (1, 5), (3, 5)));
        let state = resolve(&components, &wires);

        assert!(state.component(&"Rshort".into()).is_none());
        assert_eq!(state.dropped_components, vec![ComponentId::new("Rshort")]);
        assert_eq!(state.loops.len(), 1);
        assert_eq!(state.placed_components(), 3);
    }

    #[test]
    fn test_shorting_only_component_leaves_no_loop() {
        let components = vec![resistor("R1", 1, 0, Orientation::Deg0)];
        let wires = vec![wire("w", (0, 0), (2, 0))];
        let state = resolve(&components, &wires);
        assert!(state.components.is_empty());
        assert!(state.loops.is_empty());
        assert_eq!(state.placed_components(), 1);
    }

    #[test]
    fn test_component_at_grid_edge_is_dropped() {
        let layout = Layout::from_json(
            r#"{"components":[{"id":"R1","kind":"resistor","value":1,"center":{"x":9223372036854775807,"y":0}}]}"#,
        )
        .unwrap();
        let state = resolve_layout(&layout);
        assert!(state.components.is_empty());
        assert!(state.nodes.is_empty());
        assert_eq!(state.dropped_components, vec![ComponentId::new("R1")]);
    }

    #[test]
    fn test_repeated_id_is_dropped() {
        // V1 a->b, R b->c, R c->a: the second R never joins the graph
        let components = vec![
            PlacedComponent::between("V1", Element::DcSource(10.0), "a", "b"),
            PlacedComponent::between("R", Element::Resistor(10.0), "b", "c"),
            PlacedComponent::between("R", Element::Resistor(10.0), "c", "a"),
        ];
        let state = resolve(&components, &[]);

        assert_eq!(state.components.len(), 2);
        assert_eq!(state.dropped_components, vec![ComponentId::new("R")]);
        assert!(state.loops.is_empty());
        assert_eq!(state.placed_components(), 3);
    }

    #[test]
    fn test_half_turn_flips_loop_direction() {
        let (components, wires) = square_loop();
        let before = resolve(&components, &wires);

        let mut rotated = components.clone();
        rotated[1] = resistor("R1", 4, 1, Orientation::Deg270);
        let after = resolve(&rotated, &wires);

        let id = ComponentId::new("R1");
        let v1 = ComponentId::new("V1");
        let rel_before = before.loops[0].direction_of(&id).unwrap()
            * before.loops[0].direction_of(&v1).unwrap();
        let rel_after = after.loops[0].direction_of(&id).unwrap()
            * after.loops[0].direction_of(&v1).unwrap();
        assert_eq!(rel_before, -rel_after);
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let (components, wires) = square_loop();
        let a = resolve(&components, &wires);
        let b = resolve(&components, &wires);
        assert_eq!(a, b);
    }

    #[test]
    fn test_state_json_shape() {
        let (components, wires) = square_loop();
        let state = resolve(&components, &wires);
        let json = serde_json::to_value(&state).unwrap();

        let c = &json["components"][0];
        assert_eq!(c["id"], "V1");
        assert_eq!(c["kind"], "dc_source");
        assert_eq!(c["value"], 10.0);
        assert!(c.get("node1Id").is_some());
        assert!(c.get("node2Id").is_some());
        assert!(json["loops"][0].get("componentIds").is_some());
        assert!(json.get("droppedComponents").is_none());

        let back: CircuitState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }
}
