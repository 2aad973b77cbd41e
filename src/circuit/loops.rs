//! Independent loop discovery.
//!
//! A breadth-first spanning forest is grown over the node graph. Every
//! component that is not a tree edge closes exactly one fundamental loop:
//! the back edge itself plus the tree paths from both of its ends to their
//! lowest common ancestor. The resulting loop set spans the cycle space, so
//! its size is `E - V + C`.

use std::collections::{HashMap, HashSet, VecDeque};

use log::trace;

use super::graph::{Loop, Node, ResolvedComponent};
use super::types::{LoopId, NodeId};

/// An incidence of a component on a node.
#[derive(Debug, Clone, Copy)]
struct Edge {
    /// Index into the component list
    component: usize,
    /// Node at the far end
    to: NodeId,
}

/// Undirected multigraph: one edge per component.
struct Adjacency {
    edges: HashMap<NodeId, Vec<Edge>>,
}

impl Adjacency {
    fn new(nodes: &[Node], components: &[ResolvedComponent]) -> Self {
        let mut edges: HashMap<NodeId, Vec<Edge>> =
            nodes.iter().map(|n| (n.id, Vec::new())).collect();
        for (i, c) in components.iter().enumerate() {
            if c.node1_id == c.node2_id {
                continue;
            }
            edges.entry(c.node1_id).or_default().push(Edge {
                component: i,
                to: c.node2_id,
            });
            edges.entry(c.node2_id).or_default().push(Edge {
                component: i,
                to: c.node1_id,
            });
        }
        Self { edges }
    }

    fn edges(&self, node: NodeId) -> &[Edge] {
        self.edges.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Spanning forest: parent node and connecting component per visited node.
type ParentMap = HashMap<NodeId, (NodeId, usize)>;

/// Find one independent loop per back edge of a BFS spanning forest.
///
/// Traversal starts from every not-yet-visited node in `nodes` order, so
/// disconnected pieces are all covered.
pub fn discover_loops(nodes: &[Node], components: &[ResolvedComponent]) -> Vec<Loop> {
    let adjacency = Adjacency::new(nodes, components);
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut parent: ParentMap = HashMap::new();
    // Components already in the tree or already used to close a loop
    let mut used: HashSet<usize> = HashSet::new();
    let mut loops = Vec::new();

    for start in nodes {
        if !visited.insert(start.id) {
            continue;
        }
        let mut queue = VecDeque::from([start.id]);

        while let Some(curr) = queue.pop_front() {
            for edge in adjacency.edges(curr) {
                if used.contains(&edge.component) {
                    continue;
                }
                used.insert(edge.component);

                if visited.insert(edge.to) {
                    parent.insert(edge.to, (curr, edge.component));
                    queue.push_back(edge.to);
                } else {
                    let id = LoopId(loops.len());
                    let found = close_loop(id, curr, edge.to, edge.component, &parent, components);
                    trace!("{}: {:?} {:?}", id, found.component_ids, found.direction);
                    loops.push(found);
                }
            }
        }
    }

    loops
}

/// Build the loop closed by the back edge `back` between `curr` and `target`.
fn close_loop(
    id: LoopId,
    curr: NodeId,
    target: NodeId,
    back: usize,
    parent: &ParentMap,
    components: &[ResolvedComponent],
) -> Loop {
    let mut ancestors = HashSet::new();
    let mut n = curr;
    loop {
        ancestors.insert(n);
        match parent.get(&n) {
            Some(&(p, _)) => n = p,
            None => break,
        }
    }

    // target -> LCA
    let mut up_from_target = Vec::new();
    let mut n = target;
    while !ancestors.contains(&n) {
        match parent.get(&n) {
            Some(&(p, c)) => {
                up_from_target.push(c);
                n = p;
            }
            None => break,
        }
    }
    let lca = n;

    // curr -> LCA, walked in reverse below
    let mut up_from_curr = Vec::new();
    let mut n = curr;
    while n != lca {
        match parent.get(&n) {
            Some(&(p, c)) => {
                up_from_curr.push(c);
                n = p;
            }
            None => break,
        }
    }

    let sequence = std::iter::once(back)
        .chain(up_from_target)
        .chain(up_from_curr.into_iter().rev());

    let mut component_ids = Vec::new();
    let mut direction = Vec::new();
    let mut cursor = curr;
    for i in sequence {
        let c = &components[i];
        if cursor == c.node1_id {
            direction.push(1);
            cursor = c.node2_id;
        } else {
            direction.push(-1);
            cursor = c.node1_id;
        }
        component_ids.push(c.id.clone());
    }
    debug_assert_eq!(cursor, curr, "loop {} does not close", id);

    Loop {
        id,
        component_ids,
        direction,
    }
}

/// Count connected pieces of the node graph, isolated nodes included.
pub fn count_components(nodes: &[Node], components: &[ResolvedComponent]) -> usize {
    let adjacency = Adjacency::new(nodes, components);
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut count = 0;

    for start in nodes {
        if !visited.insert(start.id) {
            continue;
        }
        count += 1;
        let mut queue = VecDeque::from([start.id]);
        while let Some(curr) = queue.pop_front() {
            for edge in adjacency.edges(curr) {
                if visited.insert(edge.to) {
                    queue.push_back(edge.to);
                }
            }
        }
    }

    count
}
