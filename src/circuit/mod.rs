//! Topology resolution and the resolved circuit representation.
//!
//! This module turns an editor [`Layout`] into a [`CircuitState`]: terminal
//! points are merged into electrical nodes with a disjoint-set, components
//! are remapped onto those nodes, and the independent loops of the resulting
//! multigraph are enumerated from a BFS spanning forest.

mod disjoint;
mod graph;
mod layout;
mod loops;
mod types;
mod validate;

pub use graph::{resolve, resolve_layout, CircuitState, Loop, Node, ResolvedComponent};
pub use layout::{terminal_points, Layout, PlacedComponent, Placement, TerminalKey, Wire, TERMINAL_OFFSET};
pub use types::*;
pub use validate::{validate_circuit, validate_layout};
