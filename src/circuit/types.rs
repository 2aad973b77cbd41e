//! Core types for circuit representation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LoopflowError;

/// A unique identifier for an electrical node.
///
/// Node ids are assigned fresh on every [`resolve`](super::resolve) call, in
/// order of first appearance of their terminal points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// A caller-supplied component identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(pub String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Identifier of one independent loop (mesh).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoopId(pub usize);

impl fmt::Display for LoopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// A terminal point on the placement grid.
///
/// Two points are the same physical point iff their coordinates are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i64,
    pub y: i64,
}

impl GridPoint {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Offset this point by (dx, dy) grid units, or `None` if the result
    /// falls off the `i64` grid.
    pub fn checked_offset(self, dx: i64, dy: i64) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Placement rotation of a two-terminal component.
///
/// Serialized as the integer number of degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Orientation {
    /// Horizontal, terminal-1 on the left
    #[default]
    Deg0,
    /// Vertical, terminal-1 on top
    Deg90,
    /// Horizontal, terminal-1 on the right
    Deg180,
    /// Vertical, terminal-1 at the bottom
    Deg270,
}

impl Orientation {
    pub fn degrees(self) -> i64 {
        match self {
            Orientation::Deg0 => 0,
            Orientation::Deg90 => 90,
            Orientation::Deg180 => 180,
            Orientation::Deg270 => 270,
        }
    }

    /// Whether this orientation swaps the roles of the two physical terminals.
    pub fn is_reversed(self) -> bool {
        matches!(self, Orientation::Deg180 | Orientation::Deg270)
    }

    /// Rotate by 180 degrees.
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Deg0 => Orientation::Deg180,
            Orientation::Deg90 => Orientation::Deg270,
            Orientation::Deg180 => Orientation::Deg0,
            Orientation::Deg270 => Orientation::Deg90,
        }
    }
}

impl TryFrom<i64> for Orientation {
    type Error = LoopflowError;

    fn try_from(degrees: i64) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Orientation::Deg0),
            90 => Ok(Orientation::Deg90),
            180 => Ok(Orientation::Deg180),
            270 => Ok(Orientation::Deg270),
            _ => Err(LoopflowError::InvalidOrientation { degrees }),
        }
    }
}

impl From<Orientation> for i64 {
    fn from(orientation: Orientation) -> Self {
        orientation.degrees()
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_from_degrees() {
        assert_eq!(Orientation::try_from(90).unwrap(), Orientation::Deg90);
        assert_eq!(Orientation::try_from(270).unwrap(), Orientation::Deg270);
        assert!(matches!(
            Orientation::try_from(45),
            Err(LoopflowError::InvalidOrientation { degrees: 45 })
        ));
    }

    #[test]
    fn test_orientation_serde() {
        let o: Orientation = serde_json::from_str("180").unwrap();
        assert_eq!(o, Orientation::Deg180);
        assert_eq!(serde_json::to_string(&Orientation::Deg90).unwrap(), "90");
        assert!(serde_json::from_str::<Orientation>("30").is_err());
    }

    #[test]
    fn test_checked_offset_at_grid_edge() {
        let p = GridPoint::new(i64::MAX, 0);
        assert_eq!(p.checked_offset(-1, 0), Some(GridPoint::new(i64::MAX - 1, 0)));
        assert_eq!(p.checked_offset(1, 0), None);
        assert_eq!(GridPoint::new(0, i64::MIN).checked_offset(0, -1), None);
    }

    #[test]
    fn test_flipped_reverses_terminals() {
        for o in [Orientation::Deg0, Orientation::Deg90] {
            assert!(!o.is_reversed());
            assert!(o.flipped().is_reversed());
            assert_eq!(o.flipped().flipped(), o);
        }
    }
}
