//! Disjoint-set forest over terminal identities.

use std::collections::HashMap;

use super::layout::TerminalKey;

/// Union-find over [`TerminalKey`]s.
///
/// Members are numbered in order of first insertion, which makes root
/// enumeration (and therefore node numbering) deterministic for a given
/// input order.
#[derive(Debug, Default)]
pub struct TerminalSet {
    index: HashMap<TerminalKey, usize>,
    keys: Vec<TerminalKey>,
    parent: Vec<usize>,
}

impl TerminalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a terminal as its own singleton set (no-op if present).
    /// Returns its member index.
    pub fn insert(&mut self, key: TerminalKey) -> usize {
        if let Some(&i) = self.index.get(&key) {
            return i;
        }
        let i = self.keys.len();
        self.index.insert(key.clone(), i);
        self.keys.push(key);
        self.parent.push(i);
        i
    }

    /// Root of the set containing member `i`, with path halving.
    pub fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    /// Merge the sets containing `a` and `b`, inserting either if needed.
    pub fn union(&mut self, a: TerminalKey, b: TerminalKey) {
        let ia = self.insert(a);
        let ib = self.insert(b);
        let ra = self.find(ia);
        let rb = self.find(ib);
        if ra != rb {
            // Keep the earlier member as root so roots stay stable.
            let (root, child) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[child] = root;
        }
    }

    /// Members in insertion order.
    pub fn keys(&self) -> &[TerminalKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::GridPoint;

    fn p(x: i64, y: i64) -> TerminalKey {
        TerminalKey::Point(GridPoint::new(x, y))
    }

    #[test]
    fn test_union_is_transitive() {
        let mut set = TerminalSet::new();
        set.union(p(0, 0), p(1, 0));
        set.union(p(2, 0), p(1, 0));
        let c = set.insert(p(5, 5));

        let a = set.insert(p(0, 0));
        let b = set.insert(p(2, 0));
        assert_eq!(set.find(a), set.find(b));
        assert_ne!(set.find(a), set.find(c));
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut set = TerminalSet::new();
        let a = set.insert(p(3, 4));
        let b = set.insert(p(3, 4));
        assert_eq!(a, b);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_named_and_point_keys_stay_apart() {
        let mut set = TerminalSet::new();
        let a = set.insert(TerminalKey::Named("n1".into()));
        let b = set.insert(p(0, 0));
        assert_ne!(set.find(a), set.find(b));
    }

    #[test]
    fn test_root_is_first_member() {
        let mut set = TerminalSet::new();
        set.insert(p(9, 9));
        set.union(p(1, 1), p(9, 9));
        let i = set.insert(p(1, 1));
        assert_eq!(set.find(i), 0);
    }
}
