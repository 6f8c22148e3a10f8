use std::{
    cmp::Ordering,
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
};

use crate::node::*;

/// An undirected edge defined by two endpoints.
///
/// Equality, hashing and ordering only look at the normalized pair (smaller endpoint first),
/// hence `Edge(a, b) == Edge(b, a)`. The stored order is kept as given, which lets flow code
/// remember an orientation without affecting set semantics.
#[derive(Copy, Clone)]
pub struct Edge<T = Node>(pub T, pub T);

/// We limit the number of edges to `2^32 - 1`.
pub type NumEdges = u32;

/// Dense edge ids are `0..m`
pub type EdgeId = NumEdges;

impl<T: Display> Display for Edge<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.0, self.1)
    }
}

impl<T: Debug> Debug for Edge<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?},{:?})", self.0, self.1)
    }
}

impl<T: Copy + Ord> Edge<T> {
    /// Normalizes the edge such that the smaller endpoint comes first
    pub fn normalized(&self) -> Self {
        Edge(self.0.min(self.1), self.0.max(self.1))
    }

    /// Returns true if the smaller endpoint comes first
    pub fn is_normalized(&self) -> bool {
        self.0 <= self.1
    }

    /// Returns true if both endpoints are equal
    pub fn is_loop(&self) -> bool {
        self.0 == self.1
    }

    /// Reverses the edge by switching the endpoints
    pub fn reverse(&self) -> Self {
        Edge(self.1, self.0)
    }

    /// Returns true if `u` is one of the endpoints
    pub fn contains(&self, u: T) -> bool {
        self.0 == u || self.1 == u
    }

    /// Returns the endpoint opposite to `u` or `None` if `u` is not incident to the edge
    pub fn opposite_of(&self, u: T) -> Option<T> {
        if self.0 == u {
            Some(self.1)
        } else if self.1 == u {
            Some(self.0)
        } else {
            None
        }
    }

    fn key(&self) -> (T, T) {
        let Edge(u, v) = self.normalized();
        (u, v)
    }
}

impl<T: Copy + Ord> PartialEq for Edge<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<T: Copy + Ord> Eq for Edge<T> {}

impl<T: Copy + Ord + Hash> Hash for Edge<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl<T: Copy + Ord> PartialOrd for Edge<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Copy + Ord> Ord for Edge<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl<T> From<(T, T)> for Edge<T> {
    fn from(value: (T, T)) -> Self {
        Edge(value.0, value.1)
    }
}

impl<T: Copy> From<&(T, T)> for Edge<T> {
    fn from(value: &(T, T)) -> Self {
        Edge(value.0, value.1)
    }
}

impl<T: Copy> From<&Edge<T>> for Edge<T> {
    fn from(value: &Edge<T>) -> Self {
        *value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxhash::FxHashSet;

    #[test]
    fn equality_ignores_orientation() {
        assert_eq!(Edge(1, 2), Edge(2, 1));
        assert_ne!(Edge(1, 2), Edge(1, 3));

        let set: FxHashSet<Edge<u64>> = [Edge(7, 3), Edge(3, 7), Edge(3, 8)].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Edge(7, 3)));
        assert!(set.contains(&Edge(8, 3)));
    }

    #[test]
    fn orientation_is_kept() {
        let e = Edge('b', 'a');
        assert_eq!(e.0, 'b');
        assert!(!e.is_normalized());
        assert_eq!(e.normalized().0, 'a');
        assert_eq!(e.reverse().0, 'a');
    }

    #[test]
    fn opposite_endpoint() {
        let e = Edge(4u32, 9);
        assert_eq!(e.opposite_of(4), Some(9));
        assert_eq!(e.opposite_of(9), Some(4));
        assert_eq!(e.opposite_of(5), None);
        assert!(e.contains(9));
        assert!(Edge(3, 3).is_loop());
    }

    #[test]
    fn ordering_uses_normalized_pair() {
        let mut edges = vec![Edge(5, 1), Edge(2, 0), Edge(1, 3)];
        edges.sort();
        assert_eq!(edges, vec![Edge(0, 2), Edge(1, 3), Edge(1, 5)]);
    }
}
