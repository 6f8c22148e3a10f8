use std::fmt::Debug;

use fxhash::{FxHashMap, FxHashSet};
use itertools::Itertools;

use super::*;

/// An undirected labelled graph.
///
/// Nodes are arbitrary [`NodeLabel`]s, the adjacency of every node is an `FxHashSet`.
/// Parallel edges and self loops are never stored, and every edge endpoint is a node.
#[derive(Clone, PartialEq, Eq)]
pub struct UndirectedGraph<T: NodeLabel> {
    nbs: FxHashMap<T, FxHashSet<T>>,
    num_edges: NumEdges,
}

/// The labelled graph type used throughout the crate
pub type Graph<T> = UndirectedGraph<T>;

impl<T: NodeLabel> Default for UndirectedGraph<T> {
    fn default() -> Self {
        Self {
            nbs: FxHashMap::default(),
            num_edges: 0,
        }
    }
}

impl<T: NodeLabel> Debug for UndirectedGraph<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UndirectedGraph")
            .field("nodes", &self.ordered_vertices())
            .field("edges", &self.ordered_edges())
            .finish()
    }
}

impl<T: NodeLabel> UndirectedGraph<T> {
    /// Creates an empty graph with room for `n` nodes
    pub fn with_capacity(n: usize) -> Self {
        Self {
            nbs: FxHashMap::with_capacity_and_hasher(n, Default::default()),
            num_edges: 0,
        }
    }

    /// Returns the set of all normalized edges
    pub fn edge_set(&self) -> FxHashSet<Edge<T>> {
        self.edges(true).collect()
    }

    /// Returns the set of all nodes
    pub fn node_set(&self) -> FxHashSet<T> {
        self.vertices().collect()
    }

    /// Returns *true* if both graphs have exactly the same nodes and edges
    pub fn same_structure(&self, other: &Self) -> bool {
        self.number_of_nodes() == other.number_of_nodes()
            && self.number_of_edges() == other.number_of_edges()
            && self.nbs == other.nbs
    }

    /// Removes `u` together with all incident edges. Returns *true* if `u` was a node.
    pub fn remove_node(&mut self, u: T) -> bool {
        let Some(nbs) = self.nbs.remove(&u) else {
            return false;
        };
        for v in nbs.iter() {
            if let Some(nbs_of_v) = self.nbs.get_mut(v) {
                nbs_of_v.remove(&u);
            }
        }
        self.num_edges -= nbs.len() as NumEdges;
        true
    }

    /// Returns the isolated nodes of the graph in sorted order
    pub fn isolated_nodes(&self) -> Vec<T> {
        self.nbs
            .iter()
            .filter_map(|(&u, nbs)| nbs.is_empty().then_some(u))
            .sorted_unstable()
            .collect_vec()
    }
}

impl<T: NodeLabel> GraphNodeOrder for UndirectedGraph<T> {
    type Label = T;
    type NodeSet = FxHashSet<T>;

    fn number_of_nodes(&self) -> NumNodes {
        self.nbs.len() as NumNodes
    }

    fn vertices(&self) -> impl Iterator<Item = T> + '_ {
        self.nbs.keys().copied()
    }

    fn has_vertex(&self, u: T) -> bool {
        self.nbs.contains_key(&u)
    }
}

impl<T: NodeLabel> GraphEdgeOrder for UndirectedGraph<T> {
    fn number_of_edges(&self) -> NumEdges {
        self.num_edges
    }
}

impl<T: NodeLabel> AdjacencyList for UndirectedGraph<T> {
    fn neighbors_of(&self, u: T) -> impl Iterator<Item = T> + '_ {
        self.nbs.get(&u).into_iter().flat_map(|nbs| nbs.iter().copied())
    }

    fn degree_of(&self, u: T) -> NumNodes {
        self.nbs.get(&u).map_or(0, |nbs| nbs.len() as NumNodes)
    }
}

impl<T: NodeLabel> AdjacencyTest for UndirectedGraph<T> {
    fn has_edge(&self, u: T, v: T) -> bool {
        self.nbs.get(&u).is_some_and(|nbs| nbs.contains(&v))
    }
}

impl<T: NodeLabel> GraphNew for UndirectedGraph<T> {
    fn new() -> Self {
        Self::default()
    }
}

impl<T: NodeLabel> GraphEdgeEditing for UndirectedGraph<T> {
    fn add_node(&mut self, u: T) -> bool {
        if self.nbs.contains_key(&u) {
            return false;
        }
        self.nbs.insert(u, FxHashSet::default());
        true
    }

    fn try_add_edge(&mut self, u: T, v: T) -> bool {
        if u == v {
            return false;
        }
        if !self.nbs.entry(u).or_default().insert(v) {
            return false;
        }
        self.nbs.entry(v).or_default().insert(u);
        self.num_edges += 1;
        true
    }

    fn try_remove_edge(&mut self, u: T, v: T) -> bool {
        let removed = self.nbs.get_mut(&u).is_some_and(|nbs| nbs.remove(&v));
        if removed {
            if let Some(nbs) = self.nbs.get_mut(&v) {
                nbs.remove(&u);
            }
            self.num_edges -= 1;
        }
        removed
    }
}
