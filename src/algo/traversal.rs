/*!
Graph traversal iterators.

[`TraversalSearch`] is generic over the frontier (queue -> BFS, stack -> DFS) and over the set
used to remember visited nodes, so the same code walks labelled graphs (hash sets) and dense
graphs (bitsets). Each yielded node's hop count from the start is available through
[`TraversalSearch::hops_of_last`]; for BFS this is the hop distance.
*/

use super::*;
use std::collections::VecDeque;

/// Abstraction for the traversal frontier data structure.
///
/// - [`VecDeque`] -> queue semantics -> **BFS**
/// - [`Vec`] -> stack semantics -> **DFS**
pub trait NodeSequencer<T> {
    /// Creates an empty sequencer
    fn empty() -> Self;

    /// Pushes a node into the frontier.
    fn push(&mut self, item: T);

    /// Removes and returns the next node from the frontier.
    fn pop(&mut self) -> Option<T>;

    /// Returns the number of items currently in the frontier.
    fn cardinality(&self) -> usize;
}

impl<T> NodeSequencer<T> for VecDeque<T> {
    fn empty() -> Self {
        VecDeque::new()
    }
    fn push(&mut self, u: T) {
        self.push_back(u)
    }
    fn pop(&mut self) -> Option<T> {
        self.pop_front()
    }
    fn cardinality(&self) -> usize {
        self.len()
    }
}

impl<T> NodeSequencer<T> for Vec<T> {
    fn empty() -> Self {
        Vec::new()
    }
    fn push(&mut self, u: T) {
        self.push(u)
    }
    fn pop(&mut self) -> Option<T> {
        self.pop()
    }
    fn cardinality(&self) -> usize {
        self.len()
    }
}

/// A node on the frontier together with the number of hops taken to discover it
pub type HopsToNode<L> = (L, NumNodes);

/// Generic traversal iterator supporting BFS and DFS variants.
pub struct TraversalSearch<'a, G, S, V>
where
    G: AdjacencyList,
    S: NodeSequencer<HopsToNode<G::Label>>,
    V: Set<G::Label>,
{
    graph: &'a G,
    visited: V,
    sequencer: S,
    last_hops: NumNodes,
}

/// A BFS traversal iterator over the graph using the graph's preferred node set
pub type BFS<'a, G> = TraversalSearch<
    'a,
    G,
    VecDeque<HopsToNode<<G as GraphNodeOrder>::Label>>,
    <G as GraphNodeOrder>::NodeSet,
>;

/// A DFS traversal iterator over the graph using the graph's preferred node set
pub type DFS<'a, G> = TraversalSearch<
    'a,
    G,
    Vec<HopsToNode<<G as GraphNodeOrder>::Label>>,
    <G as GraphNodeOrder>::NodeSet,
>;

impl<G, S, V> Iterator for TraversalSearch<'_, G, S, V>
where
    G: AdjacencyList,
    S: NodeSequencer<HopsToNode<G::Label>>,
    V: Set<G::Label>,
{
    type Item = G::Label;

    fn next(&mut self) -> Option<Self::Item> {
        let (u, hops) = self.sequencer.pop()?;
        for v in self.graph.neighbors_of(u) {
            if self.visited.insert(v) {
                self.sequencer.push((v, hops + 1));
            }
        }
        self.last_hops = hops;
        Some(u)
    }
}

impl<'a, G, S, V> TraversalSearch<'a, G, S, V>
where
    G: AdjacencyList,
    S: NodeSequencer<HopsToNode<G::Label>>,
    V: Set<G::Label> + FromCapacity,
{
    /// Creates a new traversal iterator starting from `start`.
    pub fn new(graph: &'a G, start: G::Label) -> Self {
        let mut search = Self::new_unstarted(graph);
        search.visited.insert(start);
        search.sequencer.push((start, 0));
        search
    }

    /// Creates a traversal iterator without a start node; use
    /// [`TraversalSearch::try_restart_at_unvisited`] to begin.
    pub fn new_unstarted(graph: &'a G) -> Self {
        let len = graph.len();
        Self {
            graph,
            visited: V::from_total_used_capacity(len, len),
            sequencer: S::empty(),
            last_hops: 0,
        }
    }
}

impl<G, S, V> TraversalSearch<'_, G, S, V>
where
    G: AdjacencyList,
    S: NodeSequencer<HopsToNode<G::Label>>,
    V: Set<G::Label>,
{
    /// Number of hops from the (re)start node to the node returned last by `next`
    pub fn hops_of_last(&self) -> NumNodes {
        self.last_hops
    }

    /// Tries to restart the search at a yet unvisited node and returns
    /// true iff successful. Requires that the search came to a hold earlier,
    /// i.e. self.next() returned None
    pub fn try_restart_at_unvisited(&mut self) -> bool {
        debug_assert_eq!(self.sequencer.cardinality(), 0);
        let node = self.graph.vertices().find(|u| !self.visited.contains(u));
        match node {
            None => false,
            Some(x) => {
                self.visited.insert(x);
                self.sequencer.push((x, 0));
                true
            }
        }
    }

    /// Excludes a node from the search. It will be treated as if it was already visited,
    /// i.e. no edges to or from that node will be taken.
    ///
    /// # Warning
    /// Calling this method has no effect if the node is already on the frontier. It is therefore
    /// highly recommended to call this method directly after the constructor.
    pub fn exclude_node(&mut self, u: G::Label) {
        self.visited.insert(u);
    }

    /// Exclude multiple nodes from traversal.
    pub fn exclude_nodes<N>(&mut self, us: N)
    where
        N: IntoIterator<Item = G::Label>,
    {
        for u in us {
            self.exclude_node(u);
        }
    }

    /// Builder variant of [`TraversalSearch::exclude_nodes`]
    pub fn with_nodes_excluded<N>(mut self, us: N) -> Self
    where
        N: IntoIterator<Item = G::Label>,
    {
        self.exclude_nodes(us);
        self
    }
}

/// Traversal algorithms exposed as methods on the graph
pub trait Traversal: AdjacencyList + Sized {
    /// Returns an iterator traversing nodes in breadth-first-search order
    ///
    /// # Example
    /// ```
    /// use ndtree::{prelude::*, algo::*};
    ///
    /// let graph = Graph::from_edges([(0u32, 1), (1, 2), (2, 3)]);
    /// let mut bfs = graph.bfs(1);
    /// let mut order = Vec::new();
    /// while let Some(u) = bfs.next() {
    ///     order.push((u, bfs.hops_of_last()));
    /// }
    /// order.sort();
    /// assert_eq!(order, vec![(0, 1), (1, 0), (2, 1), (3, 2)]);
    /// ```
    fn bfs(&self, start: Self::Label) -> BFS<'_, Self> {
        TraversalSearch::new(self, start)
    }

    /// Returns an iterator traversing nodes in depth-first-search order
    fn dfs(&self, start: Self::Label) -> DFS<'_, Self> {
        TraversalSearch::new(self, start)
    }

    /// Returns *true* if `target` can be reached from `start`
    fn is_node_reachable(&self, start: Self::Label, target: Self::Label) -> bool {
        self.dfs(start).any(|u| u == target)
    }
}

impl<G: AdjacencyList + Sized> Traversal for G {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repr::EdgeIndexedGraph;
    use itertools::Itertools;

    #[test]
    fn bfs_hops_on_dense_graph() {
        let graph =
            EdgeIndexedGraph::from_edges(7, [(0, 1), (1, 2), (2, 3), (0, 4), (4, 3), (5, 6)])
                .unwrap();

        let mut hops = vec![INVALID_NODE; 7];
        let mut bfs = graph.bfs(0);
        while let Some(u) = bfs.next() {
            hops[u as usize] = bfs.hops_of_last();
        }
        assert_eq!(hops, vec![0, 1, 2, 2, 1, INVALID_NODE, INVALID_NODE]);
    }

    #[test]
    fn dfs_visits_component() {
        let graph = Graph::from_edges([('a', 'b'), ('b', 'c'), ('d', 'e')]);
        assert_eq!(graph.dfs('c').sorted().collect_vec(), vec!['a', 'b', 'c']);
        assert!(graph.is_node_reachable('a', 'c'));
        assert!(!graph.is_node_reachable('a', 'e'));
    }

    #[test]
    fn excluded_nodes_block_paths() {
        let graph = Graph::from_edges([(0u32, 1), (1, 2), (0, 3), (3, 2)]);
        let reached = graph
            .bfs(0)
            .with_nodes_excluded([1])
            .sorted()
            .collect_vec();
        assert_eq!(reached, vec![0, 2, 3]);
    }

    #[test]
    fn restart_covers_all_nodes() {
        let graph = Graph::from_edges([(0u32, 1), (2, 3), (4, 5)]);
        let mut bfs: BFS<'_, Graph<u32>> = TraversalSearch::new_unstarted(&graph);
        let mut seen = Vec::new();
        while bfs.try_restart_at_unvisited() {
            seen.extend(bfs.by_ref());
        }
        seen.sort();
        assert_eq!(seen, (0..6).collect_vec());
    }
}
