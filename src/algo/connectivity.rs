use std::iter::FusedIterator;

use itertools::Itertools;

use super::*;

/// Connectivity queries on undirected graphs
pub trait Connectivity: AdjacencyList + Traversal + Sized {
    /// Returns an iterator over the connected components of the graph.
    /// Each component is emitted as a vector of its nodes.
    fn connected_components(&self) -> ConnectedComponents<'_, Self> {
        ConnectedComponents::new(self)
    }

    /// Returns an iterator over the connected components of the graph after removing `ignore`.
    /// Ignored nodes are not part of any component.
    fn connected_components_exclude_nodes<I>(&self, ignore: I) -> ConnectedComponents<'_, Self>
    where
        I: IntoIterator<Item = Self::Label>,
    {
        ConnectedComponents::new(self).exclude_nodes(ignore)
    }

    /// Returns the number of connected components
    fn number_of_connected_components(&self) -> usize {
        self.connected_components().count()
    }

    /// Returns *true* if every node can be reached from every other node.
    /// The empty graph is considered connected.
    fn is_connected(&self) -> bool {
        match self.vertices().next() {
            None => true,
            Some(start) => self.dfs(start).count() == self.len(),
        }
    }
}

impl<G> Connectivity for G where G: AdjacencyList + Sized {}

/// Iterator over the connected components of an undirected graph
pub struct ConnectedComponents<'a, G>
where
    G: AdjacencyList,
{
    bfs: BFS<'a, G>,
}

impl<'a, G> ConnectedComponents<'a, G>
where
    G: AdjacencyList,
{
    /// Creates the iterator; components are discovered in the order of [`GraphNodeOrder::vertices`]
    pub fn new(graph: &'a G) -> Self {
        Self {
            bfs: TraversalSearch::new_unstarted(graph),
        }
    }

    /// Excludes nodes from all components
    pub fn set_exclude_nodes<I>(&mut self, exclude: I)
    where
        I: IntoIterator<Item = G::Label>,
    {
        self.bfs.exclude_nodes(exclude);
    }

    /// Builder variant of [`ConnectedComponents::set_exclude_nodes`]
    pub fn exclude_nodes<I>(mut self, exclude: I) -> Self
    where
        I: IntoIterator<Item = G::Label>,
    {
        self.set_exclude_nodes(exclude);
        self
    }
}

impl<G> Iterator for ConnectedComponents<'_, G>
where
    G: AdjacencyList,
{
    type Item = Vec<G::Label>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let cc = self.bfs.by_ref().collect_vec();
            if !cc.is_empty() {
                return Some(cc);
            }

            if !self.bfs.try_restart_at_unvisited() {
                return None;
            }
        }
    }
}

impl<G> FusedIterator for ConnectedComponents<'_, G> where G: AdjacencyList {}
