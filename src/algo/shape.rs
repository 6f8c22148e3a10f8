/*!
# Shape Predicates

Cheap structural checks deciding whether a (sub)graph can be stored as a leaf of a nested
dissection tree: complete graphs (cliques) and trees need no further separation.
*/

use num::integer::binomial;

use super::*;

/// Structural predicates on undirected graphs
pub trait GraphShape: Connectivity + GraphEdgeOrder {
    /// Returns *true* if every pair of distinct nodes is adjacent,
    /// i.e. the graph has exactly `n(n-1)/2` edges. The empty graph is a clique.
    fn is_clique(&self) -> bool {
        binomial(self.number_of_nodes() as u64, 2) == self.number_of_edges() as u64
    }

    /// Returns *true* if the graph is connected and has exactly `n - 1` edges
    fn is_tree(&self) -> bool {
        !self.is_empty()
            && self.number_of_edges() as u64 + 1 == self.number_of_nodes() as u64
            && self.is_connected()
    }

    /// Returns *true* if the graph contains a cycle
    fn is_cyclic(&self) -> bool {
        // a forest with c components has exactly n - c edges
        let forest_edges = self.len() - self.number_of_connected_components();
        self.number_of_edges() as usize > forest_edges
    }

    /// Returns *true* if the graph is a clique or a tree
    fn is_clique_or_tree(&self) -> bool {
        self.is_clique() || self.is_tree()
    }
}

impl<G> GraphShape for G where G: Connectivity + GraphEdgeOrder {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gens::*;

    #[test]
    fn cliques() {
        for n in 0..8u32 {
            let mut graph = Graph::new();
            graph.add_nodes(0..n);
            graph.connect_clique(0..n);
            assert!(graph.is_clique(), "n = {n}");
            assert_eq!(graph.is_tree(), n == 1 || n == 2);
        }

        let mut graph = Graph::new();
        graph.connect_clique(0u32..5);
        graph.try_remove_edge(1, 3);
        assert!(!graph.is_clique());
    }

    #[test]
    fn trees_and_cycles() {
        let mut path = Graph::new();
        path.connect_path([1u32, 2, 3, 4]);
        assert!(path.is_tree());
        assert!(!path.is_clique());
        assert!(!path.is_cyclic());

        let mut cycle = Graph::new();
        cycle.connect_cycle([1u32, 2, 3, 4]);
        assert!(!cycle.is_tree());
        assert!(!cycle.is_clique());
        assert!(cycle.is_cyclic());

        // n - 1 edges but disconnected
        let mut split = Graph::from_edges([(0u32, 1), (1, 2), (2, 0)]);
        split.add_node(3);
        assert!(!split.is_tree());
        assert!(split.is_cyclic());

        let empty: Graph<u32> = Graph::new();
        assert!(!empty.is_tree());
        assert!(empty.is_clique());
        assert!(!empty.is_cyclic());
    }
}
