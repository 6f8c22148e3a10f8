/*!
# Substructure Generators

This module provides utility methods to generate additional **substructures**
inside an already existing labelled graph: paths, cycles and cliques.
Missing nodes are inserted on the fly; edges that already exist are skipped.

# Example

```rust
use ndtree::{prelude::*, gens::*};

let mut g = Graph::new();
g.connect_path([0u32, 1, 2]);
g.connect_cycle([2, 3, 4]);
g.connect_clique([0, 2, 4]);

assert_eq!(
    g.ordered_edges(),
    vec![Edge(0, 1), Edge(0, 2), Edge(0, 4), Edge(1, 2), Edge(2, 3), Edge(2, 4), Edge(3, 4)]
);
```
*/

use itertools::Itertools;

use super::*;

/// Trait for creating additional **substructures** (paths, cycles, cliques)
/// inside an already existing graph.
pub trait GeneratorSubstructures: GraphNodeOrder {
    /// Connects the given nodes in order with a **simple path**.
    fn connect_path<P>(&mut self, nodes_on_path: P)
    where
        P: IntoIterator<Item = Self::Label>;

    /// Connects the given nodes with a **cycle**, i.e. a path whose last node is
    /// additionally connected to its first one.
    fn connect_cycle<C>(&mut self, nodes_in_cycle: C)
    where
        C: IntoIterator<Item = Self::Label>;

    /// Connects all given nodes into a **clique** (complete subgraph).
    fn connect_clique<C>(&mut self, nodes: C)
    where
        C: IntoIterator<Item = Self::Label>;
}

impl<G> GeneratorSubstructures for G
where
    G: GraphEdgeEditing,
{
    fn connect_path<P>(&mut self, nodes_on_path: P)
    where
        P: IntoIterator<Item = Self::Label>,
    {
        let mut iter = nodes_on_path.into_iter().peekable();
        if let Some(&first) = iter.peek() {
            self.add_node(first);
        }
        for (u, v) in iter.tuple_windows() {
            self.try_add_edge(u, v);
        }
    }

    fn connect_cycle<C>(&mut self, nodes_in_cycle: C)
    where
        C: IntoIterator<Item = Self::Label>,
    {
        let mut iter = nodes_in_cycle.into_iter();

        // walk the cycle manually so the iterator need not be cloneable
        if let Some(first) = iter.next() {
            self.add_node(first);
            let mut prev = first;
            for cur in iter {
                self.try_add_edge(prev, cur);
                prev = cur;
            }

            self.try_add_edge(prev, first);
        }
    }

    fn connect_clique<C>(&mut self, nodes: C)
    where
        C: IntoIterator<Item = Self::Label>,
    {
        let nodes = nodes.into_iter().collect_vec();
        self.add_nodes(nodes.iter().copied());
        for (&u, &v) in nodes.iter().tuple_combinations() {
            self.try_add_edge(u, v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_path() {
        let mut g: Graph<u32> = Graph::new();
        g.connect_path([]);
        assert!(g.is_empty());

        g.connect_path([1]);
        assert_eq!(g.number_of_nodes(), 1);
        assert_eq!(g.number_of_edges(), 0);

        let mut g = Graph::new();
        g.connect_path([0u32, 3, 1, 4]);
        assert_eq!(g.ordered_edges(), vec![Edge(0, 3), Edge(1, 3), Edge(1, 4)]);
    }

    #[test]
    fn test_connect_cycle() {
        let mut g: Graph<u32> = Graph::new();
        g.connect_cycle([1]);
        assert_eq!(g.number_of_nodes(), 1);
        assert_eq!(g.number_of_edges(), 0);

        let mut g = Graph::new();
        g.connect_cycle([0u32, 3, 1, 4]);
        assert_eq!(
            g.ordered_edges(),
            vec![Edge(0, 3), Edge(0, 4), Edge(1, 3), Edge(1, 4)]
        );
    }

    #[test]
    fn test_connect_clique() {
        let mut g = Graph::new();
        g.connect_clique(['a', 'b', 'c', 'd']);
        assert_eq!(g.number_of_edges(), 6);

        // existing edges are kept, not duplicated
        g.connect_clique(['a', 'b', 'e']);
        assert_eq!(g.number_of_edges(), 8);
    }
}
