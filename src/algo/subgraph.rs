/*!
# Subgraph Algorithms

Extraction of vertex-induced subgraphs and of the edges leaving a node set.
*/

use fxhash::FxHashSet;

use super::*;

/// A trait for creating subgraphs of a labelled graph
pub trait Subgraph: AdjacencyList {
    /// Creates the **vertex-induced subgraph** on `vertices` as a graph of type `GO`.
    /// Nodes that are not part of `self` are ignored; labels are kept.
    fn vertex_induced_as<GO, I>(&self, vertices: I) -> GO
    where
        GO: GraphEdgeEditing<Label = Self::Label>,
        I: IntoIterator<Item = Self::Label>;

    /// Creates the vertex-induced subgraph of the same type as `Self`.
    fn vertex_induced<I>(&self, vertices: I) -> Self
    where
        Self: GraphEdgeEditing,
        I: IntoIterator<Item = Self::Label>,
    {
        self.vertex_induced_as(vertices)
    }

    /// Returns all edges `{u, v}` with `u` in `nodes` and `v` not contained in `inside`.
    /// If `nodes` and `inside` describe the same set, every such edge is reported exactly once.
    fn edges_leaving<I, S>(&self, nodes: I, inside: &S) -> Vec<Edge<Self::Label>>
    where
        I: IntoIterator<Item = Self::Label>,
        S: Set<Self::Label>,
    {
        nodes
            .into_iter()
            .flat_map(|u| {
                self.neighbors_of(u)
                    .filter(|v| !inside.contains(v))
                    .map(move |v| Edge(u, v))
            })
            .collect()
    }
}

impl<G> Subgraph for G
where
    G: AdjacencyList,
{
    fn vertex_induced_as<GO, I>(&self, vertices: I) -> GO
    where
        GO: GraphEdgeEditing<Label = Self::Label>,
        I: IntoIterator<Item = Self::Label>,
    {
        let vertices: FxHashSet<_> = vertices.into_iter().filter(|&u| self.has_vertex(u)).collect();

        let mut graph = GO::new();
        for &u in &vertices {
            graph.add_node(u);
            for v in self.neighbors_of(u) {
                if u < v && vertices.contains(&v) {
                    graph.try_add_edge(u, v);
                }
            }
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn induced_subgraph_keeps_inner_edges() {
        let graph = Graph::from_edges([(1u32, 2), (2, 3), (3, 4), (4, 1), (1, 3)]);
        let sub = graph.vertex_induced([1, 2, 3, 9]);

        assert_eq!(sub.ordered_vertices(), vec![1, 2, 3]);
        assert_eq!(sub.ordered_edges(), vec![Edge(1, 2), Edge(1, 3), Edge(2, 3)]);
    }

    #[test]
    fn induced_subgraph_keeps_isolated_nodes() {
        let graph = Graph::from_edges([(1u32, 2), (2, 3)]);
        let sub = graph.vertex_induced([1, 3]);
        assert_eq!(sub.number_of_nodes(), 2);
        assert_eq!(sub.number_of_edges(), 0);
    }

    #[test]
    fn leaving_edges() {
        let graph = Graph::from_edges([(1u32, 2), (2, 3), (3, 4), (4, 1), (1, 3)]);
        let inside: FxHashSet<u32> = [1, 3].into_iter().collect();
        let mut leaving = graph.edges_leaving(inside.iter().copied(), &inside);
        leaving.sort();
        assert_eq!(
            leaving,
            vec![Edge(1, 2), Edge(1, 4), Edge(2, 3), Edge(3, 4)]
        );
    }
}
