/*!
# Graph Operations

Traits shared by all graph representations of this crate. Every trait is generic over the
node type through the associated [`GraphNodeOrder::Label`]: labelled graphs use their label type,
dense graphs use [`Node`].
*/

use itertools::Itertools;

use crate::{error::describe, prelude::*, utils::*};

/// Provides getters pertaining to the node-size of a graph
pub trait GraphNodeOrder {
    /// Identifier of a node
    type Label: NodeLabel;

    /// Set type best suited to store nodes of this graph (used for visited-states)
    type NodeSet: Set<Self::Label> + FromCapacity;

    /// Returns the number of nodes of the graph
    fn number_of_nodes(&self) -> NumNodes;

    /// Return the number of nodes as usize
    fn len(&self) -> usize {
        self.number_of_nodes() as usize
    }

    /// Returns an iterator over V.
    fn vertices(&self) -> impl Iterator<Item = Self::Label> + '_;

    /// Returns *true* if `u` is a node of the graph
    fn has_vertex(&self, u: Self::Label) -> bool;

    /// Returns *true* if the graph has no nodes (and thus no edges)
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Provides getters pertaining to the edge-size of a graph
pub trait GraphEdgeOrder {
    /// Returns the number of (undirected) edges of the graph
    fn number_of_edges(&self) -> NumEdges;
}

/// Traits pertaining getters for neighborhoods & edges
pub trait AdjacencyList: GraphNodeOrder + Sized {
    /// Returns an iterator over the (open) neighborhood of a given vertex.
    /// Unknown vertices have an empty neighborhood.
    fn neighbors_of(&self, u: Self::Label) -> impl Iterator<Item = Self::Label> + '_;

    /// If v has degree two (i.e. neighbors [u, w]), this function continues
    /// the walk `u`, `v`, `w` and returns `Some(w)`. Otherwise it returns `None`.
    fn continue_path(&self, u: Self::Label, v: Self::Label) -> Option<Self::Label> {
        if self.degree_of(v) == 2 {
            self.neighbors_of(v).find(|&w| w != u)
        } else {
            None
        }
    }

    /// Returns the number of neighbors of `u`
    fn degree_of(&self, u: Self::Label) -> NumNodes;

    /// Returns an iterator over the degrees of all nodes (in the order of [`GraphNodeOrder::vertices`])
    fn degrees(&self) -> impl Iterator<Item = NumNodes> + '_ {
        self.vertices().map(|u| self.degree_of(u))
    }

    /// Returns an iterator over edges incident to a given vertex.
    /// If `only_normalized`, then only edges `(u, v)` with `u <= v` are considered.
    fn edges_of(
        &self,
        u: Self::Label,
        only_normalized: bool,
    ) -> impl Iterator<Item = Edge<Self::Label>> + '_ {
        self.neighbors_of(u)
            .map(move |v| Edge(u, v))
            .filter(move |e| !only_normalized || e.is_normalized())
    }

    /// Returns an iterator over all edges in the graph.
    /// If `only_normalized`, then only edges `(u, v)` with `u <= v` are considered,
    /// i.e. every undirected edge is reported exactly once.
    fn edges(&self, only_normalized: bool) -> impl Iterator<Item = Edge<Self::Label>> + '_ {
        self.vertices()
            .flat_map(move |u| self.edges_of(u, only_normalized))
    }

    /// Returns all normalized edges in sorted order
    fn ordered_edges(&self) -> Vec<Edge<Self::Label>> {
        self.edges(true).sorted_unstable().collect_vec()
    }

    /// Returns all nodes in sorted order
    fn ordered_vertices(&self) -> Vec<Self::Label> {
        self.vertices().sorted_unstable().collect_vec()
    }
}

/// Trait to test existence of certain structures in a graph.
pub trait AdjacencyTest: GraphNodeOrder {
    /// Returns *true* if the edge {u,v} exists in the graph.
    fn has_edge(&self, u: Self::Label, v: Self::Label) -> bool;
}

/// Trait for creating a new empty graph
pub trait GraphNew {
    /// Creates an empty graph without nodes
    fn new() -> Self;
}

/// Provides functions to insert/delete nodes and edges
pub trait GraphEdgeEditing: GraphNew + GraphNodeOrder {
    /// Adds `u` as an isolated node. Returns *true* if it was not present before.
    fn add_node(&mut self, u: Self::Label) -> bool;

    /// Adds all nodes in the collection
    fn add_nodes(&mut self, nodes: impl IntoIterator<Item = Self::Label>) {
        for u in nodes {
            self.add_node(u);
        }
    }

    /// Adds the edge {u,v} to the graph, inserting missing endpoints as nodes.
    /// ** Panics if the edge was already present or is a self loop **
    fn add_edge(&mut self, u: Self::Label, v: Self::Label) {
        assert!(self.try_add_edge(u, v))
    }

    /// Adds the edge {u,v} to the graph, inserting missing endpoints as nodes.
    /// Returns *true* exactly if the edge was not present previously.
    /// Self loops are never inserted and return *false*.
    fn try_add_edge(&mut self, u: Self::Label, v: Self::Label) -> bool;

    /// Adds all edges in the collection that are not present yet
    fn add_edges(&mut self, edges: impl IntoIterator<Item = impl Into<Edge<Self::Label>>>) {
        for Edge(u, v) in edges.into_iter().map(|e| e.into()) {
            self.try_add_edge(u, v);
        }
    }

    /// Removes the edge {u,v}. Returns *true* if the edge was present.
    fn try_remove_edge(&mut self, u: Self::Label, v: Self::Label) -> bool;
}

/// A super trait for creating a graph from scratch
pub trait GraphFromScratch: GraphNodeOrder + Sized {
    /// Creates a graph from an iterator over edges; the node set is the set of all endpoints
    fn from_edges(edges: impl IntoIterator<Item = impl Into<Edge<Self::Label>>>) -> Self;

    /// Creates a graph from an explicit node set and edges between those nodes.
    ///
    /// Fails with an argument error if an edge is a self loop or references a node
    /// that is not part of `nodes`.
    fn from_parts(
        nodes: impl IntoIterator<Item = Self::Label>,
        edges: impl IntoIterator<Item = impl Into<Edge<Self::Label>>>,
    ) -> Result<Self>;
}

impl<G: GraphEdgeEditing> GraphFromScratch for G {
    fn from_edges(edges: impl IntoIterator<Item = impl Into<Edge<Self::Label>>>) -> Self {
        let mut graph = Self::new();
        graph.add_edges(edges);
        graph
    }

    fn from_parts(
        nodes: impl IntoIterator<Item = Self::Label>,
        edges: impl IntoIterator<Item = impl Into<Edge<Self::Label>>>,
    ) -> Result<Self> {
        let mut graph = Self::new();
        graph.add_nodes(nodes);
        for edge in edges.into_iter().map(|e| e.into()) {
            if edge.is_loop() {
                return Err(DissectionError::SelfLoop(describe(edge.0)));
            }
            for u in [edge.0, edge.1] {
                if !graph.has_vertex(u) {
                    return Err(DissectionError::UnknownNode(describe(u)));
                }
            }
            graph.try_add_edge(edge.0, edge.1);
        }
        Ok(graph)
    }
}
