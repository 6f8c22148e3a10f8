use itertools::Itertools;
use smallvec::SmallVec;

use super::*;
use crate::{
    error::describe,
    utils::{NodeMapGetter, NodeMapper},
};

/// Incident edge ids of a single node; road networks rarely exceed degree four
pub type IncidentEdges = SmallVec<[EdgeId; 4]>;

/// Immutable undirected graph over the dense nodes `0..n` with explicit edge ids `0..m`.
///
/// Edges are stored normalized and sorted, and every node keeps the ids of its incident edges.
/// This is the topology a [`FlowNetwork`](crate::algo::FlowNetwork) attaches per-edge flow
/// state to, which makes it cheap to share between many concurrent flow computations.
#[derive(Clone, Debug)]
pub struct EdgeIndexedGraph {
    edges: Vec<Edge>,
    incidence: Vec<IncidentEdges>,
}

impl EdgeIndexedGraph {
    /// Creates a graph with nodes `0..n` from a collection of edges.
    /// Duplicate edges (in either orientation) are merged.
    ///
    /// Fails if an edge is a self loop or references a node `>= n`.
    ///
    /// # Example
    /// ```
    /// use ndtree::{prelude::*, repr::EdgeIndexedGraph};
    ///
    /// let graph = EdgeIndexedGraph::from_edges(3, [(0, 1), (2, 1), (1, 0)]).unwrap();
    /// assert_eq!(graph.number_of_edges(), 2);
    /// assert_eq!(graph.edge(1), Edge(1, 2));
    /// ```
    pub fn from_edges(
        n: NumNodes,
        edges: impl IntoIterator<Item = impl Into<Edge>>,
    ) -> Result<Self> {
        let mut normalized = Vec::new();
        for edge in edges.into_iter().map(|e| e.into()) {
            if edge.is_loop() {
                return Err(DissectionError::SelfLoop(describe(edge.0)));
            }
            if let Some(u) = [edge.0, edge.1].into_iter().find(|&u| u >= n) {
                return Err(DissectionError::UnknownNode(describe(u)));
            }
            normalized.push(edge.normalized());
        }
        Ok(Self::from_normalized(n, normalized))
    }

    /// Creates a dense copy of a labelled graph together with the mapping between labels and
    /// dense ids. Ids are assigned in label order and edges are sorted, so the result only
    /// depends on the node and edge sets of `graph`.
    pub fn from_graph<G>(graph: &G) -> (Self, NodeMapper<G::Label>)
    where
        G: AdjacencyList + GraphEdgeOrder,
    {
        let mapper = NodeMapper::from_labels(graph.vertices());
        let edges = graph
            .edges(true)
            .filter_map(|e| mapper.new_edge_of(e))
            .map(|e| e.normalized())
            .collect_vec();
        (Self::from_normalized(mapper.len() as NumNodes, edges), mapper)
    }

    fn from_normalized(n: NumNodes, mut edges: Vec<Edge>) -> Self {
        edges.sort_unstable();
        edges.dedup();

        let mut incidence = vec![IncidentEdges::new(); n as usize];
        for (id, &Edge(u, v)) in edges.iter().enumerate() {
            incidence[u as usize].push(id as EdgeId);
            incidence[v as usize].push(id as EdgeId);
        }

        Self { edges, incidence }
    }

    /// Returns the edge with id `id`.
    /// ** Panics if `id >= m` **
    pub fn edge(&self, id: EdgeId) -> Edge {
        self.edges[id as usize]
    }

    /// Returns all edges ordered by id
    pub fn edge_list(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the ids of all edges incident to `u`.
    /// ** Panics if `u >= n` **
    pub fn incident_edges(&self, u: Node) -> &[EdgeId] {
        &self.incidence[u as usize]
    }
}

impl GraphNodeOrder for EdgeIndexedGraph {
    type Label = Node;
    type NodeSet = NodeBitSet;

    fn number_of_nodes(&self) -> NumNodes {
        self.incidence.len() as NumNodes
    }

    fn vertices(&self) -> impl Iterator<Item = Node> + '_ {
        0..self.number_of_nodes()
    }

    fn has_vertex(&self, u: Node) -> bool {
        u < self.number_of_nodes()
    }
}

impl GraphEdgeOrder for EdgeIndexedGraph {
    fn number_of_edges(&self) -> NumEdges {
        self.edges.len() as NumEdges
    }
}

impl AdjacencyList for EdgeIndexedGraph {
    fn neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.incidence
            .get(u as usize)
            .into_iter()
            .flatten()
            .map(move |&id| {
                let Edge(a, b) = self.edges[id as usize];
                if a == u { b } else { a }
            })
    }

    fn degree_of(&self, u: Node) -> NumNodes {
        self.incidence
            .get(u as usize)
            .map_or(0, |ids| ids.len() as NumNodes)
    }
}

impl AdjacencyTest for EdgeIndexedGraph {
    fn has_edge(&self, u: Node, v: Node) -> bool {
        let target = Edge(u, v).normalized();
        self.incidence
            .get(u as usize)
            .is_some_and(|ids| ids.iter().any(|&id| self.edges[id as usize] == target))
    }
}
