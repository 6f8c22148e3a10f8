/*!
# Unit-Capacity Network Flow

Flow machinery used by [`FlowCutter`](super::FlowCutter) to find small edge cuts.

## Core concepts
- Every undirected edge is a single [`UnitCapacityEdge`]: one unit of capacity that can be used in
  either direction, but only in one at a time. Pushing flow against the current direction cancels
  it (the residual direction), so no pair of directed arcs is needed.
- A [`FlowNetwork`] attaches such an edge state to every edge of an [`EdgeIndexedGraph`] and keeps
  a *set* of sources and a *set* of sinks. Growing these sets is cheap, which is why no super
  source/sink nodes are required.
- [`MaxFlowSearch`] is an Edmonds–Karp specialization for unit capacities: every augmenting path
  found by BFS increases the flow by exactly one. Once saturated, it exposes the nodes reachable
  from the sources and the nodes that can reach the sinks in the residual network.

Flow persists in the network across calls to [`MaxFlowSearch::saturate`]. After growing the source
or sink set, saturating again only searches the additional augmenting paths.
*/

use std::collections::VecDeque;

use stream_bitset::prelude::*;

use super::*;
use crate::{error::describe, repr::EdgeIndexedGraph};

/// Flow state of a [`UnitCapacityEdge`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowState {
    /// No flow on the edge
    #[default]
    Unused,
    /// One unit of flow towards the given endpoint
    FlowingTo(Node),
}

/// An undirected edge with capacity one.
///
/// The state machine is
/// - `Unused` -> `FlowingTo(x)` for either endpoint `x`
/// - `FlowingTo(x)` -> `Unused` by pushing flow towards the other endpoint (cancellation)
///
/// Pushing towards `x` while already `FlowingTo(x)` would exceed the capacity and is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitCapacityEdge {
    edge: Edge,
    state: FlowState,
}

impl UnitCapacityEdge {
    /// Creates an unused edge between `u` and `v`. Fails if `u == v`.
    pub fn new(u: Node, v: Node) -> Result<Self> {
        if u == v {
            return Err(DissectionError::SelfLoop(describe(u)));
        }
        Ok(Self {
            edge: Edge(u, v),
            state: FlowState::Unused,
        })
    }

    /// Returns both endpoints
    pub fn endpoints(&self) -> Edge {
        self.edge
    }

    /// Returns the current flow state
    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Returns *true* if the edge carries a unit of flow
    pub fn is_used(&self) -> bool {
        self.state != FlowState::Unused
    }

    /// Returns the endpoint opposite to `u` or `None` if `u` is not an endpoint
    pub fn opposite_of(&self, u: Node) -> Option<Node> {
        self.edge.opposite_of(u)
    }

    /// Returns *true* if one more unit of flow can be pushed towards `u` (an endpoint)
    pub fn can_flow_to(&self, u: Node) -> bool {
        debug_assert!(self.edge.contains(u));
        self.state != FlowState::FlowingTo(u)
    }

    /// Pushes one unit of flow towards `u`
    pub fn flow_to(&mut self, u: Node) -> Result<()> {
        let Some(other) = self.opposite_of(u) else {
            return Err(DissectionError::NotAnEndpoint {
                node: describe(u),
                edge: describe(self.edge),
            });
        };

        self.state = match self.state {
            FlowState::Unused => FlowState::FlowingTo(u),
            FlowState::FlowingTo(x) if x == other => FlowState::Unused,
            FlowState::FlowingTo(_) => {
                return Err(DissectionError::FlowConflict {
                    node: describe(u),
                    edge: describe(self.edge),
                });
            }
        };
        Ok(())
    }

    /// Removes all flow from the edge
    pub fn reset_flow(&mut self) {
        self.state = FlowState::Unused;
    }
}

/// A flow network over a borrowed [`EdgeIndexedGraph`] with growing source and sink sets.
///
/// Source and sink sets start as singletons of two distinct terminals. They are only ever grown.
/// Node and adjacency queries are forwarded to the underlying graph.
#[derive(Debug, Clone)]
pub struct FlowNetwork<'a> {
    graph: &'a EdgeIndexedGraph,
    edges: Vec<UnitCapacityEdge>,
    source: Node,
    target: Node,
    sources: NodeBitSet,
    sinks: NodeBitSet,
}

impl<'a> FlowNetwork<'a> {
    /// Creates a network without flow, with `sources = {source}` and `sinks = {target}`.
    ///
    /// Fails if `source == target` or if a terminal is not a node of `graph`.
    pub fn new(graph: &'a EdgeIndexedGraph, source: Node, target: Node) -> Result<Self> {
        if source == target {
            return Err(DissectionError::IdenticalTerminals);
        }
        if let Some(u) = [source, target].into_iter().find(|&u| !graph.has_vertex(u)) {
            return Err(DissectionError::UnknownNode(describe(u)));
        }

        let edges = graph
            .edge_list()
            .iter()
            .map(|&Edge(u, v)| UnitCapacityEdge::new(u, v))
            .collect::<Result<Vec<_>>>()?;

        let n = graph.number_of_nodes();
        let mut sources = NodeBitSet::new(n);
        let mut sinks = NodeBitSet::new(n);
        sources.set_bit(source);
        sinks.set_bit(target);

        Ok(Self {
            graph,
            edges,
            source,
            target,
            sources,
            sinks,
        })
    }

    /// The underlying graph
    pub fn graph(&self) -> &'a EdgeIndexedGraph {
        self.graph
    }

    /// The terminal the source set was seeded with
    pub fn source(&self) -> Node {
        self.source
    }

    /// The terminal the sink set was seeded with
    pub fn target(&self) -> Node {
        self.target
    }

    /// Current source set
    pub fn sources(&self) -> &NodeBitSet {
        &self.sources
    }

    /// Current sink set
    pub fn sinks(&self) -> &NodeBitSet {
        &self.sinks
    }

    /// Returns *true* if `u` is a source
    pub fn is_source(&self, u: Node) -> bool {
        self.sources.get_bit(u)
    }

    /// Returns *true* if `u` is a sink
    pub fn is_sink(&self, u: Node) -> bool {
        self.sinks.get_bit(u)
    }

    /// Adds all given nodes to the source set
    pub fn grow_sources<I>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = Node>,
    {
        self.sources.set_bits(nodes);
    }

    /// Adds all given nodes to the sink set
    pub fn grow_sinks<I>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = Node>,
    {
        self.sinks.set_bits(nodes);
    }

    /// Adds a single node to the source set
    pub fn add_to_sources(&mut self, u: Node) {
        self.sources.set_bit(u);
    }

    /// Adds a single node to the sink set
    pub fn add_to_sinks(&mut self, u: Node) {
        self.sinks.set_bit(u);
    }

    /// Returns *true* if some node is both a source and a sink
    pub fn sources_intersect_sinks(&self) -> bool {
        self.sources.iter_set_bits().any(|u| self.sinks.get_bit(u))
    }

    /// Ids of the edges incident to `u`
    pub fn incident_edges(&self, u: Node) -> &'a [EdgeId] {
        self.graph.incident_edges(u)
    }

    /// Flow state of edge `id`.
    /// ** Panics if `id >= m` **
    pub fn flow_edge(&self, id: EdgeId) -> &UnitCapacityEdge {
        &self.edges[id as usize]
    }

    /// Pushes one unit of flow over edge `id` towards `u`
    pub fn flow_to(&mut self, id: EdgeId, u: Node) -> Result<()> {
        self.edges[id as usize].flow_to(u)
    }

    /// Number of edges currently carrying flow
    pub fn number_of_used_edges(&self) -> NumEdges {
        self.edges.iter().filter(|e| e.is_used()).count() as NumEdges
    }

    /// Removes all flow while keeping the source and sink sets
    pub fn reset_flow(&mut self) {
        self.edges.iter_mut().for_each(UnitCapacityEdge::reset_flow);
    }
}

impl GraphNodeOrder for FlowNetwork<'_> {
    type Label = Node;
    type NodeSet = NodeBitSet;

    fn number_of_nodes(&self) -> NumNodes {
        self.graph.number_of_nodes()
    }

    fn vertices(&self) -> impl Iterator<Item = Node> + '_ {
        self.graph.vertices()
    }

    fn has_vertex(&self, u: Node) -> bool {
        self.graph.has_vertex(u)
    }
}

impl GraphEdgeOrder for FlowNetwork<'_> {
    fn number_of_edges(&self) -> NumEdges {
        self.graph.number_of_edges()
    }
}

impl AdjacencyList for FlowNetwork<'_> {
    fn neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.graph.neighbors_of(u)
    }

    fn degree_of(&self, u: Node) -> NumNodes {
        self.graph.degree_of(u)
    }
}

/// Edmonds–Karp for unit-capacity networks with source and sink sets.
///
/// The struct is a reusable workspace: its buffers are sized once for the network's graph and
/// the flow value accumulates over all calls to [`MaxFlowSearch::saturate`].
#[derive(Debug, Clone)]
pub struct MaxFlowSearch {
    parent_edge: Vec<EdgeId>,
    queue: VecDeque<Node>,
    source_reachable: NodeBitSet,
    sink_reachable: NodeBitSet,
    flow: NumEdges,
}

const NO_EDGE: EdgeId = EdgeId::MAX;

impl MaxFlowSearch {
    /// Creates a workspace for networks over `n` nodes
    pub fn new(n: NumNodes) -> Self {
        Self {
            parent_edge: vec![NO_EDGE; n as usize],
            queue: VecDeque::new(),
            source_reachable: NodeBitSet::new(n),
            sink_reachable: NodeBitSet::new(n),
            flow: 0,
        }
    }

    /// Total number of augmenting paths found so far, i.e. the flow value
    pub fn flow(&self) -> NumEdges {
        self.flow
    }

    /// Nodes reachable from the sources in the residual network after the last saturation
    pub fn source_reachable(&self) -> &NodeBitSet {
        &self.source_reachable
    }

    /// Nodes that reach the sinks in the residual network after the last saturation
    pub fn sink_reachable(&self) -> &NodeBitSet {
        &self.sink_reachable
    }

    /// Augments along shortest paths until no augmenting path remains, then computes both
    /// reachable sets. Returns the number of paths found by this call.
    ///
    /// Requires that sources and sinks are disjoint; otherwise every source that is a sink
    /// would count as an infinite supply of paths.
    pub fn saturate(&mut self, network: &mut FlowNetwork) -> Result<NumEdges> {
        debug_assert!(!network.sources_intersect_sinks());
        debug_assert_eq!(self.parent_edge.len(), network.len());

        let mut augmented = 0;
        while let Some(sink) = self.search_augmenting_path(network) {
            self.augment(network, sink)?;
            augmented += 1;
        }
        self.flow += augmented;

        self.compute_sink_reachable(network);
        Ok(augmented)
    }

    /// BFS from all sources along edges that can carry flow away from the current node.
    /// Returns the first sink reached; if none is reached, `source_reachable` is exactly the
    /// set of visited nodes.
    fn search_augmenting_path(&mut self, network: &FlowNetwork) -> Option<Node> {
        self.source_reachable.clear_all();
        self.queue.clear();
        for u in network.sources().iter_set_bits() {
            self.source_reachable.set_bit(u);
            self.queue.push_back(u);
        }

        while let Some(u) = self.queue.pop_front() {
            for &id in network.incident_edges(u) {
                let edge = network.flow_edge(id);
                let Some(v) = edge.opposite_of(u) else {
                    continue;
                };
                if self.source_reachable.get_bit(v) || !edge.can_flow_to(v) {
                    continue;
                }

                self.source_reachable.set_bit(v);
                self.parent_edge[v as usize] = id;
                if network.is_sink(v) {
                    return Some(v);
                }
                self.queue.push_back(v);
            }
        }

        None
    }

    /// Walks the parent edges from `sink` back to a source and pushes one unit along the path
    fn augment(&mut self, network: &mut FlowNetwork, sink: Node) -> Result<()> {
        let mut v = sink;
        while !network.is_source(v) {
            let id = self.parent_edge[v as usize];
            network.flow_to(id, v)?;
            v = network
                .flow_edge(id)
                .opposite_of(v)
                .ok_or_else(|| DissectionError::NotAnEndpoint {
                    node: describe(v),
                    edge: describe(network.flow_edge(id).endpoints()),
                })?;
        }
        Ok(())
    }

    /// Reverse BFS from all sinks: `u` reaches a visited node `v` if flow can be pushed towards `v`
    fn compute_sink_reachable(&mut self, network: &FlowNetwork) {
        self.sink_reachable.clear_all();
        self.queue.clear();
        for u in network.sinks().iter_set_bits() {
            self.sink_reachable.set_bit(u);
            self.queue.push_back(u);
        }

        while let Some(v) = self.queue.pop_front() {
            for &id in network.incident_edges(v) {
                let edge = network.flow_edge(id);
                let Some(u) = edge.opposite_of(v) else {
                    continue;
                };
                if !self.sink_reachable.get_bit(u) && edge.can_flow_to(v) {
                    self.sink_reachable.set_bit(u);
                    self.queue.push_back(u);
                }
            }
        }
    }
}
