/*!
# FlowCutter

Computes a sequence of increasingly balanced edge cuts between a source and a target node.

Each round saturates the unit-capacity flow between the current source and sink sets, grows the
smaller of the two residual-reachable sides to its full reachable set and records the edges
leaving it as an [`EdgeCut`]. Unless the cut is already epsilon-balanced, a *piercing node* on the
far side of the cut is added to the growing side, forcing the next round to find a new, larger
cut. Only Pareto-optimal cuts (cut size vs. imbalance) are returned.

```rust
use ndtree::{prelude::*, algo::*, repr::EdgeIndexedGraph};

// a 2x4 ladder: cutting both rails in the middle bisects it
let graph = EdgeIndexedGraph::from_edges(
    8,
    [(0, 1), (1, 2), (2, 3), (4, 5), (5, 6), (6, 7), (0, 4), (1, 5), (2, 6), (3, 7)],
).unwrap();
let cuts = FlowCutter::new(&graph, 0, 7, 0.0).unwrap().compute().unwrap();

let best = cuts.iter().min_by_key(|c| c.cut_size()).unwrap();
assert_eq!(best.cut_size(), 2);
assert!(cuts.iter().any(|c| c.imbalance() == 0.0));
```
*/

use std::cmp::Reverse;

use itertools::Itertools;
use stream_bitset::prelude::*;
use tracing::trace;

use super::*;
use crate::{error::check_epsilon, repr::EdgeIndexedGraph};

/// Imbalance of a split into parts of size `a` and `b` out of `total` nodes,
/// i.e. `2 * max(a, b) / total - 1`. An empty graph is perfectly balanced.
pub fn imbalance(a: usize, b: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (2 * a.max(b)) as f64 / total as f64 - 1.0
}

/// Returns *true* if a bipartition into `k` and `n - k` nodes satisfies
/// `max(k, n - k) <= ceil((1 + epsilon) * n / 2)`
pub fn is_epsilon_balanced(k: usize, n: usize, epsilon: f64) -> bool {
    debug_assert!(k <= n);
    k.max(n - k) as f64 <= ((1.0 + epsilon) * n as f64 / 2.0).ceil()
}

/// A set of edges separating one side of a bipartition of a dense graph from the rest.
///
/// Immutable once constructed; the side is stored as a bitset over all nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeCut {
    num_nodes: NumNodes,
    cut_edges: Vec<EdgeId>,
    side: NodeBitSet,
}

impl EdgeCut {
    /// Creates the cut of all edges of `graph` with exactly one endpoint in `side`
    pub fn from_side(graph: &EdgeIndexedGraph, side: NodeBitSet) -> Self {
        let mut cut_edges = side
            .iter_set_bits()
            .flat_map(|u| {
                graph
                    .incident_edges(u)
                    .iter()
                    .copied()
                    .filter(|&id| graph.edge(id).opposite_of(u).is_some_and(|v| !side.get_bit(v)))
            })
            .collect_vec();
        cut_edges.sort_unstable();

        Self {
            num_nodes: graph.number_of_nodes(),
            cut_edges,
            side,
        }
    }

    /// Number of nodes of the graph the cut was computed on
    pub fn num_nodes(&self) -> NumNodes {
        self.num_nodes
    }

    /// Ids of the cut edges in increasing order
    pub fn cut_edges(&self) -> &[EdgeId] {
        &self.cut_edges
    }

    /// Number of cut edges
    pub fn cut_size(&self) -> usize {
        self.cut_edges.len()
    }

    /// Returns *true* if no edge is cut, i.e. the side is a union of connected components
    pub fn is_empty(&self) -> bool {
        self.cut_edges.is_empty()
    }

    /// Nodes on the side the cut was grown from
    pub fn side(&self) -> &NodeBitSet {
        &self.side
    }

    /// Returns *true* if `u` lies on the grown side
    pub fn contains(&self, u: Node) -> bool {
        self.side.get_bit(u)
    }

    /// Number of nodes on the grown side
    pub fn side_size(&self) -> usize {
        self.side.cardinality() as usize
    }

    /// Number of nodes not on the grown side
    pub fn other_side_size(&self) -> usize {
        self.num_nodes as usize - self.side_size()
    }

    /// `2 * max(k, n - k) / n - 1` in `[0, 1)` for a non-empty side `k`
    pub fn imbalance(&self) -> f64 {
        imbalance(
            self.side_size(),
            self.other_side_size(),
            self.num_nodes as usize,
        )
    }

    /// `|cut| / min(k, n - k)`; infinite if one side is empty
    pub fn expansion(&self) -> f64 {
        let smaller = self.side_size().min(self.other_side_size());
        if smaller == 0 {
            f64::INFINITY
        } else {
            self.cut_size() as f64 / smaller as f64
        }
    }

    /// Returns *true* if the bipartition is epsilon-balanced
    pub fn is_balanced(&self, epsilon: f64) -> bool {
        is_epsilon_balanced(self.side_size(), self.num_nodes as usize, epsilon)
    }

    /// Returns *true* if `other` has fewer edges and no worse imbalance, or no more edges and a
    /// strictly lower imbalance
    pub fn is_dominated_by(&self, other: &EdgeCut) -> bool {
        let (mine, theirs) = (self.imbalance(), other.imbalance());
        (other.cut_size() < self.cut_size() && theirs <= mine)
            || (other.cut_size() <= self.cut_size() && theirs < mine)
    }
}

/// Removes duplicate and dominated cuts. The remaining cuts keep their relative order.
pub fn pareto_optimal_cuts(mut cuts: Vec<EdgeCut>) -> Vec<EdgeCut> {
    let mut unique: Vec<EdgeCut> = Vec::with_capacity(cuts.len());
    for cut in cuts.drain(..) {
        if !unique.contains(&cut) {
            unique.push(cut);
        }
    }

    let dominated = unique
        .iter()
        .map(|c| unique.iter().any(|o| c.is_dominated_by(o)))
        .collect_vec();

    unique
        .into_iter()
        .zip(dominated)
        .filter_map(|(c, d)| (!d).then_some(c))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CutSide {
    Source,
    Sink,
}

/// Drives repeated max-flow computations between a growing source and sink set.
/// See the [module documentation](self).
pub struct FlowCutter<'a> {
    network: FlowNetwork<'a>,
    search: MaxFlowSearch,
    epsilon: f64,
    hops_to_source: Vec<NumNodes>,
    hops_to_target: Vec<NumNodes>,
}

impl<'a> FlowCutter<'a> {
    /// Prepares a run between `source` and `target`.
    ///
    /// Fails if `epsilon` is not in `[0, 1]`, if `source == target` or if a terminal is not a node.
    pub fn new(
        graph: &'a EdgeIndexedGraph,
        source: Node,
        target: Node,
        epsilon: f64,
    ) -> Result<Self> {
        check_epsilon(epsilon)?;
        let network = FlowNetwork::new(graph, source, target)?;

        Ok(Self {
            search: MaxFlowSearch::new(graph.number_of_nodes()),
            epsilon,
            hops_to_source: hop_distances(graph, source),
            hops_to_target: hop_distances(graph, target),
            network,
        })
    }

    /// Runs the cutter to completion and returns its Pareto-optimal cuts
    pub fn compute(mut self) -> Result<Vec<EdgeCut>> {
        let graph = self.network.graph();
        let mut cuts = Vec::new();

        while !self.network.sources_intersect_sinks() {
            self.search.saturate(&mut self.network)?;

            let from_source = self.search.source_reachable();
            let from_sink = self.search.sink_reachable();
            let (side, grown, opposite) = if from_source.cardinality() <= from_sink.cardinality() {
                (CutSide::Source, from_source.clone(), from_sink.clone())
            } else {
                (CutSide::Sink, from_sink.clone(), from_source.clone())
            };

            match side {
                CutSide::Source => self.network.grow_sources(grown.iter_set_bits()),
                CutSide::Sink => self.network.grow_sinks(grown.iter_set_bits()),
            }

            let cut = EdgeCut::from_side(graph, grown);
            let balanced = cut.is_balanced(self.epsilon);
            trace!(
                ?side,
                flow = self.search.flow(),
                side_size = cut.side_size(),
                cut_size = cut.cut_size(),
                imbalance = cut.imbalance(),
                "flow cutter round"
            );

            if balanced || cut.is_empty() {
                cuts.push(cut);
                break;
            }

            let piercing = self
                .piercing_node(&cut, &opposite, side)
                .ok_or(DissectionError::NoPiercingNode)?;
            cuts.push(cut);

            match side {
                CutSide::Source => self.network.add_to_sources(piercing),
                CutSide::Sink => self.network.add_to_sinks(piercing),
            }
        }

        Ok(pareto_optimal_cuts(cuts))
    }

    /// Picks the cut frontier node to add to the grown side. Nodes not reachable from the
    /// opposite side are preferred; among them the node maximizing
    /// `hops(opposite terminal) - hops(own terminal)` wins, ties going to the smaller id.
    fn piercing_node(&self, cut: &EdgeCut, opposite: &NodeBitSet, side: CutSide) -> Option<Node> {
        let graph = self.network.graph();
        let candidates = cut
            .cut_edges()
            .iter()
            .map(|&id| {
                let Edge(u, v) = graph.edge(id);
                if cut.contains(u) { v } else { u }
            })
            .sorted_unstable()
            .dedup()
            .collect_vec();

        let non_augmenting = candidates
            .iter()
            .copied()
            .filter(|&u| !opposite.get_bit(u))
            .collect_vec();
        let candidates = if non_augmenting.is_empty() {
            candidates
        } else {
            non_augmenting
        };

        let (own, other) = match side {
            CutSide::Source => (&self.hops_to_source, &self.hops_to_target),
            CutSide::Sink => (&self.hops_to_target, &self.hops_to_source),
        };

        candidates.into_iter().min_by_key(|&u| {
            let score = other[u as usize] as i64 - own[u as usize] as i64;
            (Reverse(score), u)
        })
    }
}

/// BFS hop distances from `start`; unreachable nodes get distance `n`
fn hop_distances(graph: &EdgeIndexedGraph, start: Node) -> Vec<NumNodes> {
    let n = graph.number_of_nodes();
    let mut hops = vec![n; n as usize];
    let mut bfs = graph.bfs(start);
    while let Some(u) = bfs.next() {
        hops[u as usize] = bfs.hops_of_last();
    }
    hops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{gens::*, testing::init_tracing};
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn grid(rows: NumNodes, cols: NumNodes) -> EdgeIndexedGraph {
        let rng = &mut Pcg64Mcg::seed_from_u64(1);
        let graph: Graph<Node> = Grid::new().rows(rows).cols(cols).generate(rng);
        EdgeIndexedGraph::from_graph(&graph).0
    }

    fn cut_of(graph: &EdgeIndexedGraph, side: &[Node]) -> EdgeCut {
        let mut bits = NodeBitSet::new(graph.number_of_nodes());
        bits.set_bits(side.iter().copied());
        EdgeCut::from_side(graph, bits)
    }

    #[test]
    fn imbalance_formula() {
        assert_eq!(imbalance(5, 5, 10), 0.0);
        assert!((imbalance(2, 3, 5) - 0.2).abs() < 1e-12);
        assert_eq!(imbalance(0, 0, 0), 0.0);
        assert!((imbalance(1, 9, 10) - 0.8).abs() < 1e-12);

        assert!(is_epsilon_balanced(5, 10, 0.0));
        assert!(!is_epsilon_balanced(6, 10, 0.0));
        assert!(is_epsilon_balanced(8, 10, 0.6));
        assert!(!is_epsilon_balanced(9, 10, 0.6));
    }

    #[test]
    fn cut_metrics() {
        // path 0-1-2-3
        let graph = EdgeIndexedGraph::from_edges(4, [(0, 1), (1, 2), (2, 3)]).unwrap();

        let half = cut_of(&graph, &[0, 1]);
        assert_eq!(half.cut_edges(), &[1]);
        assert_eq!(half.imbalance(), 0.0);
        assert_eq!(half.expansion(), 0.5);
        assert!(half.is_balanced(0.0));

        let single = cut_of(&graph, &[3]);
        assert_eq!(single.side_size(), 1);
        assert_eq!(single.other_side_size(), 3);
        assert_eq!(single.imbalance(), 0.5);
        assert_eq!(single.expansion(), 1.0);

        let everything = cut_of(&graph, &[0, 1, 2, 3]);
        assert!(everything.is_empty());
        assert_eq!(everything.expansion(), f64::INFINITY);
    }

    #[test]
    fn pareto_filter_removes_dominated() {
        // path 0-1-2-3-4-5 plus chords to create cuts of different size
        let graph =
            EdgeIndexedGraph::from_edges(6, [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (0, 2)])
                .unwrap();

        let a = cut_of(&graph, &[0]); // 2 edges, imbalance 2/3
        let b = cut_of(&graph, &[0, 1, 2]); // 1 edge, imbalance 0
        let c = cut_of(&graph, &[5]); // 1 edge, imbalance 2/3
        let d = cut_of(&graph, &[4, 5]); // 1 edge, imbalance 1/3

        assert!(a.is_dominated_by(&b));
        assert!(c.is_dominated_by(&d));
        assert!(!b.is_dominated_by(&b));

        let kept = pareto_optimal_cuts(vec![a, b.clone(), c, d, b.clone()]);
        assert_eq!(kept, vec![b]);
    }

    #[test]
    fn pareto_filter_keeps_tradeoffs() {
        let graph = grid(4, 4);
        let corner = cut_of(&graph, &[0]); // 2 edges, very unbalanced
        let half = cut_of(&graph, &[0, 1, 2, 3, 4, 5, 6, 7]); // 4 edges, balanced
        let kept = pareto_optimal_cuts(vec![corner.clone(), half.clone()]);
        assert_eq!(kept, vec![corner, half]);
    }

    #[test]
    fn no_dominated_pairs_in_result() {
        init_tracing();
        let graph = grid(6, 9);
        for (s, t) in [(0, 53), (4, 49), (27, 26), (10, 44)] {
            let cuts = FlowCutter::new(&graph, s, t, 0.1)
                .unwrap()
                .compute()
                .unwrap();
            assert!(!cuts.is_empty());
            for c1 in &cuts {
                assert!((0.0..1.0).contains(&c1.imbalance()));
                for c2 in &cuts {
                    assert!(!c1.is_dominated_by(c2));
                }
            }
        }
    }

    #[test]
    fn finds_balanced_cut_on_grid() {
        let graph = grid(8, 8);
        let cuts = FlowCutter::new(&graph, 0, 63, 0.6)
            .unwrap()
            .compute()
            .unwrap();

        assert!(cuts.iter().any(|c| c.is_balanced(0.6)));
        assert!(cuts.iter().all(|c| c.expansion().is_finite()));
    }

    #[test]
    fn cuts_separate_terminals() {
        let graph = grid(5, 7);
        let cuts = FlowCutter::new(&graph, 3, 31, 0.0)
            .unwrap()
            .compute()
            .unwrap();
        for cut in &cuts {
            assert_ne!(cut.contains(3), cut.contains(31));
            // removing the cut edges disconnects the side from the rest
            for &id in cut.cut_edges() {
                let Edge(u, v) = graph.edge(id);
                assert_ne!(cut.contains(u), cut.contains(v));
            }
        }
    }

    #[test]
    fn disconnected_graph_yields_empty_cut() {
        // two triangles without any connection
        let graph =
            EdgeIndexedGraph::from_edges(6, [(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)])
                .unwrap();
        let cuts = FlowCutter::new(&graph, 0, 4, 0.0)
            .unwrap()
            .compute()
            .unwrap();
        assert_eq!(cuts.len(), 1);
        assert!(cuts[0].is_empty());
        assert_eq!(cuts[0].imbalance(), 0.0);
    }

    #[test]
    fn rejects_bad_arguments() {
        let graph = grid(2, 2);
        assert!(matches!(
            FlowCutter::new(&graph, 0, 3, 1.5),
            Err(DissectionError::InvalidEpsilon(_))
        ));
        assert!(matches!(
            FlowCutter::new(&graph, 2, 2, 0.5),
            Err(DissectionError::IdenticalTerminals)
        ));
    }

    #[test]
    fn hop_distances_mark_unreachable() {
        let graph = EdgeIndexedGraph::from_edges(5, [(0, 1), (1, 2), (3, 4)]).unwrap();
        assert_eq!(hop_distances(&graph, 0), vec![0, 1, 2, 5, 5]);
    }
}
