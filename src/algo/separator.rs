/*!
# Graph Separators

[`GraphSeparator`] turns many randomized [`FlowCutter`] runs into a single balanced
**vertex separator** of a labelled graph:

1. draw `runs` random source/target pairs from a seeded generator,
2. run the cutters in parallel on a shared dense copy of the graph and collect all Pareto cuts,
3. pick the cut of minimal expansion among those with imbalance at most
   [`OPTIMAL_CUT_MAX_IMBALANCE`] (falling back to all cuts if none qualifies),
4. cover every cut edge by one of its endpoints, preferring the currently larger side.

The resulting [`Separator`] can [split](Separator::separate) the graph into the connected
components left and right of it.

```rust
use ndtree::{prelude::*, algo::*, gens::*};

let mut graph = Graph::new();
graph.connect_cycle([1u32, 2, 3, 4]);

let separator = GraphSeparator::new(&graph).epsilon(0.6).seed(7).compute().unwrap();
assert_eq!(separator.separator_nodes().len(), 2);
assert_eq!(separator.separating_edges().len(), 4);

let (left, right) = separator.separate(&graph);
assert_eq!(left.len() + right.len(), 2);
```
*/

use fxhash::FxHashSet;
use itertools::Itertools;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use rayon::prelude::*;
use tracing::{debug, warn};

use super::*;
use crate::{
    error::check_epsilon,
    repr::EdgeIndexedGraph,
    utils::{NodeMapGetter, NodeMapper},
};

/// Largest imbalance of a cut (and of a tree node) that is still considered well balanced
pub const OPTIMAL_CUT_MAX_IMBALANCE: f64 = 0.6;

/// Default imbalance tolerance of a single FlowCutter run
pub const DEFAULT_EPSILON: f64 = 0.6;

/// Default number of randomized FlowCutter runs per separator
pub const DEFAULT_RUNS: usize = 20;

/// Picks the cut with minimal expansion among all cuts whose imbalance is at most
/// [`OPTIMAL_CUT_MAX_IMBALANCE`]. If no cut qualifies, the minimum over all cuts is returned.
/// Ties are broken in favor of the earlier cut.
pub fn select_optimal_cut(cuts: &[EdgeCut]) -> Option<&EdgeCut> {
    let by_expansion = |a: &&EdgeCut, b: &&EdgeCut| a.expansion().total_cmp(&b.expansion());

    if let Some(cut) = cuts
        .iter()
        .filter(|c| c.imbalance() <= OPTIMAL_CUT_MAX_IMBALANCE)
        .min_by(by_expansion)
    {
        return Some(cut);
    }

    let fallback = cuts.iter().min_by(by_expansion);
    if let Some(cut) = fallback {
        warn!(
            cuts = cuts.len(),
            imbalance = cut.imbalance(),
            max_imbalance = OPTIMAL_CUT_MAX_IMBALANCE,
            "no cut is balanced enough, using the cut of minimal expansion"
        );
    }
    fallback
}

/// Draws `runs` pairwise different `(source, target)` pairs of distinct nodes in `0..n`.
/// If `runs` exceeds the `n * (n - 1)` possible pairs, every pair is returned once.
fn terminal_pairs<R: Rng>(rng: &mut R, n: NumNodes, runs: usize) -> Vec<(Node, Node)> {
    let possible = (n as u64) * (n as u64).saturating_sub(1);
    let runs = (runs as u64).min(possible) as usize;

    let mut drawn = FxHashSet::default();
    let mut pairs = Vec::with_capacity(runs);
    while pairs.len() < runs {
        let s = rng.random_range(0..n);
        let t = rng.random_range(0..n);
        if s != t && drawn.insert((s, t)) {
            pairs.push((s, t));
        }
    }
    pairs
}

/// Covers every edge of `cut` by one endpoint. For each uncovered edge the endpoint on the side
/// that currently has more nodes left is taken, and that side's count is decremented.
pub fn vertex_separator(graph: &EdgeIndexedGraph, cut: &EdgeCut) -> NodeBitSet {
    let mut in_cut = cut.side_size();
    let mut not_in_cut = cut.other_side_size();
    let mut separator = NodeBitSet::new(graph.number_of_nodes());

    for &id in cut.cut_edges() {
        let Edge(u, v) = graph.edge(id);
        if separator.get_bit(u) || separator.get_bit(v) {
            continue;
        }

        let (inside, outside) = if cut.contains(u) { (u, v) } else { (v, u) };
        if in_cut <= not_in_cut {
            separator.set_bit(outside);
            not_in_cut -= 1;
        } else {
            separator.set_bit(inside);
            in_cut -= 1;
        }
    }

    separator
}

/// A vertex separator of a labelled graph: the separator nodes, the nodes left and right of
/// them, and the edges between separator and the remaining nodes.
///
/// No edge of the graph joins a left and a right node.
#[derive(Debug, Clone)]
pub struct Separator<T: NodeLabel> {
    separator_nodes: FxHashSet<T>,
    left: FxHashSet<T>,
    right: FxHashSet<T>,
    separating_edges: FxHashSet<Edge<T>>,
}

impl<T: NodeLabel> Separator<T> {
    /// Separator nodes
    pub fn separator_nodes(&self) -> &FxHashSet<T> {
        &self.separator_nodes
    }

    /// Nodes on the side the optimal cut was grown from, minus separator nodes
    pub fn left(&self) -> &FxHashSet<T> {
        &self.left
    }

    /// All other non-separator nodes
    pub fn right(&self) -> &FxHashSet<T> {
        &self.right
    }

    /// Edges with exactly one endpoint in the separator
    pub fn separating_edges(&self) -> &FxHashSet<Edge<T>> {
        &self.separating_edges
    }

    /// `2 * max(|left|, |right|) / n - 1` where `n` also counts the separator nodes
    pub fn imbalance(&self) -> f64 {
        imbalance(
            self.left.len(),
            self.right.len(),
            self.separator_nodes.len() + self.left.len() + self.right.len(),
        )
    }

    /// Edges of `graph` with both endpoints in the separator
    pub fn dissection_edges<G>(&self, graph: &G) -> FxHashSet<Edge<T>>
    where
        G: AdjacencyList<Label = T>,
    {
        self.separator_nodes
            .iter()
            .flat_map(|&u| {
                graph
                    .neighbors_of(u)
                    .filter(|v| self.separator_nodes.contains(v))
                    .map(move |v| Edge(u, v).normalized())
            })
            .collect()
    }

    /// Splits `graph` without the separator into its connected components, grouped by side.
    /// Components are ordered by their smallest label.
    pub fn separate<G>(&self, graph: &G) -> (Vec<G>, Vec<G>)
    where
        G: AdjacencyList<Label = T> + GraphEdgeEditing,
    {
        let components = graph
            .connected_components_exclude_nodes(self.separator_nodes.iter().copied())
            .sorted_by_cached_key(|cc| cc.iter().min().copied())
            .collect_vec();

        let mut left = Vec::new();
        let mut right = Vec::new();
        for cc in components {
            let is_left = cc.first().is_some_and(|u| self.left.contains(u));
            let subgraph = graph.vertex_induced(cc);
            if is_left {
                left.push(subgraph);
            } else {
                right.push(subgraph);
            }
        }
        (left, right)
    }
}

/// Configurable separator computation on a labelled graph.
/// See the [module documentation](self).
pub struct GraphSeparator<'a, G> {
    graph: &'a G,
    epsilon: f64,
    runs: usize,
    seed: Option<u64>,
}

impl<'a, G> GraphSeparator<'a, G>
where
    G: AdjacencyList + GraphEdgeOrder,
{
    /// Creates a separator computation with `epsilon = 0.6`, `20` runs and a random seed
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            epsilon: DEFAULT_EPSILON,
            runs: DEFAULT_RUNS,
            seed: None,
        }
    }

    /// Sets the imbalance tolerance of every FlowCutter run
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
    }

    /// Sets the imbalance tolerance of every FlowCutter run
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.set_epsilon(epsilon);
        self
    }

    /// Sets the number of randomized FlowCutter runs
    pub fn set_runs(&mut self, runs: usize) {
        self.runs = runs;
    }

    /// Sets the number of randomized FlowCutter runs
    pub fn runs(mut self, runs: usize) -> Self {
        self.set_runs(runs);
        self
    }

    /// Fixes the seed from which source/target pairs are drawn
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = Some(seed);
    }

    /// Fixes the seed from which source/target pairs are drawn
    pub fn seed(mut self, seed: u64) -> Self {
        self.set_seed(seed);
        self
    }

    /// Computes the separator.
    ///
    /// Fails with an argument error for an invalid `epsilon`, zero runs or fewer than two nodes,
    /// and with a state error if the cutters produce no cut at all.
    pub fn compute(&self) -> Result<Separator<G::Label>> {
        check_epsilon(self.epsilon)?;
        if self.runs == 0 {
            return Err(DissectionError::InvalidRuns);
        }
        let n = self.graph.number_of_nodes();
        if n < 2 {
            return Err(DissectionError::GraphTooSmall { nodes: n as usize });
        }

        let (dense, mapper) = EdgeIndexedGraph::from_graph(self.graph);
        let pairs = self.terminal_pairs(n);
        let epsilon = self.epsilon;

        let cuts = pairs
            .par_iter()
            .map(|&(s, t)| FlowCutter::new(&dense, s, t, epsilon)?.compute())
            .collect::<Result<Vec<_>>>()?;

        let mut merged: Vec<EdgeCut> = Vec::new();
        for cut in cuts.into_iter().flatten() {
            if !merged.contains(&cut) {
                merged.push(cut);
            }
        }

        let optimal = select_optimal_cut(&merged).ok_or(DissectionError::NoCutFound)?;
        let separator = vertex_separator(&dense, optimal);
        let result = self.label_separator(&dense, &mapper, optimal, &separator);

        debug!(
            nodes = n,
            runs = self.runs,
            cuts = merged.len(),
            cut_size = optimal.cut_size(),
            expansion = optimal.expansion(),
            imbalance = result.imbalance(),
            separator = result.separator_nodes.len(),
            "separator computed"
        );

        Ok(result)
    }

    fn terminal_pairs(&self, n: NumNodes) -> Vec<(Node, Node)> {
        let seed = self.seed.unwrap_or_else(|| rand::rng().random());
        terminal_pairs(&mut Pcg64Mcg::seed_from_u64(seed), n, self.runs)
    }

    fn label_separator(
        &self,
        dense: &EdgeIndexedGraph,
        mapper: &NodeMapper<G::Label>,
        cut: &EdgeCut,
        separator: &NodeBitSet,
    ) -> Separator<G::Label> {
        let mut result = Separator {
            separator_nodes: FxHashSet::default(),
            left: FxHashSet::default(),
            right: FxHashSet::default(),
            separating_edges: FxHashSet::default(),
        };

        for u in dense.vertices() {
            let Some(label) = mapper.old_id_of(u) else {
                continue;
            };
            if separator.get_bit(u) {
                result.separator_nodes.insert(label);
            } else if cut.contains(u) {
                result.left.insert(label);
            } else {
                result.right.insert(label);
            }
        }

        result.separating_edges = self
            .graph
            .edges_leaving(
                result.separator_nodes.iter().copied(),
                &result.separator_nodes,
            )
            .into_iter()
            .map(|e| e.normalized())
            .collect();

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{gens::*, testing::init_tracing};

    fn assert_valid_separator<T: NodeLabel>(graph: &Graph<T>, separator: &Separator<T>) {
        let total =
            separator.separator_nodes().len() + separator.left().len() + separator.right().len();
        assert_eq!(total, graph.len());

        for Edge(u, v) in graph.edges(true) {
            let crosses = (separator.left().contains(&u) && separator.right().contains(&v))
                || (separator.right().contains(&u) && separator.left().contains(&v));
            assert!(!crosses, "edge ({u:?}, {v:?}) joins left and right");
        }
        for e in separator.separating_edges() {
            assert_ne!(
                separator.separator_nodes().contains(&e.0),
                separator.separator_nodes().contains(&e.1)
            );
        }
    }

    #[test]
    fn four_cycle_uses_opposite_nodes() {
        init_tracing();
        let graph = Graph::from_edges([(1u32, 2), (2, 3), (3, 4), (4, 1)]);

        for seed in 0..10 {
            let separator = GraphSeparator::new(&graph)
                .epsilon(0.6)
                .seed(seed)
                .compute()
                .unwrap();
            assert_valid_separator(&graph, &separator);

            let mut nodes = separator.separator_nodes().iter().copied().collect_vec();
            nodes.sort();
            assert!(nodes == vec![1, 3] || nodes == vec![2, 4], "{nodes:?}");
            assert_eq!(separator.left().len(), 1);
            assert_eq!(separator.right().len(), 1);
            assert_eq!(separator.separating_edges(), &graph.edge_set());
            assert!(separator.dissection_edges(&graph).is_empty());
            assert_eq!(separator.imbalance(), -0.5);

            let (left, right) = separator.separate(&graph);
            assert_eq!((left.len(), right.len()), (1, 1));
            assert_eq!(left[0].number_of_nodes(), 1);
            assert_eq!(right[0].number_of_nodes(), 1);
        }
    }

    #[test]
    fn grid_separators_are_valid() {
        init_tracing();
        let rng = &mut Pcg64Mcg::seed_from_u64(5);
        for (rows, cols, p) in [(6, 6, 0.0), (10, 7, 0.1), (12, 12, 0.2)] {
            let graph: Graph<Node> = Grid::new().rows(rows).cols(cols).drop_prob(p).generate(rng);
            let separator = GraphSeparator::new(&graph)
                .runs(8)
                .seed(rng.random())
                .compute()
                .unwrap();
            assert_valid_separator(&graph, &separator);

            let (left, right) = separator.separate(&graph);
            let split: usize = left.iter().chain(right.iter()).map(|g| g.len()).sum();
            assert_eq!(split + separator.separator_nodes().len(), graph.len());
            for part in left.iter().chain(right.iter()) {
                assert!(part.is_connected());
            }
        }
    }

    #[test]
    fn fixed_seed_is_deterministic() {
        let rng = &mut Pcg64Mcg::seed_from_u64(9);
        let graph: Graph<Node> = Grid::new().rows(9).cols(9).drop_prob(0.1).generate(rng);

        let compute = || {
            let separator = GraphSeparator::new(&graph).runs(6).seed(42).compute().unwrap();
            separator.separator_nodes().iter().copied().sorted().collect_vec()
        };
        assert_eq!(compute(), compute());
    }

    #[test]
    fn separator_of_balanced_grid_is_small() {
        let rng = &mut Pcg64Mcg::seed_from_u64(1);
        let graph: Graph<Node> = Grid::new().rows(10).cols(10).generate(rng);
        let separator = GraphSeparator::new(&graph).seed(3).compute().unwrap();
        assert_valid_separator(&graph, &separator);
        assert!(separator.separator_nodes().len() <= 25);
        assert!(separator.imbalance() <= OPTIMAL_CUT_MAX_IMBALANCE);
    }

    #[test]
    fn disconnected_graph_has_empty_separator() {
        let mut graph = Graph::new();
        graph.connect_cycle([0u32, 1, 2, 3]);
        graph.connect_cycle([10u32, 11, 12, 13]);

        let separator = GraphSeparator::new(&graph).seed(1).compute().unwrap();
        assert_valid_separator(&graph, &separator);
        // some run may pick both terminals in the same cycle, but the best cut is the empty one
        assert!(separator.separator_nodes().is_empty());
        let (left, right) = separator.separate(&graph);
        assert_eq!(left.len() + right.len(), 2);
    }

    #[test]
    fn rejects_bad_configuration() {
        let graph = Graph::from_edges([(1u32, 2), (2, 3)]);
        assert!(matches!(
            GraphSeparator::new(&graph).epsilon(-0.5).compute(),
            Err(DissectionError::InvalidEpsilon(_))
        ));
        assert!(matches!(
            GraphSeparator::new(&graph).runs(0).compute(),
            Err(DissectionError::InvalidRuns)
        ));

        let mut single = Graph::new();
        single.add_node(1u32);
        assert!(matches!(
            GraphSeparator::new(&single).compute(),
            Err(DissectionError::GraphTooSmall { nodes: 1 })
        ));
    }

    #[test]
    fn terminal_pairs_are_distinct() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);

        let pairs = terminal_pairs(rng, 10, 20);
        assert_eq!(pairs.len(), 20);
        assert!(pairs.iter().all(|(s, t)| s != t && *s < 10 && *t < 10));
        assert_eq!(pairs.iter().unique().count(), 20);

        // three nodes allow only six ordered pairs
        let pairs = terminal_pairs(rng, 3, 20);
        assert_eq!(pairs.len(), 6);
        assert_eq!(pairs.iter().unique().count(), 6);

        assert!(terminal_pairs(rng, 1, 5).is_empty());
    }

    #[test]
    fn optimal_cut_selection() {
        let graph = EdgeIndexedGraph::from_edges(6, [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5)])
            .unwrap();
        let cut = |side: &[Node]| {
            let mut bits = NodeBitSet::new(6);
            bits.set_bits(side.iter().copied());
            EdgeCut::from_side(&graph, bits)
        };

        // expansion 1.0 but imbalance 2/3 > 0.6
        let unbalanced = cut(&[0]);
        // expansion 0.5, imbalance 1/3
        let medium = cut(&[0, 1]);
        // expansion 1/3, imbalance 0
        let best = cut(&[0, 1, 2]);

        let cuts = vec![unbalanced.clone(), medium.clone(), best.clone()];
        assert_eq!(select_optimal_cut(&cuts), Some(&best));

        let only_unbalanced = vec![unbalanced.clone()];
        assert_eq!(select_optimal_cut(&only_unbalanced), Some(&unbalanced));
        assert_eq!(select_optimal_cut(&[]), None);
    }
}
