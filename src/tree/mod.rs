/*!
# Nested Dissection Trees

A [`NestedDissectionTree`] recursively splits a graph by balanced vertex separators
(see [`GraphSeparator`]) until every remaining piece is a clique or a tree.
Internal tree nodes hold separators, leaves hold the remaining pieces, and the post-order of the
tree is an elimination order of the graph.

The tree is kept up to date under edge insertions: [`NestedDissectionTree::add_edge`] patches the
affected tree node locally whenever possible and only rebuilds the smallest subtree that became
unbalanced or invalid.

```rust
use ndtree::{prelude::*, gens::*, tree::*};

let mut graph = Graph::new();
graph.connect_clique([1u32, 2, 3]);

let mut tree = NestedDissectionTree::build(&graph, DissectionConfig::default().seed(1)).unwrap();
assert_eq!(tree.number_of_tree_nodes(), 1);

// the leaf {1, 2, 3, 4} is neither a clique nor a tree anymore and gets rebuilt
let recomputation = tree.add_edge(3, 4).unwrap();
assert!(recomputation.is_some());
assert_eq!(tree.elimination_order().len(), 4);
assert_eq!(tree.rebuild_graph(tree.root()).unwrap().number_of_edges(), 4);
```

Nodes live in an arena and are addressed by [`TreeNodeId`]s; handles of rebuilt subtrees become
invalid. Mutation is not synchronized, edge insertions have to be serialized by the caller.
*/

use std::fmt::Debug;

use fxhash::{FxHashMap, FxHashSet};
use itertools::Itertools;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use tracing::info;

use crate::{algo::*, error::check_epsilon, prelude::*};

mod builder;
mod dissector;
mod insertion;
mod node;
mod observer;

use builder::dissect;

pub use dissector::*;
pub use node::*;
pub use observer::*;

/// Parameters of the separator computations of a tree.
///
/// ```rust
/// use ndtree::tree::DissectionConfig;
///
/// let config = DissectionConfig::default().epsilon(0.5).runs(8).seed(3);
/// assert_eq!(config.runs, 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DissectionConfig {
    /// Imbalance tolerance of every FlowCutter run, in `[0, 1]`
    pub epsilon: f64,
    /// FlowCutter runs per separator
    pub runs: usize,
    /// Seed of the tree's random generator; drawn from the thread RNG if `None`
    pub seed: Option<u64>,
}

impl Default for DissectionConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            runs: DEFAULT_RUNS,
            seed: None,
        }
    }
}

impl DissectionConfig {
    /// Sets the imbalance tolerance of every FlowCutter run
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
    }

    /// Sets the imbalance tolerance of every FlowCutter run
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.set_epsilon(epsilon);
        self
    }

    /// Sets the number of FlowCutter runs per separator
    pub fn set_runs(&mut self, runs: usize) {
        self.runs = runs;
    }

    /// Sets the number of FlowCutter runs per separator
    pub fn runs(mut self, runs: usize) -> Self {
        self.set_runs(runs);
        self
    }

    /// Fixes the seed of the tree's random generator
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = Some(seed);
    }

    /// Fixes the seed of the tree's random generator
    pub fn seed(mut self, seed: u64) -> Self {
        self.set_seed(seed);
        self
    }

    /// Fails for an epsilon outside of `[0, 1]` or zero runs
    pub fn validate(&self) -> Result<()> {
        check_epsilon(self.epsilon)?;
        if self.runs == 0 {
            return Err(DissectionError::InvalidRuns);
        }
        Ok(())
    }

    pub(crate) fn rng(&self) -> Pcg64Mcg {
        Pcg64Mcg::seed_from_u64(self.seed.unwrap_or_else(|| rand::rng().random()))
    }
}

/// A nested dissection tree over nodes of type `T`. See the [module documentation](self).
pub struct NestedDissectionTree<T: NodeLabel> {
    arena: Vec<Option<DissectionNode<T>>>,
    free: Vec<TreeNodeId>,
    root: TreeNodeId,
    /// post-order, i.e. the elimination order
    ordered: Vec<TreeNodeId>,
    index: FxHashMap<T, TreeNodeId>,
    config: DissectionConfig,
    rng: Pcg64Mcg,
    observer: Option<Box<dyn RecomputationObserver>>,
}

impl<T: NodeLabel> Debug for NestedDissectionTree<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NestedDissectionTree")
            .field("root", &self.root)
            .field("tree_nodes", &self.ordered.len())
            .field("graph_nodes", &self.index.len())
            .field("config", &self.config)
            .finish()
    }
}

impl<T: NodeLabel> NestedDissectionTree<T> {
    /// Builds the tree of `graph`.
    ///
    /// Fails if `config` is invalid or a separator computation fails.
    pub fn build<G>(graph: &G, config: DissectionConfig) -> Result<Self>
    where
        G: AdjacencyList<Label = T>,
    {
        config.validate()?;

        let graph: Graph<T> = graph.vertex_induced_as(graph.vertices());
        let (n, m) = (graph.number_of_nodes(), graph.number_of_edges());

        let mut rng = config.rng();
        let subtree = dissect(graph, None, 0, &config, &mut rng)?;

        let mut tree = Self {
            arena: Vec::with_capacity(subtree.len()),
            free: Vec::new(),
            root: TreeNodeId(0),
            ordered: Vec::new(),
            index: FxHashMap::default(),
            config,
            rng,
            observer: None,
        };
        tree.root = tree.attach(subtree, None);
        tree.refresh();

        info!(
            nodes = n,
            edges = m,
            tree_nodes = tree.number_of_tree_nodes(),
            height = tree.height(),
            "nested dissection tree built"
        );

        Ok(tree)
    }

    /// Builds the tree with a random seed
    pub fn new<G>(graph: &G, epsilon: f64, runs: usize) -> Result<Self>
    where
        G: AdjacencyList<Label = T>,
    {
        Self::build(graph, DissectionConfig::default().epsilon(epsilon).runs(runs))
    }

    /// Attaches `observer`; it is notified of every subtree rebuild
    pub fn set_observer(&mut self, observer: impl RecomputationObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Attaches `observer`; it is notified of every subtree rebuild
    pub fn observer(mut self, observer: impl RecomputationObserver + 'static) -> Self {
        self.set_observer(observer);
        self
    }

    /// Detaches and returns the current observer
    pub fn take_observer(&mut self) -> Option<Box<dyn RecomputationObserver>> {
        self.observer.take()
    }

    pub fn config(&self) -> &DissectionConfig {
        &self.config
    }

    pub fn root(&self) -> TreeNodeId {
        self.root
    }

    /// Returns the tree node behind `id`
    pub fn node(&self, id: TreeNodeId) -> Result<&DissectionNode<T>> {
        self.get(id).ok_or(DissectionError::UnknownTreeNode(id))
    }

    fn get(&self, id: TreeNodeId) -> Option<&DissectionNode<T>> {
        self.arena.get(id.index()).and_then(Option::as_ref)
    }

    pub(crate) fn node_mut(&mut self, id: TreeNodeId) -> Result<&mut DissectionNode<T>> {
        self.arena
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(DissectionError::UnknownTreeNode(id))
    }

    /// All tree nodes in post-order (children before their parent)
    pub fn ordered_nodes(&self) -> &[TreeNodeId] {
        &self.ordered
    }

    /// Iterates over all tree nodes in post-order
    pub fn iter(&self) -> impl Iterator<Item = (TreeNodeId, &DissectionNode<T>)> + '_ {
        self.ordered
            .iter()
            .filter_map(|&id| self.get(id).map(|node| (id, node)))
    }

    /// Graph nodes in elimination order: the dissection nodes of all tree nodes in post-order,
    /// sorted within each tree node
    pub fn elimination_order(&self) -> Vec<T> {
        self.iter()
            .flat_map(|(_, node)| node.dissection_nodes.iter().copied().sorted_unstable())
            .collect()
    }

    /// Tree node holding the graph node `u`
    pub fn find(&self, u: T) -> Option<TreeNodeId> {
        self.index.get(&u).copied()
    }

    pub fn contains(&self, u: T) -> bool {
        self.index.contains_key(&u)
    }

    /// Depth of the tree node holding `u`
    pub fn depth_of(&self, u: T) -> Option<usize> {
        self.find(u).and_then(|id| self.get(id)).map(|node| node.depth)
    }

    pub fn number_of_tree_nodes(&self) -> usize {
        self.ordered.len()
    }

    /// Number of graph nodes represented by the tree
    pub fn number_of_graph_nodes(&self) -> usize {
        self.index.len()
    }

    /// Largest depth of any tree node
    pub fn height(&self) -> usize {
        self.iter().map(|(_, node)| node.depth).max().unwrap_or(0)
    }

    /// Number of graph nodes inserted into existing tree nodes without a rebuild
    pub fn num_dirty_nodes(&self) -> usize {
        self.iter().map(|(_, node)| node.dirty_nodes).sum()
    }

    /// Returns the graph nodes held by all tree nodes within `hops` parent/child steps of `id`,
    /// in sorted order
    pub fn nodes_at_hop_distance(&self, id: TreeNodeId, hops: usize) -> Result<Vec<T>> {
        self.node(id)?;

        let mut visited = FxHashSet::default();
        visited.insert(id);
        let mut frontier = vec![id];
        for _ in 0..hops {
            let mut next = Vec::new();
            for id in frontier {
                let node = self.node(id)?;
                for nb in node.parent.into_iter().chain(node.children.iter().copied()) {
                    if visited.insert(nb) {
                        next.push(nb);
                    }
                }
            }
            frontier = next;
        }

        let mut labels = Vec::new();
        for id in visited {
            labels.extend(self.node(id)?.dissection_nodes.iter().copied());
        }
        labels.sort_unstable();
        Ok(labels)
    }

    /// Reconstructs the graph represented by the subtree rooted at `id`: all dissection nodes,
    /// dissection edges and edges to children below and including `id`
    pub fn rebuild_graph(&self, id: TreeNodeId) -> Result<Graph<T>> {
        let mut graph = Graph::new();
        let mut edges = Vec::new();

        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let node = self.node(id)?;
            graph.add_nodes(node.dissection_nodes.iter().copied());
            edges.extend(
                node.dissection_edges
                    .iter()
                    .chain(node.edges_to_children.iter())
                    .copied(),
            );
            stack.extend(node.children.iter().copied());
        }

        graph.add_edges(edges);
        Ok(graph)
    }

    /// Moves a detached subtree into the arena below `parent`, returns the handle of its root
    fn attach(&mut self, subtree: Vec<DissectionNode<T>>, parent: Option<TreeNodeId>) -> TreeNodeId {
        let ids = subtree.iter().map(|_| self.allocate()).collect_vec();

        for (mut node, &id) in subtree.into_iter().zip(&ids) {
            node.parent = match node.parent {
                Some(local) => Some(ids[local.index()]),
                None => parent,
            };
            for child in node.children.iter_mut() {
                *child = ids[child.index()];
            }
            self.arena[id.index()] = Some(node);
        }

        ids[0]
    }

    fn allocate(&mut self) -> TreeNodeId {
        self.free.pop().unwrap_or_else(|| {
            self.arena.push(None);
            TreeNodeId((self.arena.len() - 1) as u32)
        })
    }

    /// Frees all slots of the subtree rooted at `id`
    fn release(&mut self, id: TreeNodeId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.arena.get_mut(id.index()).and_then(Option::take) {
                stack.extend(node.children);
                self.free.push(id);
            }
        }
    }

    /// Replaces the subtree rooted at `old` by a detached subtree at the same position
    fn replace_subtree(&mut self, old: TreeNodeId, subtree: Vec<DissectionNode<T>>) -> TreeNodeId {
        let parent = self.get(old).and_then(|node| node.parent);
        self.release(old);
        let new = self.attach(subtree, parent);

        match parent.and_then(|p| self.arena.get_mut(p.index()).and_then(Option::as_mut)) {
            Some(parent) => {
                if let Some(slot) = parent.children.iter_mut().find(|c| **c == old) {
                    *slot = new;
                }
            }
            None => self.root = new,
        }

        new
    }

    /// Recomputes the post-order and the label index
    fn refresh(&mut self) {
        let mut ordered = Vec::with_capacity(self.ordered.len());
        let mut stack = vec![(self.root, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                ordered.push(id);
                continue;
            }
            stack.push((id, true));
            if let Some(node) = self.arena[id.index()].as_ref() {
                stack.extend(node.children.iter().rev().map(|&c| (c, false)));
            }
        }

        self.index.clear();
        for &id in &ordered {
            if let Some(node) = self.arena[id.index()].as_ref() {
                self.index
                    .extend(node.dissection_nodes.iter().map(|&u| (u, id)));
            }
        }
        self.ordered = ordered;
    }
}
