use std::time::Instant;

use tracing::debug;

use super::*;
use crate::error::describe;

impl<T: NodeLabel> NestedDissectionTree<T> {
    /// Inserts the edge `{u, v}` into the represented graph.
    ///
    /// At least one endpoint has to be part of the tree already, a new endpoint joins the tree
    /// node of the known one. Returns the subtree rebuild the insertion caused, if any:
    ///
    /// - a new endpoint rebuilds the highest ancestor that became unbalanced, or its own tree
    ///   node if that is a leaf which is no longer a clique or a tree,
    /// - an edge within a leaf rebuilds the leaf if it is no longer a clique or a tree,
    /// - an edge between a tree node and its parent never causes a rebuild,
    /// - any other edge crosses a separator and rebuilds the subtree of the lowest common ancestor.
    ///
    /// On error, the tree is left unchanged.
    pub fn add_edge(&mut self, u: T, v: T) -> Result<Option<Recomputation>> {
        if u == v {
            return Err(DissectionError::SelfLoop(describe(u)));
        }

        match (self.find(u), self.find(v)) {
            (None, None) => Err(DissectionError::NoKnownEndpoint(describe(Edge(u, v)))),
            (Some(x), None) => self.insert_node(x, u, v),
            (None, Some(y)) => self.insert_node(y, v, u),
            (Some(x), Some(y)) if x == y => self.insert_inner_edge(x, u, v),
            (Some(x), Some(y)) => self.insert_cross_edge(x, y, u, v),
        }
    }

    /// Adds `new` to the tree node `x` holding `known`
    fn insert_node(&mut self, x: TreeNodeId, known: T, new: T) -> Result<Option<Recomputation>> {
        let path = self.ancestors_with_side(x)?;
        let node = self.node(x)?;

        let mut target = (imbalance_with(
            node.dissection_nodes.len() + 1,
            node.left_tree_size,
            node.right_tree_size,
        ) > OPTIMAL_CUT_MAX_IMBALANCE)
            .then_some(x);

        for &(ancestor, side) in &path {
            let a = self.node(ancestor)?;
            let grows = |s| usize::from(side == s);
            let imbalance = imbalance_with(
                a.dissection_nodes.len(),
                a.left_tree_size + grows(SeparationSide::Left),
                a.right_tree_size + grows(SeparationSide::Right),
            );
            if imbalance > OPTIMAL_CUT_MAX_IMBALANCE {
                target = Some(ancestor);
            }
        }

        if target.is_none() && node.is_leaf() {
            let mut leaf = node.local_graph();
            leaf.try_add_edge(known, new);
            if !leaf.is_clique_or_tree() {
                target = Some(x);
            }
        }

        if let Some(target) = target {
            let mut graph = self.rebuild_graph(target)?;
            graph.try_add_edge(known, new);
            let recomputation = self.recompute(target, graph)?;

            // sizes of the ancestors above the rebuilt subtree
            let above = path
                .iter()
                .position(|&(ancestor, _)| ancestor == target)
                .map_or(0, |i| i + 1);
            self.grow_tree_sizes(&path[above..])?;
            return Ok(Some(recomputation));
        }

        let node = self.node_mut(x)?;
        node.dissection_nodes.insert(new);
        node.dissection_edges.insert(Edge(known, new).normalized());
        node.dirty_nodes += 1;
        self.grow_tree_sizes(&path)?;
        self.index.insert(new, x);
        Ok(None)
    }

    /// Adds an edge between two graph nodes held by the same tree node `x`
    fn insert_inner_edge(&mut self, x: TreeNodeId, u: T, v: T) -> Result<Option<Recomputation>> {
        let node = self.node(x)?;
        if node.is_leaf() {
            let mut leaf = node.local_graph();
            leaf.try_add_edge(u, v);
            if !leaf.is_clique_or_tree() {
                let mut graph = self.rebuild_graph(x)?;
                graph.try_add_edge(u, v);
                return self.recompute(x, graph).map(Some);
            }
        }

        self.node_mut(x)?
            .dissection_edges
            .insert(Edge(u, v).normalized());
        Ok(None)
    }

    /// Adds an edge between graph nodes held by distinct tree nodes `x` and `y`
    fn insert_cross_edge(
        &mut self,
        x: TreeNodeId,
        y: TreeNodeId,
        u: T,
        v: T,
    ) -> Result<Option<Recomputation>> {
        let edge = Edge(u, v).normalized();

        if self.node(x)?.parent == Some(y) {
            self.node_mut(y)?.edges_to_children.insert(edge);
            return Ok(None);
        }
        if self.node(y)?.parent == Some(x) {
            self.node_mut(x)?.edges_to_children.insert(edge);
            return Ok(None);
        }

        let lca = self.lowest_common_ancestor(x, y)?;
        let mut graph = self.rebuild_graph(lca)?;
        graph.try_add_edge(u, v);
        self.recompute(lca, graph).map(Some)
    }

    /// All proper ancestors of `x`, bottom-up, each with the side the path enters it from
    fn ancestors_with_side(&self, x: TreeNodeId) -> Result<Vec<(TreeNodeId, SeparationSide)>> {
        let mut path = Vec::new();
        let mut current = x;
        while let Some(parent) = self.node(current)?.parent {
            let side = self
                .node(current)?
                .side
                .ok_or(DissectionError::MissingParent(current))?;
            path.push((parent, side));
            current = parent;
        }
        Ok(path)
    }

    fn grow_tree_sizes(&mut self, path: &[(TreeNodeId, SeparationSide)]) -> Result<()> {
        for &(ancestor, side) in path {
            *self.node_mut(ancestor)?.tree_size_mut(side) += 1;
        }
        Ok(())
    }

    fn lowest_common_ancestor(&self, x: TreeNodeId, y: TreeNodeId) -> Result<TreeNodeId> {
        let parent_of = |id: TreeNodeId| -> Result<TreeNodeId> {
            self.node(id)?
                .parent
                .ok_or(DissectionError::MissingParent(id))
        };

        let (mut a, mut b) = (x, y);
        while a != b {
            let (depth_a, depth_b) = (self.node(a)?.depth, self.node(b)?.depth);
            if depth_a >= depth_b {
                a = parent_of(a)?;
            }
            if depth_b >= depth_a {
                b = parent_of(b)?;
            }
        }
        Ok(a)
    }

    /// Replaces the subtree rooted at `target` by a fresh dissection of `graph` at the same
    /// depth and side. Nothing is modified if the dissection fails.
    fn recompute(&mut self, target: TreeNodeId, graph: Graph<T>) -> Result<Recomputation> {
        let node = self.node(target)?;
        let (side, depth) = (node.side, node.depth);
        if !node.is_root() && side.is_none() {
            return Err(DissectionError::MissingParent(target));
        }

        let nodes = graph.len();
        let start = Instant::now();
        let saved_rng = self.rng.clone();
        let subtree = match dissect(graph, side, depth, &self.config, &mut self.rng) {
            Ok(subtree) => subtree,
            Err(err) => {
                self.rng = saved_rng;
                return Err(err);
            }
        };
        let duration = start.elapsed();

        let root = self.replace_subtree(target, subtree);
        self.refresh();

        let recomputation = Recomputation {
            root,
            depth,
            nodes,
            duration,
        };
        debug!(
            depth,
            nodes,
            tree_nodes = self.number_of_tree_nodes(),
            ?duration,
            "subtree recomputed"
        );
        if let Some(observer) = self.observer.as_mut() {
            observer.on_recomputation(&recomputation);
        }

        Ok(recomputation)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::{
        gens::*,
        testing::init_tracing,
        tree::tests::{assert_consistent, assert_partition},
    };

    fn build<T: NodeLabel>(graph: &Graph<T>, seed: u64) -> NestedDissectionTree<T> {
        NestedDissectionTree::build(graph, DissectionConfig::default().runs(8).seed(seed)).unwrap()
    }

    #[test]
    fn new_node_in_triangle_rebuilds_leaf() {
        init_tracing();
        let mut graph = Graph::from_edges([(1u32, 2), (2, 3), (3, 1)]);
        let mut tree = build(&graph, 1);

        // {1, 2, 3, 6} with 4 edges is neither a clique nor a tree
        let recomputation = tree.add_edge(3, 6).unwrap().unwrap();
        graph.add_edge(3, 6);

        assert_eq!(recomputation.depth, 0);
        assert_eq!(recomputation.nodes, 4);
        assert_eq!(recomputation.root, tree.root());
        assert!(tree.number_of_tree_nodes() > 1);
        assert_eq!(tree.num_dirty_nodes(), 0);
        assert!(tree.contains(6));

        assert_consistent(&tree);
        assert_partition(&tree, &graph);
        assert!(tree.rebuild_graph(tree.root()).unwrap().same_structure(&graph));
    }

    #[test]
    fn new_leaf_node_keeps_tree_shape() {
        let mut graph = Graph::from_edges([(1u32, 2), (2, 3)]);
        let mut tree = build(&graph, 2);

        assert!(tree.add_edge(3, 4).unwrap().is_none());
        assert!(tree.add_edge(5, 1).unwrap().is_none());
        graph.add_edges([(3, 4), (5, 1)]);

        assert_eq!(tree.number_of_tree_nodes(), 1);
        assert_eq!(tree.num_dirty_nodes(), 2);
        assert_eq!(tree.find(4), Some(tree.root()));
        assert!(tree.rebuild_graph(tree.root()).unwrap().same_structure(&graph));
    }

    #[test]
    fn edge_inside_leaf() {
        let mut graph = Graph::from_edges([(1u32, 2), (2, 3), (3, 4)]);
        let mut tree = build(&graph, 3);

        // closing the path to a cycle breaks the leaf condition
        let recomputation = tree.add_edge(4, 1).unwrap();
        graph.add_edge(4, 1);
        assert!(recomputation.is_some());
        assert_eq!(tree.number_of_tree_nodes(), 3);
        assert!(tree.rebuild_graph(tree.root()).unwrap().same_structure(&graph));

        // an edge already present changes nothing
        let mut clique = Graph::new();
        clique.connect_clique([1u32, 2, 3]);
        let mut tree = build(&clique, 3);
        assert!(tree.add_edge(2, 1).unwrap().is_none());
        assert_eq!(tree.rebuild_graph(tree.root()).unwrap().number_of_edges(), 3);
    }

    #[test]
    fn edge_to_parent_separator_is_recorded() {
        let mut graph = Graph::from_edges([(1u32, 2), (2, 3), (3, 4), (4, 1)]);
        let mut tree = build(&graph, 4);
        let root = tree.root();
        let leaf = tree.node(root).unwrap().children()[0];
        let u = *tree.node(leaf).unwrap().dissection_nodes().iter().next().unwrap();
        let s = *tree.node(root).unwrap().dissection_nodes().iter().next().unwrap();

        // the singleton leaf grows into a path and stays a leaf
        assert!(tree.add_edge(u, 50).unwrap().is_none());
        assert_eq!(tree.find(50), Some(leaf));
        let root_node = tree.node(root).unwrap();
        assert_eq!(root_node.left_tree_size() + root_node.right_tree_size(), 3);

        assert!(tree.add_edge(50, s).unwrap().is_none());
        graph.add_edges([(u, 50), (50, s)]);

        assert_eq!(tree.root(), root);
        assert!(tree.node(root).unwrap().edges_to_children().contains(&Edge(s, 50)));
        assert_eq!(tree.num_dirty_nodes(), 1);
        assert_consistent(&tree);
        assert!(tree.rebuild_graph(root).unwrap().same_structure(&graph));
    }

    #[test]
    fn edge_across_separator_rebuilds_lca() {
        let mut graph = Graph::from_edges([(1u32, 2), (2, 3), (3, 4), (4, 1)]);
        let mut tree = build(&graph, 5);

        let root = tree.root();
        let leaves = tree.node(root).unwrap().children().to_vec();
        assert_eq!(leaves.len(), 2);
        let u = *tree.node(leaves[0]).unwrap().dissection_nodes().iter().next().unwrap();
        let v = *tree.node(leaves[1]).unwrap().dissection_nodes().iter().next().unwrap();

        let recomputation = tree.add_edge(u, v).unwrap().unwrap();
        graph.add_edge(u, v);

        // the lowest common ancestor of two siblings is the root
        assert_eq!(recomputation.depth, 0);
        assert_eq!(recomputation.nodes, 4);
        assert_eq!(tree.root(), recomputation.root);
        assert_consistent(&tree);
        assert!(tree.rebuild_graph(tree.root()).unwrap().same_structure(&graph));
    }

    #[test]
    fn invalid_insertions_leave_tree_unchanged() {
        let graph = Graph::from_edges([(1u32, 2), (2, 3), (3, 4), (4, 1)]);
        let mut tree = build(&graph, 6);
        let order = tree.elimination_order();

        assert!(matches!(
            tree.add_edge(7, 8),
            Err(DissectionError::NoKnownEndpoint(_))
        ));
        assert!(matches!(
            tree.add_edge(2, 2),
            Err(DissectionError::SelfLoop(_))
        ));
        assert!(tree.add_edge(9, 9).unwrap_err().is_argument_error());

        assert_eq!(tree.elimination_order(), order);
        assert!(tree.rebuild_graph(tree.root()).unwrap().same_structure(&graph));
    }

    #[test]
    fn unbalanced_growth_triggers_rebuild() {
        // star-like growth at a leaf of the 4-cycle unbalances the root
        let mut graph = Graph::from_edges([(1u32, 2), (2, 3), (3, 4), (4, 1)]);
        let mut tree = build(&graph, 7);
        let root = tree.root();
        let leaf = tree.node(root).unwrap().children()[0];
        let anchor = *tree.node(leaf).unwrap().dissection_nodes().iter().next().unwrap();

        let mut rebuilt = false;
        for new in 100u32..116 {
            let recomputation = tree.add_edge(anchor, new).unwrap();
            graph.add_edge(anchor, new);
            rebuilt |= recomputation.is_some();
            assert_consistent(&tree);
            assert!(tree.rebuild_graph(tree.root()).unwrap().same_structure(&graph));
        }
        assert!(rebuilt);
    }

    fn separator_node(
        sep: u32,
        cut: [(u32, u32); 2],
        sizes: (usize, usize),
        side: Option<SeparationSide>,
        depth: usize,
    ) -> DissectionNode<u32> {
        let mut graph = Graph::new();
        graph.add_node(sep);
        let mut node = DissectionNode::leaf(&graph, side, depth);
        node.edges_to_children = cut.into_iter().map(Edge::from).collect();
        (node.left_tree_size, node.right_tree_size) = sizes;
        node
    }

    /// Root separator `{0}` above a left separator `{1}`; the left leaf of `{1}` is the path
    /// `10..10+left`, its right leaf is `{2}` and the right leaf of the root is the path `30..30+right`
    fn two_level_tree(left: u32, right: u32) -> (NestedDissectionTree<u32>, Graph<u32>) {
        let mut graph = Graph::from_edges([(0u32, 1), (0, 30), (1, 10), (1, 2)]);
        graph.connect_path(10..10 + left);
        graph.connect_path(30..30 + right);

        let path = |nodes: std::ops::Range<u32>| {
            let mut g = Graph::new();
            g.connect_path(nodes);
            g
        };
        let mut nodes = vec![
            separator_node(0, [(0, 1), (0, 30)], (left as usize + 2, right as usize), None, 0),
            separator_node(1, [(1, 10), (1, 2)], (left as usize, 1), Some(SeparationSide::Left), 1),
            DissectionNode::leaf(&path(30..30 + right), Some(SeparationSide::Right), 1),
            DissectionNode::leaf(&path(10..10 + left), Some(SeparationSide::Left), 2),
            DissectionNode::leaf(&path(2..3), Some(SeparationSide::Right), 2),
        ];
        for (child, parent) in [(1, 0), (2, 0), (3, 1), (4, 1)] {
            nodes[child].parent = Some(TreeNodeId(parent));
            nodes[parent as usize].children.push(TreeNodeId(child as u32));
        }

        let config = DissectionConfig::default().runs(4).seed(10);
        let mut tree = NestedDissectionTree {
            arena: Vec::new(),
            free: Vec::new(),
            root: TreeNodeId(0),
            ordered: Vec::new(),
            index: FxHashMap::default(),
            rng: config.rng(),
            config,
            observer: None,
        };
        tree.root = tree.attach(nodes, None);
        tree.refresh();
        (tree, graph)
    }

    #[test]
    fn highest_unbalanced_ancestor_is_rebuilt() {
        let (mut tree, mut graph) = two_level_tree(9, 1);
        assert_consistent(&tree);
        assert!(tree.rebuild_graph(tree.root()).unwrap().same_structure(&graph));

        // both separators become unbalanced: {1} at 10:1 and {0} at 12:1
        let recomputation = tree.add_edge(18, 99).unwrap().unwrap();
        graph.add_edge(18, 99);

        assert_eq!(recomputation.depth, 0);
        assert_eq!(recomputation.nodes, 14);
        assert_eq!(recomputation.root, tree.root());
        // the whole graph is a tree now
        assert_eq!(tree.number_of_tree_nodes(), 1);
        assert_consistent(&tree);
        assert!(tree.rebuild_graph(tree.root()).unwrap().same_structure(&graph));
    }

    #[test]
    fn sizes_above_rebuilt_subtree_grow() {
        let (mut tree, mut graph) = two_level_tree(9, 8);
        let root = tree.root();

        // only {1} becomes unbalanced, the root stays at 12:8
        let recomputation = tree.add_edge(18, 99).unwrap().unwrap();
        graph.add_edge(18, 99);

        assert_eq!(recomputation.depth, 1);
        assert_eq!(recomputation.nodes, 12);
        assert_eq!(tree.root(), root);
        let root_node = tree.node(root).unwrap();
        assert_eq!(root_node.children()[0], recomputation.root);
        assert_eq!(root_node.left_tree_size(), 12);
        assert_eq!(root_node.right_tree_size(), 8);
        assert_eq!(tree.number_of_tree_nodes(), 3);
        assert_consistent(&tree);

        // growing the right leaf only touches the counters
        assert!(tree.add_edge(37, 98).unwrap().is_none());
        graph.add_edge(37, 98);
        assert_eq!(tree.node(root).unwrap().right_tree_size(), 9);
        assert_eq!(tree.node(root).unwrap().left_tree_size(), 12);
        assert_consistent(&tree);
        assert!(tree.rebuild_graph(root).unwrap().same_structure(&graph));
    }

    #[test]
    fn random_insertions_round_trip() {
        init_tracing();
        let rng = &mut Pcg64Mcg::seed_from_u64(21);

        for round in 0..3 {
            let mut graph: Graph<Node> = Grid::new().rows(6).cols(6).drop_prob(0.1).generate(rng);
            let mut tree = build(&graph, round);

            let mut next = 1000;
            for _ in 0..40 {
                let u = rng.random_range(0..36);
                let v = if rng.random_bool(0.4) {
                    next += 1;
                    next
                } else {
                    rng.random_range(0..36)
                };
                if u == v || !graph.has_vertex(u) {
                    continue;
                }

                tree.add_edge(u, v).unwrap();
                graph.try_add_edge(u, v);

                assert_consistent(&tree);
                assert_partition(&tree, &graph);
                assert!(tree.rebuild_graph(tree.root()).unwrap().same_structure(&graph));
            }
        }
    }

    #[test]
    fn observer_sees_every_rebuild() {
        let log = Arc::new(Mutex::new(RecomputationLog::new()));
        let graph = Graph::from_edges([(1u32, 2), (2, 3), (3, 1)]);
        let mut tree = build(&graph, 8).observer(log.clone());

        let first = tree.add_edge(3, 4).unwrap();
        let second = tree.add_edge(1, 2).unwrap();
        assert!(first.is_some());
        assert!(second.is_none());

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].nodes, 4);
        assert_eq!(log.mean_depth(), Some(0.0));
    }

    #[test]
    fn handles_of_rebuilt_subtrees_are_invalid() {
        let graph = Graph::from_edges([(1u32, 2), (2, 3), (3, 4), (4, 1)]);
        let mut tree = build(&graph, 9);
        let before = tree.ordered_nodes().to_vec();

        let leaves = tree.node(tree.root()).unwrap().children().to_vec();
        let u = *tree.node(leaves[0]).unwrap().dissection_nodes().iter().next().unwrap();
        let v = *tree.node(leaves[1]).unwrap().dissection_nodes().iter().next().unwrap();
        tree.add_edge(u, v).unwrap();

        // freed slots are reused, every live handle resolves
        for id in tree.ordered_nodes() {
            assert!(tree.node(*id).is_ok());
        }
        assert_eq!(before.len(), 3);
        assert!(tree.arena.len() <= 4);
        assert_eq!(tree.arena.iter().flatten().count(), tree.number_of_tree_nodes());
    }
}
