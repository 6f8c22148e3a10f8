use std::fmt::Display;

use fxhash::FxHashSet;

use super::*;

/// Handle of a node in the arena of a [`NestedDissectionTree`].
///
/// Handles of replaced subtrees become invalid and may be reused by later recomputations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreeNodeId(pub(crate) u32);

impl TreeNodeId {
    /// Position of the node in the arena
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for TreeNodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Side of the parent's separator a subtree lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeparationSide {
    Left,
    Right,
}

/// A node of a nested dissection tree.
///
/// Internal nodes hold a separator; leaves hold a whole clique or tree. Edges between two nodes
/// of the same tree node are *dissection edges*, edges from the separator into the subtree below
/// are *edges to children*.
#[derive(Debug, Clone)]
pub struct DissectionNode<T: NodeLabel> {
    pub(crate) dissection_nodes: FxHashSet<T>,
    pub(crate) dissection_edges: FxHashSet<Edge<T>>,
    pub(crate) edges_to_children: FxHashSet<Edge<T>>,
    pub(crate) parent: Option<TreeNodeId>,
    pub(crate) side: Option<SeparationSide>,
    pub(crate) children: Vec<TreeNodeId>,
    pub(crate) left_tree_size: usize,
    pub(crate) right_tree_size: usize,
    pub(crate) depth: usize,
    pub(crate) dirty_nodes: usize,
}

impl<T: NodeLabel> DissectionNode<T> {
    /// Leaf holding all nodes and edges of `graph`
    pub(crate) fn leaf(graph: &Graph<T>, side: Option<SeparationSide>, depth: usize) -> Self {
        Self {
            dissection_nodes: graph.node_set(),
            dissection_edges: graph.edge_set(),
            edges_to_children: FxHashSet::default(),
            parent: None,
            side,
            children: Vec::new(),
            left_tree_size: 0,
            right_tree_size: 0,
            depth,
            dirty_nodes: 0,
        }
    }

    /// Internal node holding the separator of `graph`
    pub(crate) fn separator(
        graph: &Graph<T>,
        separator: &Separator<T>,
        left_tree_size: usize,
        right_tree_size: usize,
        side: Option<SeparationSide>,
        depth: usize,
    ) -> Self {
        Self {
            dissection_nodes: separator.separator_nodes().clone(),
            dissection_edges: separator.dissection_edges(graph),
            edges_to_children: separator.separating_edges().clone(),
            parent: None,
            side,
            children: Vec::new(),
            left_tree_size,
            right_tree_size,
            depth,
            dirty_nodes: 0,
        }
    }

    /// Separator nodes of an internal node, all nodes of a leaf
    pub fn dissection_nodes(&self) -> &FxHashSet<T> {
        &self.dissection_nodes
    }

    /// Edges with both endpoints in [`DissectionNode::dissection_nodes`]
    pub fn dissection_edges(&self) -> &FxHashSet<Edge<T>> {
        &self.dissection_edges
    }

    /// Edges from a dissection node into the subtree below
    pub fn edges_to_children(&self) -> &FxHashSet<Edge<T>> {
        &self.edges_to_children
    }

    /// Parent handle, `None` for the root
    pub fn parent(&self) -> Option<TreeNodeId> {
        self.parent
    }

    /// Side of the parent's separator, `None` for the root
    pub fn side(&self) -> Option<SeparationSide> {
        self.side
    }

    /// Child handles, left children first
    pub fn children(&self) -> &[TreeNodeId] {
        &self.children
    }

    /// Number of graph nodes in all left subtrees
    pub fn left_tree_size(&self) -> usize {
        self.left_tree_size
    }

    /// Number of graph nodes in all right subtrees
    pub fn right_tree_size(&self) -> usize {
        self.right_tree_size
    }

    pub fn tree_size(&self, side: SeparationSide) -> usize {
        match side {
            SeparationSide::Left => self.left_tree_size,
            SeparationSide::Right => self.right_tree_size,
        }
    }

    pub(crate) fn tree_size_mut(&mut self, side: SeparationSide) -> &mut usize {
        match side {
            SeparationSide::Left => &mut self.left_tree_size,
            SeparationSide::Right => &mut self.right_tree_size,
        }
    }

    /// Distance to the root
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of graph nodes inserted into this node since it was built
    pub fn dirty_nodes(&self) -> usize {
        self.dirty_nodes
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Number of graph nodes in the subtree rooted here
    pub fn subtree_size(&self) -> usize {
        self.dissection_nodes.len() + self.left_tree_size + self.right_tree_size
    }

    /// `2 * max(left, right) / subtree_size - 1`; a leaf has imbalance `-1`
    pub fn imbalance(&self) -> f64 {
        imbalance_with(
            self.dissection_nodes.len(),
            self.left_tree_size,
            self.right_tree_size,
        )
    }

    /// Returns *true* if the imbalance is at most [`OPTIMAL_CUT_MAX_IMBALANCE`]
    pub fn is_balanced(&self) -> bool {
        self.imbalance() <= OPTIMAL_CUT_MAX_IMBALANCE
    }

    /// Graph on the dissection nodes and dissection edges
    pub fn local_graph(&self) -> Graph<T> {
        let mut graph = Graph::with_capacity(self.dissection_nodes.len());
        graph.add_nodes(self.dissection_nodes.iter().copied());
        graph.add_edges(self.dissection_edges.iter().copied());
        graph
    }
}

/// Imbalance of a tree node with `separator` own nodes and subtrees of the given sizes
pub(crate) fn imbalance_with(separator: usize, left: usize, right: usize) -> f64 {
    let total = separator + left + right;
    if total == 0 {
        return -1.0;
    }
    2.0 * left.max(right) as f64 / total as f64 - 1.0
}
