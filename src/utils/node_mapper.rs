/*!
# Node Mapper

Bijection between the labels of a graph and dense ids `0..n`.
Ids are assigned in increasing label order, so two mappers built from the same label set
agree, independently of the (hash) order in which labels were supplied.
*/

use fxhash::FxHashMap;
use itertools::Itertools;

use crate::{edge::*, node::*};

/// Read access to a mapping between labels (old ids) and dense nodes (new ids)
pub trait NodeMapGetter<T> {
    /// Returns the dense id of `old` if it is mapped
    fn new_id_of(&self, old: T) -> Option<Node>;

    /// Returns the label of the dense id `new` if it is mapped
    fn old_id_of(&self, new: Node) -> Option<T>;

    /// Number of mapped nodes
    fn len(&self) -> usize;

    /// Returns *true* if nothing is mapped
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Translates a labelled edge into a dense edge if both endpoints are mapped
    fn new_edge_of(&self, edge: Edge<T>) -> Option<Edge>
    where
        T: Copy,
    {
        Some(Edge(self.new_id_of(edge.0)?, self.new_id_of(edge.1)?))
    }

    /// Translates a dense edge into a labelled edge if both endpoints are mapped
    fn old_edge_of(&self, edge: Edge) -> Option<Edge<T>> {
        Some(Edge(self.old_id_of(edge.0)?, self.old_id_of(edge.1)?))
    }
}

/// Label to dense id mapping backed by a sorted label vector and a hash index
#[derive(Clone, Debug)]
pub struct NodeMapper<T> {
    labels: Vec<T>,
    ids: FxHashMap<T, Node>,
}

impl<T: NodeLabel> NodeMapper<T> {
    /// Creates a mapper for the given labels; duplicates are ignored.
    ///
    /// # Example
    /// ```
    /// use ndtree::utils::*;
    ///
    /// let mapper = NodeMapper::from_labels([30u64, 10, 20, 10]);
    /// assert_eq!(mapper.len(), 3);
    /// assert_eq!(mapper.new_id_of(10), Some(0));
    /// assert_eq!(mapper.old_id_of(2), Some(30));
    /// ```
    pub fn from_labels<I>(labels: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let labels = labels.into_iter().sorted_unstable().dedup().collect_vec();
        let ids = labels
            .iter()
            .enumerate()
            .map(|(i, &label)| (label, i as Node))
            .collect();
        Self { labels, ids }
    }

    /// All mapped labels ordered by their dense id
    pub fn labels(&self) -> &[T] {
        &self.labels
    }
}

impl<T: NodeLabel> NodeMapGetter<T> for NodeMapper<T> {
    fn new_id_of(&self, old: T) -> Option<Node> {
        self.ids.get(&old).copied()
    }

    fn old_id_of(&self, new: Node) -> Option<T> {
        self.labels.get(new as usize).copied()
    }

    fn len(&self) -> usize {
        self.labels.len()
    }
}
