/*!
# Node Representation

Graphs handed to this crate are **labelled**: a node can be any small, copyable and totally ordered
value such as an OSM id (`u64`), a grid coordinate `(i32, i32)` or a plain `u32`.
Such values implement [`NodeLabel`] automatically.

Algorithms that need dense indexing (most notably the flow engine) map labels onto
`Node = u32` in the range `0..n`, ordered by label (see [`NodeMapper`](crate::utils::NodeMapper)).
This keeps hot loops on plain vectors and bitsets while the public API stays generic.
*/

use std::{fmt::Debug, hash::Hash};

use stream_bitset::bitset::BitSetImpl;

/// Dense node ids are any unsigned integer from `0` to `Node::MAX - 1`
pub type Node = u32;

/// Node-Value that is considered invalid
pub const INVALID_NODE: Node = Node::MAX;

/// There can be at most `2^32 - 1` nodes in a graph!
pub type NumNodes = Node;

/// BitSet for dense Nodes
pub type NodeBitSet = BitSetImpl<Node>;

/// Opaque node identifier of a labelled graph.
///
/// Blanket-implemented for every type that is `Copy + Eq + Hash + Ord + Debug + Send + Sync`.
/// The ordering is only used to normalize edges and to make dense id assignment deterministic.
pub trait NodeLabel: Copy + Eq + Hash + Ord + Debug + Send + Sync {}

impl<T> NodeLabel for T where T: Copy + Eq + Hash + Ord + Debug + Send + Sync {}
