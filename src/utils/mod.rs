/*!
# Utilities

Provides
- abstractions over [`Set`] so that traversals work on labelled and dense graphs alike,
- [`FromCapacity`] for constructing such sets,
- the [`NodeMapper`] that translates between node labels and dense ids.

Apart from `Set` and `NodeMapper`, you probably do not need to interact with this module directly.
*/

use fxhash::{FxBuildHasher, FxHashSet};

use crate::node::*;

pub mod node_mapper;
pub mod set;

pub use node_mapper::{NodeMapGetter, NodeMapper};
pub use set::Set;

/// Helper trait for datastructures that can be initialized with capacity.
///
/// `total` is the largest value the structure must be able to hold (relevant for dense
/// structures) while `used` is the number of elements expected to be stored.
pub trait FromCapacity: Sized {
    /// Creates a new instance from the total capacity and the capacity actually used
    fn from_total_used_capacity(total: usize, used: usize) -> Self;
}

impl FromCapacity for NodeBitSet {
    fn from_total_used_capacity(total: usize, _used: usize) -> Self {
        // A bitset must cover the maximum element
        Self::new(total as Node)
    }
}

impl<T> FromCapacity for FxHashSet<T> {
    fn from_total_used_capacity(_total: usize, used: usize) -> Self {
        Self::with_capacity_and_hasher(used, FxBuildHasher::default())
    }
}
