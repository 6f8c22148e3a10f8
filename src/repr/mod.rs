/*!
# Graph Representations

- [`UndirectedGraph`] (alias [`Graph`]): labelled, editable graph backed by hash maps.
  This is the graph type handed to separators and nested dissection trees.
- [`EdgeIndexedGraph`]: immutable dense graph over `0..n` with explicit edge ids.
  It is built once per separator computation and shared read-only by all flow runs.
*/

use crate::{ops::*, prelude::*};

mod edge_indexed;
mod undirected;

pub use edge_indexed::*;
pub use undirected::*;
