/*!
`ndtree` computes and maintains **nested dissection trees** of sparse undirected graphs such as
road networks.

A nested dissection tree recursively splits a graph by small balanced vertex separators until the
remaining pieces are cliques or trees. Its post-order is an elimination order, the basis for
contraction-hierarchy style route planning and fill-reducing sparse matrix orderings.

# Representation

Graphs are **labelled**: nodes can be any small copyable and ordered value (see [`node::NodeLabel`]),
for instance OSM ids (`u64`). Edges are simple tuple-structs `Edge(u, v)` that compare as unordered
pairs, hence `Edge(u, v) == Edge(v, u)`.
Inside the flow computations nodes are mapped onto dense ids `0..n` stored as `u32`.

# Design

All algorithms are provided as configurable structs that one can alter using either the
*Builder* / *Setter* pattern before running them on a provided graph.
Commonly used functionality is also implemented via traits on the graph itself.

# Usage

There are *4* core submodules you probably want to interact with:
- [`prelude`] includes definitions for nodes, edges, basic graph operations, the graph representations and the error type,
- [`algo`] includes traversals, connected components, shape predicates, the unit-capacity flow engine, FlowCutter and graph separators,
- [`tree`] includes the [`NestedDissectionTree`](tree::NestedDissectionTree) with incremental edge insertion and a plain nested dissection order,
- [`gens`] includes generators for paths, cycles, cliques, random graphs and grids.

```rust
use ndtree::{prelude::*, gens::*, tree::*};

let mut graph = Graph::new();
graph.connect_cycle([1u32, 2, 3, 4, 5, 6]);
graph.connect_path([1u32, 4]);

let tree = NestedDissectionTree::build(&graph, DissectionConfig::default().seed(7)).unwrap();
assert_eq!(tree.elimination_order().len(), 6);
```

In most use-cases, `use ndtree::{prelude::*, tree::*};` suffices for your needs.
*/

pub mod algo;
pub mod edge;
pub mod error;
pub mod gens;
pub mod node;
pub mod ops;
pub mod repr;
#[cfg(test)]
pub(crate) mod testing;
pub mod tree;
pub mod utils;

/// `ndtree::prelude` includes definitions for nodes and edges, all basic graph operation traits,
/// all implemented representations and the error type.
pub mod prelude {
    pub use super::{
        edge::*,
        error::{DissectionError, ErrorKind, Result},
        node::*,
        ops::*,
        repr::*,
    };
}
