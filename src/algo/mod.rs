/*!
# Graph Algorithms

This module provides the algorithms nested dissection is built from.
All algorithms are re-exported at the top level of this module, so you can simply do:
```rust
use ndtree::algo::*;
```
and gain access to traversals, connected components, shape predicates, the unit-capacity flow
engine, FlowCutter and graph separators.
If possible, algorithms are provided as **iterators** or as traits implemented on the graph itself.
*/

mod connectivity;
mod contraction;
mod flow_cutter;
mod network_flow;
mod separator;
mod shape;
mod subgraph;
mod traversal;

use crate::{prelude::*, utils::*};

pub use connectivity::*;
pub use contraction::*;
pub use flow_cutter::*;
pub use network_flow::*;
pub use separator::*;
pub use shape::*;
pub use subgraph::*;
pub use traversal::*;
