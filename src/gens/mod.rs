/*!
# Graph Generators

Deterministic and random generators for labelled graphs. They are mostly used to build test
instances that look like small road networks (grids with missing streets) or contain
well-known substructures (paths, cycles, cliques).

Generators follow the builder pattern:
```rust
use ndtree::{prelude::*, gens::*};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

let rng = &mut Pcg64Mcg::seed_from_u64(1);
let graph: Graph<u32> = Grid::new().rows(4).cols(5).generate(rng);
assert_eq!(graph.number_of_nodes(), 20);
assert_eq!(graph.number_of_edges(), 31);
```
*/

use rand::Rng;

use crate::prelude::*;

mod grid;
mod substructures;

pub use grid::*;
pub use substructures::*;

/// Trait for building random graphs from common models
pub trait RandomGraph: Sized {
    /// Creates a random graph on nodes `0..n` with (at most) `m` distinct edges chosen
    /// uniformly; self loops and duplicates are rejected and redrawn.
    /// ** Panics if `m > n(n-1)/2` **
    fn gnm<R>(rng: &mut R, n: NumNodes, m: NumEdges) -> Self
    where
        R: Rng;
}

impl<G> RandomGraph for G
where
    G: GraphEdgeEditing<Label = Node> + GraphEdgeOrder,
{
    fn gnm<R>(rng: &mut R, n: NumNodes, m: NumEdges) -> Self
    where
        R: Rng,
    {
        assert!(m as u64 <= (n as u64) * (n as u64).saturating_sub(1) / 2);

        let mut graph = Self::new();
        graph.add_nodes(0..n);
        while graph.number_of_edges() < m {
            let u = rng.random_range(0..n);
            let v = rng.random_range(0..n);
            graph.try_add_edge(u, v);
        }
        graph
    }
}
