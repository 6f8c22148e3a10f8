/*!
# Degree-Two Contraction

Road networks consist mostly of long chains of degree-2 nodes between junctions. Contracting
those chains shrinks the graph a separator has to look at without changing its coarse structure:

- every node of degree at least 3 is kept,
- each maximal chain of degree-2 nodes between two kept nodes becomes a single edge,
- chains ending in a dead end (degree 1) are dropped,
- chains returning to their start as well as parallel chains collapse (no loops, no multi-edges).
*/

use fxhash::FxHashSet;
use itertools::Itertools;

use super::*;

/// Contracts chains of degree-2 nodes. See the [module documentation](self).
pub trait DegreeTwoContraction: AdjacencyList + GraphEdgeEditing {
    /// Returns the contracted graph on all nodes of degree at least 3
    fn contract_degree_two_paths(&self) -> Self;
}

impl<G> DegreeTwoContraction for G
where
    G: AdjacencyList + GraphEdgeEditing,
{
    fn contract_degree_two_paths(&self) -> Self {
        let kept: FxHashSet<_> = self.vertices().filter(|&u| self.degree_of(u) >= 3).collect();

        let mut contracted = Self::new();
        contracted.add_nodes(kept.iter().copied());

        let mut visited = kept.clone();
        for u in kept.iter().copied().sorted_unstable() {
            for v in self.neighbors_of(u) {
                if kept.contains(&v) {
                    contracted.try_add_edge(u, v);
                    continue;
                }
                if !visited.insert(v) {
                    continue;
                }

                let (mut prev, mut current) = (u, v);
                let endpoint = loop {
                    if kept.contains(&current) {
                        break Some(current);
                    }
                    match self.continue_path(prev, current) {
                        Some(next) => {
                            visited.insert(next);
                            prev = current;
                            current = next;
                        }
                        None => break None,
                    }
                };

                if let Some(w) = endpoint {
                    // a chain back to `u` is rejected as a loop
                    contracted.try_add_edge(u, w);
                }
            }
        }

        contracted
    }
}
