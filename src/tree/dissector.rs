use std::collections::VecDeque;

use super::*;

/// Plain (non-incremental) nested dissection of `graph`.
///
/// Pieces are processed in breadth-first order: cliques and trees are kept as a whole, every
/// other piece is split by a [`GraphSeparator`]. Each dissection is prepended to the result,
/// so the root separator comes last and the list is an elimination order.
/// Labels within a dissection are sorted; empty separators of disconnected pieces are skipped.
///
/// For a fixed seed the separators coincide with those of
/// [`NestedDissectionTree::build`] using the same configuration.
pub fn nested_dissection<G>(graph: &G, config: &DissectionConfig) -> Result<Vec<Vec<G::Label>>>
where
    G: AdjacencyList,
{
    config.validate()?;
    let mut rng = config.rng();

    let mut dissections = VecDeque::new();
    let mut queue: VecDeque<Graph<G::Label>> =
        VecDeque::from([graph.vertex_induced_as(graph.vertices())]);

    while let Some(graph) = queue.pop_front() {
        if graph.is_clique_or_tree() {
            if !graph.is_empty() {
                dissections.push_front(graph.ordered_vertices());
            }
            continue;
        }

        let separator = GraphSeparator::new(&graph)
            .epsilon(config.epsilon)
            .runs(config.runs)
            .seed(rng.random())
            .compute()?;
        if !separator.separator_nodes().is_empty() {
            dissections.push_front(
                separator
                    .separator_nodes()
                    .iter()
                    .copied()
                    .sorted_unstable()
                    .collect(),
            );
        }

        let (left, right) = separator.separate(&graph);
        queue.extend(left);
        queue.extend(right);
    }

    Ok(dissections.into())
}
