use std::collections::VecDeque;

use rand::Rng;
use rand_pcg::Pcg64Mcg;

use super::*;

/// Recursively dissects `graph` into a detached subtree.
///
/// The subtree is returned in breadth-first order: index `0` is its root and all parent and child
/// handles are indices into the returned vector. The root has no parent and is tagged with
/// `side` and `depth` so that it can be attached to the arena at any position.
pub(crate) fn dissect<T: NodeLabel>(
    graph: Graph<T>,
    side: Option<SeparationSide>,
    depth: usize,
    config: &DissectionConfig,
    rng: &mut Pcg64Mcg,
) -> Result<Vec<DissectionNode<T>>> {
    let mut nodes: Vec<DissectionNode<T>> = Vec::new();
    let mut queue = VecDeque::from([(graph, None::<usize>, side, depth)]);

    while let Some((graph, parent, side, depth)) = queue.pop_front() {
        let id = nodes.len();

        let mut node = if graph.is_clique_or_tree() {
            DissectionNode::leaf(&graph, side, depth)
        } else {
            let separator = GraphSeparator::new(&graph)
                .epsilon(config.epsilon)
                .runs(config.runs)
                .seed(rng.random())
                .compute()?;
            let (left, right) = separator.separate(&graph);

            let left_size = left.iter().map(|g| g.len()).sum();
            let right_size = right.iter().map(|g| g.len()).sum();
            let node = DissectionNode::separator(
                &graph, &separator, left_size, right_size, side, depth,
            );

            queue.extend(
                left.into_iter()
                    .map(|g| (g, Some(id), Some(SeparationSide::Left), depth + 1)),
            );
            queue.extend(
                right
                    .into_iter()
                    .map(|g| (g, Some(id), Some(SeparationSide::Right), depth + 1)),
            );
            node
        };

        if let Some(parent) = parent {
            node.parent = Some(TreeNodeId(parent as u32));
            nodes[parent].children.push(TreeNodeId(id as u32));
        }
        nodes.push(node);
    }

    Ok(nodes)
}
