//! Topological ordering via Kahn's elimination.
//!
//! When several nodes are ready at once they leave the queue in the order
//! they entered it: initial seeds in model order, then successors in edge
//! input order. Build the model with [`NodeOrder::Lexicographic`] for an
//! order that does not depend on how the caller listed the nodes.
//!
//! [`NodeOrder::Lexicographic`]: crate::graph::NodeOrder::Lexicographic
use crate::graph::GraphModel;
use crate::graph::cycles::eliminate;

/// Returns every node id in topological order, or `None` if the graph has a
/// cycle.
///
/// An empty graph yields `Some` of an empty vector.
pub fn topological_sort(model: &GraphModel) -> Option<Vec<String>> {
    let elim = eliminate(model);

    if elim.order.len() != model.node_count() {
        tracing::debug!(
            emitted = elim.order.len(),
            total = model.node_count(),
            "no topological order: graph is cyclic"
        );
        return None;
    }

    Some(
        elim.order
            .into_iter()
            .map(|i| model.node_id(i).to_owned())
            .collect(),
    )
}
