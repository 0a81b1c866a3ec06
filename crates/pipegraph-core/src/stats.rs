//! Structural statistics for a [`GraphModel`].
//!
//! All degree figures count accepted edges only; rejected edges never reach
//! the model. Node lists follow model order.
use std::collections::BTreeMap;

use serde::Serialize;

use crate::graph::GraphModel;

/// Degree and shape summary of one pipeline graph.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GraphStatistics {
    /// Node count per node type.
    pub node_types: BTreeMap<String, usize>,
    /// Nodes with no incoming and no outgoing edges.
    pub isolated_nodes: Vec<String>,
    /// Nodes with no incoming edges and at least one outgoing edge.
    pub source_nodes: Vec<String>,
    /// Nodes with no outgoing edges and at least one incoming edge.
    pub sink_nodes: Vec<String>,
    /// Largest in-degree, or 0 for an empty graph.
    pub max_in_degree: usize,
    /// Largest out-degree, or 0 for an empty graph.
    pub max_out_degree: usize,
    /// `edges / max(nodes - 1, 1)`, or 0 when there is at most one node.
    ///
    /// This is a descriptive ratio kept for compatibility with existing
    /// consumers, not graph density.
    pub connectivity: f64,
}

/// Computes [`GraphStatistics`] for `model`.
pub fn collect(model: &GraphModel) -> GraphStatistics {
    let mut stats = GraphStatistics::default();

    for idx in model.node_indices() {
        let weight = model.node_weight(idx);
        *stats.node_types.entry(weight.node_type.clone()).or_insert(0) += 1;

        let din = model.in_degree(idx);
        let dout = model.out_degree(idx);
        stats.max_in_degree = stats.max_in_degree.max(din);
        stats.max_out_degree = stats.max_out_degree.max(dout);

        match (din, dout) {
            (0, 0) => stats.isolated_nodes.push(weight.id.clone()),
            (0, _) => stats.source_nodes.push(weight.id.clone()),
            (_, 0) => stats.sink_nodes.push(weight.id.clone()),
            _ => {}
        }
    }

    stats.connectivity = connectivity(model.node_count(), model.edge_count());
    stats
}

/// `edges / max(nodes - 1, 1)` for more than one node, otherwise 0.
#[allow(clippy::cast_precision_loss)]
pub fn connectivity(node_count: usize, edge_count: usize) -> f64 {
    if node_count <= 1 {
        return 0.0;
    }
    edge_count as f64 / (node_count - 1).max(1) as f64
}
