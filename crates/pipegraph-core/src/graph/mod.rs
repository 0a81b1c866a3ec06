//! Graph construction from pipeline nodes and edges using `petgraph`.
//!
//! [`GraphModel`] wraps a `DiGraph` with small node and edge weights and keeps
//! the adjacency and degree tables that the cycle, ordering, and statistics
//! passes read.
//!
//! # Two-Pass Construction
//!
//! [`GraphModel::build`] runs two passes:
//! 1. **Node pass**: inserts every distinct node id in model order and records
//!    the `id → NodeIndex` mapping. A repeated id keeps its first occurrence;
//!    the repeat is recorded in [`GraphModel::duplicate_node_ids`].
//! 2. **Edge pass**: resolves `source`/`target` in input order. An edge with an
//!    unknown endpoint is recorded as a [`RejectedEdge`] and left out of the
//!    graph; every other edge is appended to its source's successor list and
//!    bumps both degree counters.
//!
//! Successor lists are kept in edge input order in a separate table because
//! petgraph walks a node's edges newest-first.
//!
//! # Algorithms
//!
//! - [`cycles`]: Kahn's acyclicity check, first-cycle and all-cycles search.
//! - [`topo`]: topological ordering.
pub mod cycles;
pub mod topo;

pub use cycles::{find_all_cycles, find_cycle, is_acyclic};
pub use topo::topological_sort;

use std::collections::HashMap;
use std::fmt;

use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::pipeline::{PipelineEdge, PipelineNode};

// ---------------------------------------------------------------------------
// Weight types
// ---------------------------------------------------------------------------

/// Weight stored on each petgraph node.
///
/// `data_index` points back into the caller's node slice for the full record.
#[derive(Debug, Clone)]
pub struct NodeWeight {
    /// Node id copied from the pipeline node.
    pub id: String,
    /// Node type copied from the pipeline node.
    pub node_type: String,
    /// Index of the originating record in the input node slice.
    pub data_index: usize,
}

/// Weight stored on each accepted petgraph edge.
#[derive(Debug, Clone)]
pub struct EdgeWeight {
    /// Edge id copied from the pipeline edge.
    pub id: String,
    /// Index of the originating record in the input edge slice.
    pub data_index: usize,
}

// ---------------------------------------------------------------------------
// Node ordering policy
// ---------------------------------------------------------------------------

/// The order in which nodes are stored, seeded into the elimination queue,
/// visited by the cycle search, and listed in statistics.
///
/// This is the single tie-break for nodes that become ready at the same time
/// during topological sorting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeOrder {
    /// The caller's node list order.
    #[default]
    Input,
    /// Ascending byte-wise order of node ids. Ties between duplicate ids keep
    /// input order.
    Lexicographic,
}

// ---------------------------------------------------------------------------
// Rejected edges
// ---------------------------------------------------------------------------

/// Which end of an edge failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    /// The edge's `source`.
    Source,
    /// The edge's `target`.
    Target,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// An edge left out of the graph because an endpoint is not a known node.
///
/// When both endpoints are unknown only the source is reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedEdge {
    /// Id of the rejected edge.
    pub edge_id: String,
    /// The endpoint that could not be resolved.
    pub endpoint: Endpoint,
    /// The node id that was not found.
    pub missing_node_id: String,
}

impl fmt::Display for RejectedEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "edge {:?} references unknown {} node {:?}",
            self.edge_id, self.endpoint, self.missing_node_id
        )
    }
}

// ---------------------------------------------------------------------------
// GraphModel
// ---------------------------------------------------------------------------

/// An immutable adjacency-list view of one pipeline.
///
/// Node indices run `0..node_count()` in model order (see [`NodeOrder`]), so
/// `NodeIndex::index()` addresses the degree and successor tables directly.
///
/// Construct with [`GraphModel::build`] or [`GraphModel::build_with_order`].
#[derive(Debug)]
pub struct GraphModel {
    graph: DiGraph<NodeWeight, EdgeWeight>,
    id_to_index: HashMap<String, NodeIndex>,
    successors: Vec<Vec<NodeIndex>>,
    in_degree: Vec<usize>,
    out_degree: Vec<usize>,
    rejected: Vec<RejectedEdge>,
    duplicate_node_ids: Vec<String>,
}

impl GraphModel {
    /// Builds a model with nodes in caller order.
    pub fn build(nodes: &[PipelineNode], edges: &[PipelineEdge]) -> Self {
        Self::build_with_order(nodes, edges, NodeOrder::Input)
    }

    /// Builds a model with nodes stored in `order`.
    ///
    /// Construction is O(N log N + E) for [`NodeOrder::Lexicographic`] and
    /// O(N + E) otherwise.
    pub fn build_with_order(
        nodes: &[PipelineNode],
        edges: &[PipelineEdge],
        order: NodeOrder,
    ) -> Self {
        let mut ordered: Vec<(usize, &PipelineNode)> = nodes.iter().enumerate().collect();
        match order {
            NodeOrder::Input => {}
            NodeOrder::Lexicographic => ordered.sort_by(|a, b| a.1.id.cmp(&b.1.id)),
        }

        let mut graph: DiGraph<NodeWeight, EdgeWeight> =
            DiGraph::with_capacity(nodes.len(), edges.len());
        let mut id_to_index: HashMap<String, NodeIndex> = HashMap::with_capacity(nodes.len());
        let mut duplicate_node_ids = Vec::new();

        // Pass 1: nodes.
        for (data_index, node) in ordered {
            if id_to_index.contains_key(&node.id) {
                tracing::warn!(node_id = %node.id, "duplicate node id ignored");
                duplicate_node_ids.push(node.id.clone());
                continue;
            }
            let idx = graph.add_node(NodeWeight {
                id: node.id.clone(),
                node_type: node.node_type.clone(),
                data_index,
            });
            id_to_index.insert(node.id.clone(), idx);
        }

        let n = graph.node_count();
        let mut successors: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];
        let mut in_degree = vec![0usize; n];
        let mut out_degree = vec![0usize; n];
        let mut rejected = Vec::new();

        // Pass 2: edges.
        for (data_index, edge) in edges.iter().enumerate() {
            let Some(&source) = id_to_index.get(&edge.source) else {
                rejected.push(RejectedEdge {
                    edge_id: edge.id.clone(),
                    endpoint: Endpoint::Source,
                    missing_node_id: edge.source.clone(),
                });
                continue;
            };
            let Some(&target) = id_to_index.get(&edge.target) else {
                rejected.push(RejectedEdge {
                    edge_id: edge.id.clone(),
                    endpoint: Endpoint::Target,
                    missing_node_id: edge.target.clone(),
                });
                continue;
            };

            successors[source.index()].push(target);
            out_degree[source.index()] += 1;
            in_degree[target.index()] += 1;
            graph.add_edge(
                source,
                target,
                EdgeWeight {
                    id: edge.id.clone(),
                    data_index,
                },
            );
        }

        for r in &rejected {
            tracing::warn!(edge_id = %r.edge_id, "{r}; edge dropped");
        }
        tracing::debug!(
            nodes = n,
            edges = graph.edge_count(),
            rejected = rejected.len(),
            "graph model built"
        );

        Self {
            graph,
            id_to_index,
            successors,
            in_degree,
            out_degree,
            rejected,
            duplicate_node_ids,
        }
    }

    /// Returns the number of distinct nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of accepted edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns `true` if the model has no nodes.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Iterates node indices in model order.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Looks up the index of a node id.
    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.id_to_index.get(id).copied()
    }

    /// Returns the weight of a node. `idx` must come from this model.
    pub fn node_weight(&self, idx: NodeIndex) -> &NodeWeight {
        &self.graph[idx]
    }

    /// Returns the id of a node.
    pub fn node_id(&self, idx: NodeIndex) -> &str {
        &self.graph[idx].id
    }

    /// Returns the direct successors of `idx` in edge input order.
    ///
    /// A successor appears once per parallel edge.
    pub fn successors(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.successors[idx.index()]
    }

    /// Returns the successor ids of node `id`, or `None` if it is unknown.
    pub fn successor_ids(&self, id: &str) -> Option<Vec<&str>> {
        let idx = self.node_index(id)?;
        Some(self.successors(idx).iter().map(|&s| self.node_id(s)).collect())
    }

    /// Number of accepted edges entering `idx`.
    pub fn in_degree(&self, idx: NodeIndex) -> usize {
        self.in_degree[idx.index()]
    }

    /// Number of accepted edges leaving `idx`.
    pub fn out_degree(&self, idx: NodeIndex) -> usize {
        self.out_degree[idx.index()]
    }

    /// The full in-degree table, indexed by `NodeIndex::index()`.
    pub fn in_degrees(&self) -> &[usize] {
        &self.in_degree
    }

    /// Iterates accepted edges in input order as `(source, target, weight)`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, &EdgeWeight)> + '_ {
        self.graph
            .raw_edges()
            .iter()
            .map(|e| (e.source(), e.target(), &e.weight))
    }

    /// Edges left out of the graph, in input order.
    pub fn rejected_edges(&self) -> &[RejectedEdge] {
        &self.rejected
    }

    /// Node ids that appeared more than once, in the order the repeats were met.
    pub fn duplicate_node_ids(&self) -> &[String] {
        &self.duplicate_node_ids
    }

    /// Returns the underlying `petgraph` graph.
    pub fn graph(&self) -> &DiGraph<NodeWeight, EdgeWeight> {
        &self.graph
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
