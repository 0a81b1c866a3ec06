//! Single-shot pipeline analysis.
//!
//! [`analyze`] builds a fresh [`GraphModel`], runs the acyclicity check,
//! topological sort, and statistics pass over it, and merges the results into
//! one [`AnalysisResult`]. Nothing is cached or shared between calls, so
//! identical input always yields identical output and independent calls can
//! run on any number of threads.
use serde::{Deserialize, Serialize};

use crate::graph::{
    GraphModel, NodeOrder, RejectedEdge, find_all_cycles, is_acyclic, topological_sort,
};
use crate::pipeline::{Pipeline, PipelineEdge, PipelineNode};
use crate::stats::{self, GraphStatistics};

/// Number of ids shown in the order and cycle previews of the summary message.
pub const DEFAULT_PREVIEW_LEN: usize = 5;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Options for [`analyze_with_config`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Node order used for queue seeding, cycle search, and node lists.
    pub node_order: NodeOrder,
    /// Run the exhaustive cycle search on cyclic graphs and report
    /// [`AnalysisResult::cycles_found`].
    pub collect_all_cycles: bool,
    /// Ids shown in the previews of [`AnalysisResult::message`].
    pub preview_len: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            node_order: NodeOrder::Input,
            collect_all_cycles: true,
            preview_len: DEFAULT_PREVIEW_LEN,
        }
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Everything known about one pipeline graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// Distinct nodes in the graph.
    pub node_count: usize,
    /// Edges accepted into the graph.
    pub edge_count: usize,
    /// `true` if the graph is a directed acyclic graph.
    pub is_dag: bool,
    /// One closed cycle (first id repeated last) when the graph is cyclic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_path: Option<Vec<String>>,
    /// Full topological order; present iff `is_dag`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topological_order: Option<Vec<String>>,
    /// Number of back edges met by the exhaustive cycle search.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycles_found: Option<usize>,
    /// Degree and shape statistics.
    pub statistics: GraphStatistics,
    /// Edges left out because an endpoint is not a known node.
    pub rejected_edges: Vec<RejectedEdge>,
    /// Multi-line human-readable summary.
    pub message: String,
}

impl AnalysisResult {
    /// Ids of the rejected edges, in input order.
    pub fn rejected_edge_ids(&self) -> Vec<&str> {
        self.rejected_edges.iter().map(|r| r.edge_id.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Analyzes a node/edge set with the default [`AnalysisConfig`].
///
/// Callers are expected to pass unique node and edge ids. Duplicate node ids
/// keep their first occurrence; duplicate edge ids are analyzed as separate
/// edges.
pub fn analyze(nodes: &[PipelineNode], edges: &[PipelineEdge]) -> AnalysisResult {
    analyze_with_config(nodes, edges, &AnalysisConfig::default())
}

/// Analyzes a parsed [`Pipeline`] with the default [`AnalysisConfig`].
pub fn analyze_pipeline(pipeline: &Pipeline) -> AnalysisResult {
    analyze(&pipeline.nodes, &pipeline.edges)
}

/// Analyzes a node/edge set.
pub fn analyze_with_config(
    nodes: &[PipelineNode],
    edges: &[PipelineEdge],
    config: &AnalysisConfig,
) -> AnalysisResult {
    tracing::debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        order = ?config.node_order,
        "starting pipeline analysis"
    );

    let model = GraphModel::build_with_order(nodes, edges, config.node_order);
    let check = is_acyclic(&model);
    let topological_order = topological_sort(&model);
    let statistics = stats::collect(&model);

    let cycles_found = if !check.is_acyclic && config.collect_all_cycles {
        Some(find_all_cycles(&model).len())
    } else {
        None
    };

    let mut result = AnalysisResult {
        node_count: model.node_count(),
        edge_count: model.edge_count(),
        is_dag: check.is_acyclic,
        cycle_path: check.cycle_path,
        topological_order,
        cycles_found,
        statistics,
        rejected_edges: model.rejected_edges().to_vec(),
        message: String::new(),
    };
    result.message = summary_message(&result, config.preview_len);

    tracing::info!(
        nodes = result.node_count,
        edges = result.edge_count,
        is_dag = result.is_dag,
        rejected = result.rejected_edges.len(),
        "analysis complete"
    );
    result
}

// ---------------------------------------------------------------------------
// Summary message
// ---------------------------------------------------------------------------

/// Renders the multi-line summary stored in [`AnalysisResult::message`].
///
/// Id previews show at most `preview_len` ids joined by `" → "`, followed by
/// `"..."` when truncated.
pub fn summary_message(result: &AnalysisResult, preview_len: usize) -> String {
    let mut lines = vec![format!(
        "Pipeline contains {} {} and {} {}.",
        result.node_count,
        pluralize(result.node_count, "node", "nodes"),
        result.edge_count,
        pluralize(result.edge_count, "edge", "edges"),
    )];

    if result.is_dag {
        lines.push("Pipeline forms a valid directed acyclic graph (DAG).".to_owned());
        if let Some(order) = result.topological_order.as_deref().filter(|o| !o.is_empty()) {
            lines.push(format!("Execution order: {}", preview(order, preview_len)));
        }
    } else {
        lines.push("Pipeline contains cycles and is not a valid DAG.".to_owned());
        if let Some(cycle) = &result.cycle_path {
            lines.push(format!("Detected cycle: {}", preview(cycle, preview_len)));
        }
    }

    let stats = &result.statistics;
    if !stats.node_types.is_empty() {
        let types: Vec<String> = stats
            .node_types
            .iter()
            .map(|(t, n)| format!("{n} {t}"))
            .collect();
        lines.push(format!("Node types: {}", types.join(", ")));
    }

    if result.node_count > 0 {
        if !stats.isolated_nodes.is_empty() {
            lines.push(format!(
                "Warning: {} isolated node(s) detected.",
                stats.isolated_nodes.len()
            ));
        }
        if stats.source_nodes.is_empty() {
            lines.push("Warning: no source nodes detected.".to_owned());
        }
        if stats.sink_nodes.is_empty() {
            lines.push("Warning: no sink nodes detected.".to_owned());
        }
    }
    if !result.rejected_edges.is_empty() {
        lines.push(format!(
            "Warning: {} edge(s) rejected for referencing unknown nodes: {}",
            result.rejected_edges.len(),
            result.rejected_edge_ids().join(", ")
        ));
    }

    lines.join("\n")
}

fn preview(ids: &[String], len: usize) -> String {
    let shown = &ids[..ids.len().min(len)];
    let mut out = shown.join(" → ");
    if ids.len() > len {
        out.push_str("...");
    }
    out
}

fn pluralize<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
