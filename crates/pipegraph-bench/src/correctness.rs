//! Post-analysis invariant checkers for correctness validation.

use std::collections::{HashMap, HashSet};

use pipegraph_core::{AnalysisResult, GraphModel};

/// Verifies graph construction invariants: every distinct node id is indexed
/// and every pipeline edge is either accepted or rejected.
pub fn check_model_invariants(
    model: &GraphModel,
    distinct_nodes: usize,
    total_edges: usize,
) -> Result<(), String> {
    if model.node_count() != distinct_nodes {
        return Err(format!(
            "node count mismatch: model={}, distinct ids={distinct_nodes}",
            model.node_count()
        ));
    }
    let accounted = model.edge_count() + model.rejected_edges().len();
    if accounted != total_edges {
        return Err(format!(
            "edge accounting mismatch: accepted={} + rejected={} != {total_edges}",
            model.edge_count(),
            model.rejected_edges().len()
        ));
    }
    Ok(())
}

/// Verifies a topological order:
/// - lists every node exactly once
/// - places the source of every accepted edge before its target
pub fn check_order_respects_edges(model: &GraphModel, order: &[String]) -> Result<(), String> {
    if order.len() != model.node_count() {
        return Err(format!(
            "order has {} entries for {} nodes",
            order.len(),
            model.node_count()
        ));
    }

    let mut position: HashMap<&str, usize> = HashMap::with_capacity(order.len());
    for (i, id) in order.iter().enumerate() {
        if position.insert(id.as_str(), i).is_some() {
            return Err(format!("node {id} appears twice in order"));
        }
    }

    for (src, tgt, weight) in model.edges() {
        let (src_id, tgt_id) = (model.node_id(src), model.node_id(tgt));
        let (Some(&s), Some(&t)) = (position.get(src_id), position.get(tgt_id)) else {
            return Err(format!("edge {} has an endpoint missing from order", weight.id));
        };
        if s >= t {
            return Err(format!(
                "edge {} runs backwards: {src_id}@{s} -> {tgt_id}@{t}",
                weight.id
            ));
        }
    }
    Ok(())
}

/// Verifies a reported cycle:
/// - has at least two entries and ends where it starts
/// - each consecutive pair is connected by an accepted edge
pub fn check_cycle_is_closed_walk(model: &GraphModel, cycle: &[String]) -> Result<(), String> {
    let (Some(first), Some(last)) = (cycle.first(), cycle.last()) else {
        return Err("cycle is empty".to_owned());
    };
    if cycle.len() < 2 {
        return Err(format!("cycle [{first}] is too short"));
    }
    if first != last {
        return Err(format!("cycle starts at {first} but ends at {last}"));
    }
    for pair in cycle.windows(2) {
        let successors = model
            .successor_ids(&pair[0])
            .ok_or_else(|| format!("cycle node {} not in graph", pair[0]))?;
        if !successors.contains(&pair[1].as_str()) {
            return Err(format!("no edge {} -> {} in graph", pair[0], pair[1]));
        }
    }
    Ok(())
}

/// Verifies that the statistics agree with the counts and with each other:
/// - isolated, source, and sink sets are pairwise disjoint
/// - node type counts sum to the node count
/// - a DAG with at least one edge has a source and a sink
pub fn check_statistics_consistent(result: &AnalysisResult) -> Result<(), String> {
    let s = &result.statistics;

    let typed: usize = s.node_types.values().sum();
    if typed != result.node_count {
        return Err(format!(
            "node type counts sum to {typed}, expected {}",
            result.node_count
        ));
    }

    let isolated: HashSet<&str> = s.isolated_nodes.iter().map(String::as_str).collect();
    let sources: HashSet<&str> = s.source_nodes.iter().map(String::as_str).collect();
    let sinks: HashSet<&str> = s.sink_nodes.iter().map(String::as_str).collect();
    if !isolated.is_disjoint(&sources) || !isolated.is_disjoint(&sinks) {
        return Err("isolated nodes overlap sources or sinks".to_owned());
    }
    if !sources.is_disjoint(&sinks) {
        return Err("a node is both a source and a sink".to_owned());
    }

    if result.is_dag && result.edge_count > 0 && (sources.is_empty() || sinks.is_empty()) {
        return Err("acyclic graph with edges has no source or no sink".to_owned());
    }
    Ok(())
}
