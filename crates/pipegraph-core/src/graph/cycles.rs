//! Cycle detection over a [`GraphModel`].
//!
//! # Algorithm Overview
//!
//! Acyclicity is decided with Kahn's algorithm: copy the in-degree table,
//! seed a FIFO queue with every zero-in-degree node in model order, then
//! repeatedly pop a node and decrement the in-degrees of its successors,
//! enqueueing any that reach zero. The graph is acyclic iff every node is
//! popped.
//!
//! When the elimination stalls, a depth-first search with three colours
//! (unvisited, on the current path, finished) locates a concrete cycle: an
//! edge into an on-path node closes the loop formed by the path suffix that
//! starts at that node. The search runs on an explicit stack so long chains
//! cannot exhaust the call stack.
//!
//! Cycle paths are closed: the first node is repeated at the end, so a
//! self-loop on `A` is `["A", "A"]`.
use std::collections::VecDeque;
use std::ops::ControlFlow;

use petgraph::graph::NodeIndex;

use crate::graph::GraphModel;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Outcome of [`is_acyclic`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleCheck {
    /// `true` if the graph has no directed cycle.
    pub is_acyclic: bool,
    /// The first cycle found by the depth-first search, when one exists.
    pub cycle_path: Option<Vec<String>>,
    /// Nodes Kahn's elimination could not remove, in model order. These are
    /// the nodes on a cycle plus everything downstream of one.
    pub blocked_nodes: Vec<String>,
}

/// Decides whether `model` is acyclic and, if not, reports one cycle.
///
/// An empty graph is acyclic.
pub fn is_acyclic(model: &GraphModel) -> CycleCheck {
    let elim = eliminate(model);

    if elim.order.len() == model.node_count() {
        tracing::debug!(nodes = model.node_count(), "elimination consumed every node");
        return CycleCheck {
            is_acyclic: true,
            cycle_path: None,
            blocked_nodes: Vec::new(),
        };
    }

    let blocked_nodes: Vec<String> = model
        .node_indices()
        .filter(|i| elim.remaining_in_degree[i.index()] > 0)
        .map(|i| model.node_id(i).to_owned())
        .collect();
    tracing::warn!(
        processed = elim.order.len(),
        total = model.node_count(),
        blocked = ?blocked_nodes,
        "graph contains a cycle"
    );

    CycleCheck {
        is_acyclic: false,
        cycle_path: find_cycle(model),
        blocked_nodes,
    }
}

/// Returns the first cycle met by a depth-first search in model order, or
/// `None` if the graph is acyclic.
pub fn find_cycle(model: &GraphModel) -> Option<Vec<String>> {
    let mut found = None;
    walk_back_edges(model, |cycle| {
        found = Some(cycle);
        ControlFlow::Break(())
    });
    found.map(|cycle| to_ids(model, &cycle))
}

/// Returns one cycle per back edge met by a full depth-first search.
///
/// Traversal continues past each back edge, so cycles that share nodes may
/// all be reported and the same loop can appear more than once through
/// different back edges. No deduplication is done. The count is a
/// diagnostic, not the number of elementary cycles.
pub fn find_all_cycles(model: &GraphModel) -> Vec<Vec<String>> {
    let mut cycles = Vec::new();
    walk_back_edges(model, |cycle| {
        cycles.push(cycle);
        ControlFlow::Continue(())
    });
    tracing::debug!(found = cycles.len(), "cycle search complete");
    cycles.iter().map(|c| to_ids(model, c)).collect()
}

// ---------------------------------------------------------------------------
// Internal: Kahn's elimination
// ---------------------------------------------------------------------------

/// Result of running Kahn's elimination to completion.
pub(crate) struct Elimination {
    /// Nodes in the order they left the queue.
    pub order: Vec<NodeIndex>,
    /// Working in-degrees after the queue drained, indexed by node index.
    pub remaining_in_degree: Vec<usize>,
}

/// Runs Kahn's elimination over the whole model.
///
/// The queue is seeded in model order and successors are released in edge
/// input order, which makes the emission order fully deterministic.
pub(crate) fn eliminate(model: &GraphModel) -> Elimination {
    let mut in_degree = model.in_degrees().to_vec();

    let mut queue: VecDeque<NodeIndex> = model
        .node_indices()
        .filter(|i| in_degree[i.index()] == 0)
        .collect();
    tracing::debug!(seeds = queue.len(), "elimination queue seeded");

    let mut order = Vec::with_capacity(model.node_count());

    while let Some(node) = queue.pop_front() {
        order.push(node);

        for &succ in model.successors(node) {
            let deg = &mut in_degree[succ.index()];
            *deg -= 1;
            if *deg == 0 {
                queue.push_back(succ);
            }
        }
    }

    Elimination {
        order,
        remaining_in_degree: in_degree,
    }
}

// ---------------------------------------------------------------------------
// Internal: depth-first back-edge search
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Iterative DFS over every node in model order, calling `on_cycle` with the
/// closed cycle for each back edge. Stops early when `on_cycle` breaks.
///
/// Each stack frame is `(node, index of the next successor to try)`. The
/// frames on the stack are exactly the gray nodes, in path order.
fn walk_back_edges<F>(model: &GraphModel, mut on_cycle: F)
where
    F: FnMut(Vec<NodeIndex>) -> ControlFlow<()>,
{
    let mut color = vec![Color::White; model.node_count()];
    let mut stack: Vec<(NodeIndex, usize)> = Vec::new();

    for root in model.node_indices() {
        if color[root.index()] != Color::White {
            continue;
        }
        color[root.index()] = Color::Gray;
        stack.push((root, 0));

        while let Some(&(node, next)) = stack.last() {
            let Some(&child) = model.successors(node).get(next) else {
                // All successors explored: backtrack.
                stack.pop();
                color[node.index()] = Color::Black;
                continue;
            };
            let top = stack.len() - 1;
            stack[top].1 += 1;

            match color[child.index()] {
                Color::Gray => {
                    if let Some(start) = stack.iter().position(|&(n, _)| n == child) {
                        let mut cycle: Vec<NodeIndex> =
                            stack[start..].iter().map(|&(n, _)| n).collect();
                        cycle.push(child);
                        if on_cycle(cycle).is_break() {
                            return;
                        }
                    }
                }
                Color::Black => {}
                Color::White => {
                    color[child.index()] = Color::Gray;
                    stack.push((child, 0));
                }
            }
        }
    }
}

fn to_ids(model: &GraphModel, cycle: &[NodeIndex]) -> Vec<String> {
    cycle.iter().map(|&i| model.node_id(i).to_owned()).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
