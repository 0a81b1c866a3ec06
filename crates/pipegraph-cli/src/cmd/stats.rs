//! Implementation of `pipegraph stats <file>`.
//!
//! Prints the statistics sub-record of the analysis: node and accepted edge
//! counts, node types, isolated/source/sink nodes, degree maxima, and the
//! connectivity ratio.
//!
//! In `--format json` mode the statistics object is emitted to stdout. In
//! human mode, aligned key/value lines are printed.
//!
//! Exit codes: 0 = success, 2 = input failure.
use pipegraph_core::stats::{self, GraphStatistics};
use pipegraph_core::{GraphModel, NodeOrder};

use crate::error::CliError;
use crate::format::{FormatMode, write_json};

/// Runs the `stats` command.
///
/// # Errors
///
/// Returns [`CliError::ParseFailed`] if the content is not a pipeline
/// document.
pub fn run(content: &str, order: NodeOrder, mode: FormatMode) -> Result<(), CliError> {
    let pipeline = super::parse_pipeline(content)?;
    let model = GraphModel::build_with_order(&pipeline.nodes, &pipeline.edges, order);
    let statistics = stats::collect(&model);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match mode {
        FormatMode::Human => print_human(&mut out, &model, &statistics),
        FormatMode::Json => write_json(&mut out, &statistics),
    }
    .map_err(|e| CliError::write_failed("stdout", &e))
}

/// Writes statistics in human-readable aligned format.
fn print_human<W: std::io::Write>(
    w: &mut W,
    model: &GraphModel,
    s: &GraphStatistics,
) -> std::io::Result<()> {
    writeln!(w, "nodes:           {}", model.node_count())?;
    for (node_type, count) in &s.node_types {
        writeln!(w, "  {node_type}: {count}")?;
    }
    writeln!(w, "edges:           {}", model.edge_count())?;
    if !model.rejected_edges().is_empty() {
        writeln!(w, "rejected_edges:  {}", model.rejected_edges().len())?;
    }
    writeln!(w, "sources:         {}", id_list(&s.source_nodes))?;
    writeln!(w, "sinks:           {}", id_list(&s.sink_nodes))?;
    writeln!(w, "isolated:        {}", id_list(&s.isolated_nodes))?;
    writeln!(w, "max_in_degree:   {}", s.max_in_degree)?;
    writeln!(w, "max_out_degree:  {}", s.max_out_degree)?;
    writeln!(w, "connectivity:    {:.2}", s.connectivity)?;
    Ok(())
}

fn id_list(ids: &[String]) -> String {
    if ids.is_empty() {
        "(none)".to_owned()
    } else {
        ids.join(", ")
    }
}
