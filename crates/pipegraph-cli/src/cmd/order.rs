//! Implementation of `pipegraph order <file>`.
//!
//! Prints the execution order, one node id per line in human mode or as a
//! JSON array in JSON mode. Edges with unknown endpoints are ignored.
//!
//! Exit codes: 0 = ordered, 1 = the pipeline contains a cycle, 2 = input failure.
use pipegraph_core::{GraphModel, NodeOrder, find_cycle, topological_sort};

use crate::error::CliError;
use crate::format::{FormatMode, write_json};

/// Runs the `order` command.
///
/// # Errors
///
/// - [`CliError::ParseFailed`]: content is not a pipeline document.
/// - [`CliError::CyclicPipeline`]: no order exists.
pub fn run(content: &str, order: NodeOrder, mode: FormatMode) -> Result<(), CliError> {
    let pipeline = super::parse_pipeline(content)?;
    let model = GraphModel::build_with_order(&pipeline.nodes, &pipeline.edges, order);

    let Some(ids) = topological_sort(&model) else {
        return Err(CliError::CyclicPipeline {
            cycle: find_cycle(&model),
        });
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match mode {
        FormatMode::Human => write_lines(&mut out, &ids),
        FormatMode::Json => write_json(&mut out, &ids),
    }
    .map_err(|e| CliError::write_failed("stdout", &e))
}

fn write_lines<W: std::io::Write>(w: &mut W, ids: &[String]) -> std::io::Result<()> {
    for id in ids {
        writeln!(w, "{id}")?;
    }
    Ok(())
}
