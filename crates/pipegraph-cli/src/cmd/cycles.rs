//! Implementation of `pipegraph cycles <file>`.
//!
//! Lists one cycle per back edge of an exhaustive depth-first search. The same
//! loop may appear more than once through different back edges.
//!
//! Human mode prints one cycle per line (`a → b → a`) to stdout and a count
//! to stderr. JSON mode prints `{"count": N, "cycles": [[...], ...]}`.
//!
//! Exit codes: 0 = success (cycles or not), 2 = input failure.
use std::io::Write as _;

use pipegraph_core::{GraphModel, NodeOrder, find_all_cycles};

use crate::error::CliError;
use crate::format::{FormatMode, FormatterConfig, write_json};

/// Runs the `cycles` command.
///
/// # Errors
///
/// Returns [`CliError::ParseFailed`] if the content is not a pipeline
/// document.
pub fn run(
    content: &str,
    order: NodeOrder,
    mode: FormatMode,
    fmt_config: &FormatterConfig,
) -> Result<(), CliError> {
    let pipeline = super::parse_pipeline(content)?;
    let model = GraphModel::build_with_order(&pipeline.nodes, &pipeline.edges, order);
    let cycles = find_all_cycles(&model);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match mode {
        FormatMode::Human => {
            for cycle in &cycles {
                writeln!(out, "{}", cycle.join(" → "))
                    .map_err(|e| CliError::write_failed("stdout", &e))?;
            }
            if !fmt_config.quiet {
                writeln!(std::io::stderr().lock(), "{} cycle(s) found", cycles.len())
                    .map_err(|e| CliError::write_failed("stderr", &e))?;
            }
            Ok(())
        }
        FormatMode::Json => {
            let doc = serde_json::json!({
                "count": cycles.len(),
                "cycles": cycles,
            });
            write_json(&mut out, &doc).map_err(|e| CliError::write_failed("stdout", &e))
        }
    }
}
