/// Command modules for the `pipegraph` CLI.
///
/// Each submodule implements one subcommand. Its `run` function takes the
/// already-read input text plus parsed flags and returns `Ok(())` on success
/// or a [`crate::error::CliError`] on failure.
pub mod analyze;
pub mod check;
pub mod cycles;
pub mod order;
pub mod stats;

use pipegraph_core::Pipeline;

use crate::error::CliError;

/// Decodes `content` as a pipeline document.
///
/// # Errors
///
/// Returns [`CliError::ParseFailed`] (exit code 2) when the text is not a
/// pipeline document.
pub fn parse_pipeline(content: &str) -> Result<Pipeline, CliError> {
    let pipeline = Pipeline::from_json(content)?;
    tracing::debug!(
        nodes = pipeline.nodes.len(),
        edges = pipeline.edges.len(),
        "parsed pipeline document"
    );
    Ok(pipeline)
}
