//! Implementation of `pipegraph analyze <file>`.
//!
//! Runs the full analysis and prints the summary message (human mode) or the
//! complete result object (JSON mode) to stdout.
//!
//! Flags:
//! - `--strict`: run the structural pre-check first; on errors, print the
//!   diagnostics and stop without analyzing.
//!
//! Exit codes:
//! - 0 = the pipeline is a DAG
//! - 1 = the pipeline contains a cycle, or `--strict` found errors
//! - 2 = input failure
use std::time::Instant;

use pipegraph_core::{AnalysisConfig, AnalysisResult, NodeOrder, analyze_with_config};

use crate::cmd::check::{emit_diagnostics, report_outcome, run_check};
use crate::error::CliError;
use crate::format::{FormatMode, FormatterConfig, write_analysis_human, write_json, write_timing_human};

/// Runs the `analyze` command.
///
/// # Errors
///
/// - [`CliError::ParseFailed`]: content is not a pipeline document.
/// - [`CliError::CheckErrors`]: `strict` is set and the pre-check failed.
/// - [`CliError::CyclicPipeline`]: the analysis found a cycle.
pub fn run(
    content: &str,
    strict: bool,
    order: NodeOrder,
    mode: FormatMode,
    fmt_config: &FormatterConfig,
) -> Result<(), CliError> {
    let pipeline = super::parse_pipeline(content)?;

    if strict {
        let report = run_check(&pipeline, false);
        if !report.is_valid() {
            emit_diagnostics(&report, mode, fmt_config)?;
            return report_outcome(&report);
        }
    }

    let config = AnalysisConfig {
        node_order: order,
        ..AnalysisConfig::default()
    };
    let started = Instant::now();
    let result = analyze_with_config(&pipeline.nodes, &pipeline.edges, &config);
    let elapsed = started.elapsed();

    {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        match mode {
            FormatMode::Human => write_analysis_human(&mut out, &result, fmt_config),
            FormatMode::Json => write_json(&mut out, &result),
        }
        .map_err(|e| CliError::write_failed("stdout", &e))?;
    }

    write_timing_human(&mut std::io::stderr().lock(), "analyzed", elapsed, fmt_config)
        .map_err(|e| CliError::write_failed("stderr", &e))?;

    outcome(result)
}

/// Maps an analysis result to the command outcome.
fn outcome(result: AnalysisResult) -> Result<(), CliError> {
    if result.is_dag {
        Ok(())
    } else {
        Err(CliError::CyclicPipeline {
            cycle: result.cycle_path,
        })
    }
}
