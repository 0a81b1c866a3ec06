//! Implementation of `pipegraph check <file>`.
//!
//! Runs the structural pre-check and reports every finding.
//!
//! Flags:
//! - `--strict-types`: warn about node types outside the built-in vocabulary.
//!
//! Human mode writes one diagnostic per line plus a summary to stderr. JSON
//! mode writes the report object to stdout.
//!
//! Exit codes:
//! - 0 = no errors (warnings allowed)
//! - 1 = one or more errors
//! - 2 = input failure
use pipegraph_core::{CheckConfig, CheckReport, Pipeline, check};

use crate::error::CliError;
use crate::format::{
    FormatMode, FormatterConfig, write_diagnostic, write_json, write_summary_human,
};

/// Runs the `check` command.
///
/// # Errors
///
/// - [`CliError::ParseFailed`]: content is not a pipeline document.
/// - [`CliError::CheckErrors`]: the pre-check reported errors.
pub fn run(
    content: &str,
    strict_types: bool,
    mode: FormatMode,
    fmt_config: &FormatterConfig,
) -> Result<(), CliError> {
    let pipeline = super::parse_pipeline(content)?;
    let report = run_check(&pipeline, strict_types);

    match mode {
        FormatMode::Human => emit_diagnostics(&report, mode, fmt_config)?,
        FormatMode::Json => {
            let stdout = std::io::stdout();
            write_json(&mut stdout.lock(), &report)
                .map_err(|e| CliError::write_failed("stdout", &e))?;
        }
    }

    report_outcome(&report)
}

/// Runs the pre-check with or without the node type vocabulary.
pub fn run_check(pipeline: &Pipeline, strict_types: bool) -> CheckReport {
    let config = if strict_types {
        CheckConfig::strict_types()
    } else {
        CheckConfig::default()
    };
    check(pipeline, &config)
}

/// Writes every diagnostic and, in human mode, the summary line to stderr.
///
/// # Errors
///
/// Returns [`CliError::IoError`] if stderr cannot be written.
pub fn emit_diagnostics(
    report: &CheckReport,
    mode: FormatMode,
    fmt_config: &FormatterConfig,
) -> Result<(), CliError> {
    let stderr = std::io::stderr();
    let mut err_out = stderr.lock();

    for diag in &report.diagnostics {
        write_diagnostic(&mut err_out, diag, mode, fmt_config)
            .map_err(|e| CliError::write_failed("stderr", &e))?;
    }
    if mode == FormatMode::Human {
        write_summary_human(
            &mut err_out,
            report.errors().count(),
            report.warnings().count(),
            fmt_config,
        )
        .map_err(|e| CliError::write_failed("stderr", &e))?;
    }
    Ok(())
}

/// Maps a report to the command outcome.
///
/// # Errors
///
/// Returns [`CliError::CheckErrors`] when the report holds errors.
pub fn report_outcome(report: &CheckReport) -> Result<(), CliError> {
    if report.is_valid() {
        Ok(())
    } else {
        Err(CliError::CheckErrors {
            count: report.errors().count(),
        })
    }
}
