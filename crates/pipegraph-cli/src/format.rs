/// Output formatting: human-readable and JSON modes.
///
/// Pre-check diagnostics go to stderr, one per line:
///
/// - **Human mode** (default): color-coded by severity. Colors are disabled
///   when `--no-color` is set, the `NO_COLOR` environment variable is present
///   (per <https://no-color.org>), or stderr is not a TTY.
/// - **JSON mode**: one JSON object per line (NDJSON).
///
/// Analysis results go to stdout, either as the multi-line summary message or
/// as a single pretty-printed JSON document.
use std::io::{IsTerminal as _, Write};
use std::time::Duration;

use pipegraph_core::{AnalysisResult, Diagnostic, Severity};
use serde::Serialize;

use crate::OutputFormat;

// ---------------------------------------------------------------------------
// Color support detection
// ---------------------------------------------------------------------------

/// Returns `true` if ANSI color codes should be emitted.
pub fn colors_enabled(no_color_flag: bool) -> bool {
    if no_color_flag {
        return false;
    }
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stderr().is_terminal()
}

const ANSI_RED: &str = "\x1b[31m";
const ANSI_GREEN: &str = "\x1b[32m";
const ANSI_YELLOW: &str = "\x1b[33m";
const ANSI_RESET: &str = "\x1b[0m";

// ---------------------------------------------------------------------------
// FormatterConfig
// ---------------------------------------------------------------------------

/// Formatter settings derived from the global CLI flags.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Whether ANSI colors are enabled.
    pub colors: bool,
    /// Suppress all non-error stderr output.
    pub quiet: bool,
    /// Emit timing to stderr.
    pub verbose: bool,
}

impl FormatterConfig {
    /// Constructs a [`FormatterConfig`] from the raw CLI flags.
    pub fn from_flags(no_color_flag: bool, quiet: bool, verbose: bool) -> Self {
        Self {
            colors: colors_enabled(no_color_flag),
            quiet,
            verbose,
        }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.colors {
            format!("{color}{text}{ANSI_RESET}")
        } else {
            text.to_owned()
        }
    }
}

/// Output format selection, mirroring the CLI `--format` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatMode {
    /// Human-readable, optionally colored output.
    Human,
    /// Structured JSON output.
    Json,
}

impl From<OutputFormat> for FormatMode {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => Self::Human,
            OutputFormat::Json => Self::Json,
        }
    }
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// Writes a single [`Diagnostic`] in human-readable format.
///
/// Format: `[E] PG-TARGET  edges[2] "e3".target: target references non-existent node "z"`
///
/// Warnings are suppressed in quiet mode.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_diagnostic_human<W: Write>(
    writer: &mut W,
    diag: &Diagnostic,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    let (tag, color) = match diag.severity {
        Severity::Error => ("[E]", ANSI_RED),
        Severity::Warning if config.quiet => return Ok(()),
        Severity::Warning => ("[W]", ANSI_YELLOW),
    };

    writeln!(
        writer,
        "{tag} {code}  {location}: {message}",
        tag = config.paint(color, tag),
        code = diag.code,
        location = diag.location,
        message = diag.message,
    )
}

/// Writes a single [`Diagnostic`] as one NDJSON line.
///
/// Warnings are suppressed in quiet mode.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_diagnostic_json<W: Write>(
    writer: &mut W,
    diag: &Diagnostic,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if config.quiet && diag.severity == Severity::Warning {
        return Ok(());
    }
    serde_json::to_writer(&mut *writer, diag)?;
    writeln!(writer)
}

/// Writes a single [`Diagnostic`] in the requested format.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_diagnostic<W: Write>(
    writer: &mut W,
    diag: &Diagnostic,
    mode: FormatMode,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    match mode {
        FormatMode::Human => write_diagnostic_human(writer, diag, config),
        FormatMode::Json => write_diagnostic_json(writer, diag, config),
    }
}

/// Writes the `N errors, M warnings` line. Suppressed in quiet mode.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_summary_human<W: Write>(
    writer: &mut W,
    errors: usize,
    warnings: usize,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if config.quiet {
        return Ok(());
    }
    writeln!(
        writer,
        "{errors} {}, {warnings} {}",
        pluralize(errors, "error", "errors"),
        pluralize(warnings, "warning", "warnings"),
    )
}

/// Writes timing information in verbose mode; a no-op otherwise.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_timing_human<W: Write>(
    writer: &mut W,
    label: &str,
    duration: Duration,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if !config.verbose {
        return Ok(());
    }
    writeln!(writer, "{label} in {}ms", duration.as_millis())
}

// ---------------------------------------------------------------------------
// Analysis output
// ---------------------------------------------------------------------------

/// Writes the analysis summary message, coloring the verdict and warnings,
/// followed by one line per rejected edge.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_analysis_human<W: Write>(
    writer: &mut W,
    result: &AnalysisResult,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    for line in result.message.lines() {
        let painted = if line.starts_with("Warning:") {
            config.paint(ANSI_YELLOW, line)
        } else if line.starts_with("Pipeline forms a valid") {
            config.paint(ANSI_GREEN, line)
        } else if line.starts_with("Pipeline contains cycles") {
            config.paint(ANSI_RED, line)
        } else {
            line.to_owned()
        };
        writeln!(writer, "{painted}")?;
    }
    for rejected in &result.rejected_edges {
        writeln!(writer, "  - {rejected}")?;
    }
    Ok(())
}

/// Writes `value` as pretty-printed JSON followed by a newline.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write, T: Serialize + ?Sized>(writer: &mut W, value: &T) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)
}

fn pluralize<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
