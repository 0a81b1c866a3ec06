/// CLI error types with associated exit codes.
///
/// [`CliError`] is the top-level error type for the `pipegraph` binary. Every
/// variant maps to a stable exit code (1 or 2) via [`CliError::exit_code`]:
///
/// - Exit code **2**: input failure. The tool could not read or decode the
///   input, so no analysis ran.
/// - Exit code **1**: logical failure. The tool ran to completion but the
///   pipeline failed the requested property (cyclic graph, pre-check errors).
use std::fmt;
use std::path::PathBuf;

use pipegraph_core::PipelineParseError;

// ---------------------------------------------------------------------------
// CliError
// ---------------------------------------------------------------------------

/// All error conditions that the `pipegraph` CLI can produce.
#[derive(Debug)]
pub enum CliError {
    // --- Exit code 2: input failures ---
    /// A file argument could not be found on the filesystem.
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The process lacks permission to read a file.
    PermissionDenied {
        /// The path that could not be read.
        path: PathBuf,
    },

    /// The input exceeds the configured `--max-file-size` limit.
    FileTooLarge {
        /// `"-"` for stdin, or the filesystem path.
        source: String,
        /// The configured size limit in bytes.
        limit: u64,
        /// The actual size in bytes; `None` for stdin.
        actual: Option<u64>,
    },

    /// The input bytes are not valid UTF-8.
    InvalidUtf8 {
        /// A human-readable label for the source.
        source: String,
        /// The byte offset of the first invalid byte sequence.
        byte_offset: usize,
    },

    /// An I/O error occurred while reading from stdin.
    StdinReadError {
        /// The underlying I/O error message.
        detail: String,
    },

    /// A generic I/O error not covered by the more specific variants above.
    IoError {
        /// A human-readable label for the source or sink.
        source: String,
        /// The underlying I/O error message.
        detail: String,
    },

    /// The input is not a pipeline document.
    ParseFailed {
        /// Decoder message including line and column.
        detail: String,
    },

    // --- Exit code 1: logical failures ---
    /// The structural pre-check found one or more errors.
    ///
    /// The diagnostics have already been printed.
    CheckErrors {
        /// Number of error diagnostics.
        count: usize,
    },

    /// The pipeline contains a cycle.
    CyclicPipeline {
        /// One cycle, first id repeated last, when known.
        cycle: Option<Vec<String>>,
    },
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::FileTooLarge { .. }
            | Self::InvalidUtf8 { .. }
            | Self::StdinReadError { .. }
            | Self::IoError { .. }
            | Self::ParseFailed { .. } => 2,

            Self::CheckErrors { .. } | Self::CyclicPipeline { .. } => 1,
        }
    }

    /// Returns a human-readable error message suitable for printing to stderr.
    pub fn message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("error: file not found: {}", path.display())
            }
            Self::PermissionDenied { path } => {
                format!("error: permission denied: {}", path.display())
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: Some(actual),
            } => {
                format!("error: file too large: {source} is {actual} bytes, limit is {limit} bytes")
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: None,
            } => {
                format!("error: file too large: {source} exceeded limit of {limit} bytes")
            }
            Self::InvalidUtf8 {
                source,
                byte_offset,
            } => {
                format!(
                    "error: invalid UTF-8 in {source}: first invalid byte at offset {byte_offset}"
                )
            }
            Self::StdinReadError { detail } => {
                format!("error: failed to read stdin: {detail}")
            }
            Self::IoError { source, detail } => {
                format!("error: I/O error on {source}: {detail}")
            }
            Self::ParseFailed { detail } => {
                format!("error: invalid pipeline document: {detail}")
            }
            Self::CheckErrors { count } => {
                format!("error: pre-check failed with {count} error(s)")
            }
            Self::CyclicPipeline { cycle: Some(cycle) } => {
                format!("error: pipeline contains a cycle: {}", cycle.join(" → "))
            }
            Self::CyclicPipeline { cycle: None } => {
                "error: pipeline contains a cycle".to_owned()
            }
        }
    }

    /// Wraps a failed write to `sink` (`"stdout"` or `"stderr"`).
    pub fn write_failed(sink: &str, e: &std::io::Error) -> Self {
        Self::IoError {
            source: sink.to_owned(),
            detail: e.to_string(),
        }
    }
}

impl From<PipelineParseError> for CliError {
    fn from(e: PipelineParseError) -> Self {
        Self::ParseFailed {
            detail: e.to_string(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use std::path::PathBuf;

    use pipegraph_core::Pipeline;

    use super::*;

    // ── exit_code ────────────────────────────────────────────────────────────

    #[test]
    fn file_not_found_is_exit_2() {
        let e = CliError::FileNotFound {
            path: PathBuf::from("pipeline.json"),
        };
        assert_eq!(e.exit_code(), 2);
    }

    #[test]
    fn file_too_large_is_exit_2() {
        let e = CliError::FileTooLarge {
            source: "big.json".to_owned(),
            limit: 1024,
            actual: Some(2048),
        };
        assert_eq!(e.exit_code(), 2);
    }

    #[test]
    fn invalid_utf8_is_exit_2() {
        let e = CliError::InvalidUtf8 {
            source: "bad.json".to_owned(),
            byte_offset: 42,
        };
        assert_eq!(e.exit_code(), 2);
    }

    #[test]
    fn parse_failed_is_exit_2() {
        let e = CliError::ParseFailed {
            detail: "line 1, column 1: expected value".to_owned(),
        };
        assert_eq!(e.exit_code(), 2);
    }

    #[test]
    fn check_errors_is_exit_1() {
        assert_eq!(CliError::CheckErrors { count: 3 }.exit_code(), 1);
    }

    #[test]
    fn cyclic_pipeline_is_exit_1() {
        assert_eq!(CliError::CyclicPipeline { cycle: None }.exit_code(), 1);
    }

    // ── message content ──────────────────────────────────────────────────────

    #[test]
    fn file_not_found_message_contains_path() {
        let e = CliError::FileNotFound {
            path: PathBuf::from("flow.json"),
        };
        let msg = e.message();
        assert!(msg.contains("flow.json"), "message: {msg}");
        assert!(msg.contains("not found"), "message: {msg}");
    }

    #[test]
    fn file_too_large_without_actual_mentions_limit() {
        let e = CliError::FileTooLarge {
            source: "-".to_owned(),
            limit: 512,
            actual: None,
        };
        assert!(e.message().contains("512"));
    }

    #[test]
    fn cyclic_message_shows_path() {
        let e = CliError::CyclicPipeline {
            cycle: Some(vec!["a".to_owned(), "b".to_owned(), "a".to_owned()]),
        };
        assert_eq!(e.message(), "error: pipeline contains a cycle: a → b → a");
    }

    #[test]
    fn parse_error_converts_with_position() {
        let parse_err = Pipeline::from_json("{").expect_err("truncated document");
        let e = CliError::from(parse_err);
        assert_eq!(e.exit_code(), 2);
        assert!(e.message().contains("line 1"), "message: {}", e.message());
    }

    #[test]
    fn display_matches_message() {
        let e = CliError::CheckErrors { count: 1 };
        assert_eq!(format!("{e}"), e.message());
    }

    #[test]
    fn error_trait_is_implemented() {
        let e: Box<dyn std::error::Error> = Box::new(CliError::CheckErrors { count: 2 });
        assert!(!e.to_string().is_empty());
    }
}
