//! Clap CLI definition: root struct, subcommands, and shared argument types.
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use pipegraph_core::NodeOrder;

/// A CLI argument that is either a filesystem path or the stdin sentinel `"-"`.
///
/// Parsing `"-"` yields [`PathOrStdin::Stdin`]; anything else yields
/// [`PathOrStdin::Path`].
#[derive(Clone, Debug)]
pub enum PathOrStdin {
    /// Read from standard input.
    Stdin,
    /// Read from the given filesystem path.
    Path(PathBuf),
}

impl std::str::FromStr for PathOrStdin {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(PathOrStdin::Stdin)
        } else {
            Ok(PathOrStdin::Path(PathBuf::from(s)))
        }
    }
}

/// Output format for CLI commands.
///
/// `Human` writes plain text to stdout and colored diagnostics to stderr.
/// `Json` writes one JSON document to stdout and JSON log lines to stderr.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, optionally colored output (default).
    Human,
    /// Structured JSON output.
    Json,
}

/// Node ordering used for tie-breaks and node lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    /// Keep the order nodes appear in the file (default).
    Input,
    /// Sort node ids byte-wise.
    Lexicographic,
}

impl From<OrderArg> for NodeOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Input => NodeOrder::Input,
            OrderArg::Lexicographic => NodeOrder::Lexicographic,
        }
    }
}

/// All top-level subcommands exposed by the `pipegraph` binary.
#[derive(Subcommand)]
pub enum Command {
    /// Analyze a pipeline: DAG verdict, execution order, cycles, statistics.
    Analyze {
        /// Path to a pipeline JSON file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
        /// Run the structural pre-check first and stop if it reports errors.
        #[arg(long)]
        strict: bool,
    },

    /// Run the structural pre-check and report diagnostics.
    Check {
        /// Path to a pipeline JSON file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
        /// Warn about node types outside the built-in vocabulary.
        #[arg(long)]
        strict_types: bool,
    },

    /// Print the execution order, one node id per line.
    Order {
        /// Path to a pipeline JSON file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
    },

    /// List every cycle met by an exhaustive depth-first search.
    Cycles {
        /// Path to a pipeline JSON file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
    },

    /// Print degree and shape statistics.
    Stats {
        /// Path to a pipeline JSON file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
    },

    /// Print the pipegraph-core library version.
    Version,
}

/// Root CLI struct for the `pipegraph` binary.
///
/// All global flags are defined here and marked `global = true` so that clap
/// propagates them to every subcommand.
#[derive(Parser)]
#[command(
    name = "pipegraph",
    version,
    about = "Pipeline graph analyzer",
    long_about = "Analyzes data-flow pipeline graphs exported by a visual editor.\n\
                  Checks structure, detects cycles, computes an execution order,\n\
                  and reports degree statistics."
)]
pub struct Cli {
    /// Active subcommand.
    #[command(subcommand)]
    pub command: Command,

    /// Output format: human (default) or json.
    #[arg(long, short = 'f', default_value = "human", global = true)]
    pub format: OutputFormat,

    /// Suppress all stderr output except errors (incompatible with `--verbose`).
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Increase stderr verbosity: timing and debug logs
    /// (incompatible with `--quiet`).
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Maximum input file size in bytes.
    ///
    /// Can also be set via the `PIPEGRAPH_MAX_FILE_SIZE` environment variable.
    /// The CLI flag takes precedence over the environment variable.
    /// Default: 268435456 (256 MB).
    #[arg(
        long,
        global = true,
        env = "PIPEGRAPH_MAX_FILE_SIZE",
        default_value = "268435456"
    )]
    pub max_file_size: u64,

    /// Disable ANSI color codes in human output.
    ///
    /// Also respects the `NO_COLOR` environment variable per
    /// <https://no-color.org>.
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Node order for tie-breaks and node lists: input (default) or
    /// lexicographic.
    #[arg(long, default_value = "input", global = true)]
    pub order: OrderArg,
}

#[cfg(test)]
mod tests;
