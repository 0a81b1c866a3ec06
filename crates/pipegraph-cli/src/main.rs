mod cli;
mod cmd;
mod error;
mod format;
mod io;

use clap::Parser;
use pipegraph_core::NodeOrder;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Command, OutputFormat, PathOrStdin};

use crate::error::CliError;
use crate::format::{FormatMode, FormatterConfig};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.format, cli.quiet, cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{e}");
        std::process::exit(e.exit_code());
    }
}

/// Installs the stderr log subscriber.
///
/// `PIPEGRAPH_LOG` takes an `EnvFilter` directive and overrides the level
/// implied by `--quiet` / `--verbose`. Log lines are JSON when `--format json`
/// is active so stderr stays machine-readable.
fn init_tracing(format: OutputFormat, quiet: bool, verbose: bool) {
    let filter = EnvFilter::try_from_env("PIPEGRAPH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if quiet {
            "error"
        } else if verbose {
            "pipegraph=debug,pipegraph_core=debug,info"
        } else {
            "warn"
        })
    });

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        OutputFormat::Json => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        OutputFormat::Human => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let mode = FormatMode::from(cli.format);
    let fmt_config = FormatterConfig::from_flags(cli.no_color, cli.quiet, cli.verbose);
    let order = NodeOrder::from(cli.order);

    match &cli.command {
        Command::Analyze { file, strict } => {
            let content = read(file, cli.max_file_size)?;
            cmd::analyze::run(&content, *strict, order, mode, &fmt_config)
        }
        Command::Check { file, strict_types } => {
            let content = read(file, cli.max_file_size)?;
            cmd::check::run(&content, *strict_types, mode, &fmt_config)
        }
        Command::Order { file } => {
            let content = read(file, cli.max_file_size)?;
            cmd::order::run(&content, order, mode)
        }
        Command::Cycles { file } => {
            let content = read(file, cli.max_file_size)?;
            cmd::cycles::run(&content, order, mode, &fmt_config)
        }
        Command::Stats { file } => {
            let content = read(file, cli.max_file_size)?;
            cmd::stats::run(&content, order, mode)
        }
        Command::Version => {
            println!("{}", pipegraph_core::version());
            Ok(())
        }
    }
}

fn read(source: &PathOrStdin, max_size: u64) -> Result<String, CliError> {
    tracing::debug!(source = %io::source_label(source), max_size, "reading input");
    io::read_input(source, max_size)
}
