#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(clippy::wildcard_enum_match_arm)]

use clap::{CommandFactory, Parser};

use super::*;

/// The root help output must contain all top-level subcommand names.
#[test]
fn test_root_help_lists_all_subcommands() {
    let mut cmd = Cli::command();
    let help = format!("{}", cmd.render_help());

    for name in ["analyze", "check", "order", "cycles", "stats", "version"] {
        assert!(
            help.contains(name),
            "root help should mention subcommand '{name}'"
        );
    }
}

/// The root help output must describe every global flag.
#[test]
fn test_root_help_lists_global_flags() {
    let mut cmd = Cli::command();
    let help = format!("{}", cmd.render_help());

    let expected_flags = [
        "--format",
        "--quiet",
        "--verbose",
        "--max-file-size",
        "--no-color",
        "--order",
        "--help",
        "--version",
    ];
    for flag in &expected_flags {
        assert!(
            help.contains(flag),
            "root help should mention flag '{flag}'"
        );
    }
}

/// `pipegraph analyze --help` must mention `--strict` and `FILE`.
#[test]
fn test_analyze_help() {
    let mut cmd = Cli::command();
    let sub = cmd
        .find_subcommand_mut("analyze")
        .expect("analyze subcommand should exist");
    let help = format!("{}", sub.render_help());
    assert!(help.contains("--strict"), "analyze help should mention --strict");
    assert!(help.contains("FILE"), "analyze help should mention FILE");
}

/// `pipegraph check --help` must mention `--strict-types`.
#[test]
fn test_check_help() {
    let mut cmd = Cli::command();
    let sub = cmd
        .find_subcommand_mut("check")
        .expect("check subcommand should exist");
    let help = format!("{}", sub.render_help());
    assert!(
        help.contains("--strict-types"),
        "check help should mention --strict-types"
    );
}

#[test]
fn test_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn test_dash_parses_as_stdin() {
    let cli = Cli::try_parse_from(["pipegraph", "order", "-"]).expect("parses");
    match cli.command {
        Command::Order {
            file: PathOrStdin::Stdin,
        } => {}
        _ => panic!("expected order with stdin"),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "pipegraph",
        "analyze",
        "p.json",
        "--format",
        "json",
        "--order",
        "lexicographic",
        "--strict",
    ])
    .expect("parses");
    assert_eq!(cli.format, OutputFormat::Json);
    assert_eq!(cli.order, OrderArg::Lexicographic);
    match cli.command {
        Command::Analyze {
            file: PathOrStdin::Path(path),
            strict,
        } => {
            assert!(strict);
            assert_eq!(path, PathBuf::from("p.json"));
        }
        _ => panic!("expected analyze"),
    }
}

#[test]
fn test_quiet_conflicts_with_verbose() {
    let err = Cli::try_parse_from(["pipegraph", "--quiet", "--verbose", "version"])
        .err()
        .expect("conflict should fail");
    assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
}

#[test]
fn test_order_arg_maps_to_node_order() {
    assert_eq!(NodeOrder::from(OrderArg::Input), NodeOrder::Input);
    assert_eq!(
        NodeOrder::from(OrderArg::Lexicographic),
        NodeOrder::Lexicographic
    );
}
