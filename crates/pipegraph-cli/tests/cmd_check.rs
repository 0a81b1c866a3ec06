//! Integration tests for `pipegraph check`.
#![allow(clippy::expect_used)]

use std::path::PathBuf;
use std::process::Command;

/// Path to the compiled `pipegraph` binary.
fn pipegraph_bin() -> PathBuf {
    let mut path = std::env::current_exe().expect("current exe");
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.push("pipegraph");
    path
}

/// Path to a shared fixture file.
fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("../../tests/fixtures");
    path.push(name);
    path
}

fn check(args: &[&str]) -> std::process::Output {
    Command::new(pipegraph_bin())
        .arg("check")
        .args(args)
        .env_remove("PIPEGRAPH_LOG")
        .output()
        .expect("run pipegraph check")
}

#[test]
fn check_clean_pipeline_exit_0() {
    let out = check(&[fixture("dag.json").to_str().expect("path")]);
    assert_eq!(out.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("0 errors, 0 warnings"), "stderr: {stderr}");
}

#[test]
fn check_dangling_edge_exit_1() {
    let out = check(&[fixture("dangling.json").to_str().expect("path")]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("[E] PG-TARGET"), "stderr: {stderr}");
    assert!(stderr.contains(r#"non-existent node "Z""#), "stderr: {stderr}");
    assert!(stderr.contains("1 error, 0 warnings"), "stderr: {stderr}");
}

#[test]
fn check_duplicates_report_both_kinds() {
    let out = check(&[fixture("duplicate_ids.json").to_str().expect("path")]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("PG-DUP-NODE"), "stderr: {stderr}");
    assert!(stderr.contains("PG-DUP-EDGE"), "stderr: {stderr}");
}

#[test]
fn check_empty_pipeline_exit_1() {
    let out = check(&[fixture("empty.json").to_str().expect("path")]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("PG-EMPTY"), "stderr: {stderr}");
}

#[test]
fn check_self_loop_is_warning_exit_0() {
    let out = check(&[fixture("self_loop.json").to_str().expect("path")]);
    assert_eq!(out.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("[W] PG-SELF-LOOP"), "stderr: {stderr}");
}

#[test]
fn check_quiet_hides_warnings() {
    let out = check(&["--quiet", fixture("self_loop.json").to_str().expect("path")]);
    assert_eq!(out.status.code(), Some(0));
    assert!(out.stderr.is_empty(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
}

#[test]
fn check_node_types_only_with_strict_types() {
    let path = fixture("unknown_types.json");
    let path = path.to_str().expect("path");

    let lenient = check(&[path]);
    assert!(!String::from_utf8_lossy(&lenient.stderr).contains("PG-NODE-TYPE"));

    let strict = check(&["--strict-types", path]);
    assert_eq!(strict.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&strict.stderr);
    assert!(stderr.contains(r#"unknown node type "quantum""#), "stderr: {stderr}");
}

#[test]
fn check_json_report_on_stdout() {
    let out = check(&["--format", "json", fixture("dangling.json").to_str().expect("path")]);
    assert_eq!(out.status.code(), Some(1));
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("valid JSON");
    assert_eq!(v["valid"], false);
    assert_eq!(v["node_count"], 3);
    assert_eq!(v["edge_count"], 3);
    assert_eq!(v["errors"][0]["code"], "PG-TARGET");
    assert_eq!(v["warnings"], serde_json::json!([]));
}

#[test]
fn check_invalid_json_exit_2() {
    let out = check(&[fixture("invalid.json").to_str().expect("path")]);
    assert_eq!(out.status.code(), Some(2));
}
