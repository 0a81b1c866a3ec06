//! Tests that generated pipelines pass the pre-check and analyze as expected
//! across all size tiers and seeds.
#![allow(clippy::expect_used)]

use pipegraph_bench::{GeneratorConfig, SizeTier, generate_pipeline};
use pipegraph_core::{CheckConfig, Pipeline, analyze_pipeline, check};

fn assert_clean(pipeline: &Pipeline, label: &str) {
    let report = check(pipeline, &CheckConfig::strict_types());
    let findings: Vec<String> = report.diagnostics.iter().map(ToString::to_string).collect();
    assert!(
        findings.is_empty(),
        "{label}: pre-check reported {} findings: {findings:?}",
        findings.len()
    );
}

#[test]
fn generated_small_is_clean() {
    for seed in [42, 123, 999, 7777, 54321] {
        let pipeline = generate_pipeline(&SizeTier::Small.config(seed));
        assert_clean(&pipeline, &format!("Small/seed={seed}"));
    }
}

#[test]
fn generated_medium_is_clean() {
    for seed in [42, 123, 999] {
        let pipeline = generate_pipeline(&SizeTier::Medium.config(seed));
        assert_clean(&pipeline, &format!("Medium/seed={seed}"));
    }
}

#[test]
fn generated_large_is_clean() {
    let pipeline = generate_pipeline(&SizeTier::Large.config(42));
    assert_clean(&pipeline, "Large/seed=42");
}

#[test]
fn generated_tiers_are_dags() {
    for tier in [SizeTier::Small, SizeTier::Medium, SizeTier::Large, SizeTier::XLarge] {
        let config = tier.config(42);
        let result = analyze_pipeline(&generate_pipeline(&config));
        assert!(result.is_dag, "{tier:?} should be acyclic");
        assert_eq!(result.node_count, config.num_nodes);
        assert!(result.rejected_edges.is_empty());
    }
}

#[test]
fn generation_is_deterministic() {
    let a = generate_pipeline(&SizeTier::Medium.config(7));
    let b = generate_pipeline(&SizeTier::Medium.config(7));
    assert_eq!(a, b);

    let c = generate_pipeline(&SizeTier::Medium.config(8));
    assert_ne!(a.edges, c.edges);
}

#[test]
fn inputs_are_sources_and_outputs_are_sinks() {
    let config = SizeTier::Small.config(42);
    let result = analyze_pipeline(&generate_pipeline(&config));
    let stats = &result.statistics;

    assert_eq!(stats.node_types.get("input"), Some(&config.num_inputs));
    assert_eq!(stats.node_types.get("output"), Some(&config.num_outputs));
    let output_sinks = stats
        .sink_nodes
        .iter()
        .filter(|id| id.starts_with("output-"))
        .count();
    assert_eq!(output_sinks, config.num_outputs);
    assert!(stats.source_nodes.iter().all(|id| id.starts_with("input-")));
}

#[test]
fn injected_cycles_are_detected() {
    for seed in [1, 2, 3, 4, 5] {
        let config = GeneratorConfig {
            inject_cycles: true,
            ..SizeTier::Medium.config(seed)
        };
        let result = analyze_pipeline(&generate_pipeline(&config));
        assert!(!result.is_dag, "seed={seed}");
        assert!(result.cycle_path.is_some());
        assert!(result.topological_order.is_none());
        assert!(result.cycles_found.unwrap_or(0) >= 1);
    }
}

#[test]
fn dangling_edges_are_rejected() {
    let config = GeneratorConfig {
        dangling_edges: 4,
        ..SizeTier::Small.config(42)
    };
    let pipeline = generate_pipeline(&config);
    let result = analyze_pipeline(&pipeline);
    assert_eq!(result.rejected_edges.len(), 4);
    assert_eq!(result.edge_count + 4, pipeline.edges.len());
    assert!(result.is_dag);

    let report = check(&pipeline, &CheckConfig::default());
    assert_eq!(report.errors().count(), 4);
}

#[test]
fn generated_small_round_trips_through_json() {
    let pipeline = generate_pipeline(&SizeTier::Small.config(42));
    let json = serde_json::to_string(&pipeline).expect("serialize");
    let back = Pipeline::from_json(&json).expect("parse");
    assert_eq!(pipeline, back);
}
