//! End-to-end scenarios: JSON pipeline documents through parsing, the
//! pre-check, and analysis.
#![allow(clippy::expect_used)]

use pipegraph_core::{
    CheckCode, CheckConfig, Endpoint, GraphModel, Pipeline, analyze_pipeline, check,
    find_all_cycles,
};

fn parse(json: &str) -> Pipeline {
    Pipeline::from_json(json).expect("valid pipeline document")
}

#[test]
fn editor_pipeline_with_layout_data_is_a_dag() {
    let p = parse(
        r#"{
            "nodes": [
                {"id": "customInput-1", "type": "input", "position": {"x": 0, "y": 0},
                 "data": {"inputName": "question"}},
                {"id": "text-1", "type": "text", "position": {"x": 200, "y": 0},
                 "data": {"text": "{{question}}"}},
                {"id": "llm-1", "type": "llm", "position": {"x": 400, "y": 0}},
                {"id": "customOutput-1", "type": "output", "position": {"x": 600, "y": 0}}
            ],
            "edges": [
                {"id": "e1", "source": "customInput-1", "target": "text-1",
                 "sourceHandle": "customInput-1-value", "animated": true},
                {"id": "e2", "source": "text-1", "target": "llm-1"},
                {"id": "e3", "source": "llm-1", "target": "customOutput-1"}
            ]
        }"#,
    );

    assert!(check(&p, &CheckConfig::strict_types()).diagnostics.is_empty());

    let r = analyze_pipeline(&p);
    assert!(r.is_dag);
    assert_eq!(r.node_count, 4);
    assert_eq!(r.edge_count, 3);
    assert_eq!(
        r.topological_order.expect("order"),
        vec!["customInput-1", "text-1", "llm-1", "customOutput-1"]
    );
    assert_eq!(r.statistics.source_nodes, vec!["customInput-1"]);
    assert_eq!(r.statistics.sink_nodes, vec!["customOutput-1"]);
    assert!(r.message.contains("Execution order: customInput-1 → text-1 → llm-1 → customOutput-1"));
}

#[test]
fn feedback_loop_is_reported_with_its_path() {
    let p = parse(
        r#"{
            "nodes": [
                {"id": "in", "type": "input"},
                {"id": "draft", "type": "llm"},
                {"id": "critic", "type": "llm"},
                {"id": "out", "type": "output"}
            ],
            "edges": [
                {"id": "e1", "source": "in", "target": "draft"},
                {"id": "e2", "source": "draft", "target": "critic"},
                {"id": "e3", "source": "critic", "target": "draft"},
                {"id": "e4", "source": "critic", "target": "out"}
            ]
        }"#,
    );
    let r = analyze_pipeline(&p);
    assert!(!r.is_dag);
    assert_eq!(r.topological_order, None);
    assert_eq!(
        r.cycle_path.expect("cycle"),
        vec!["draft", "critic", "draft"]
    );
    assert_eq!(r.cycles_found, Some(1));
    assert!(r.message.contains("Pipeline contains cycles and is not a valid DAG."));
    assert!(r.message.contains("Detected cycle: draft → critic → draft"));
}

#[test]
fn dangling_edge_is_rejected_by_analysis_and_flagged_by_check() {
    let p = parse(
        r#"{
            "nodes": [
                {"id": "A", "type": "input"},
                {"id": "B", "type": "text"},
                {"id": "C", "type": "output"}
            ],
            "edges": [
                {"id": "ab", "source": "A", "target": "B"},
                {"id": "bc", "source": "B", "target": "C"},
                {"id": "cz", "source": "C", "target": "Z"}
            ]
        }"#,
    );

    let report = check(&p, &CheckConfig::default());
    assert!(!report.is_valid());
    assert_eq!(report.by_code(CheckCode::UnknownTarget).count(), 1);

    let r = analyze_pipeline(&p);
    assert!(r.is_dag);
    assert_eq!(r.edge_count, 2);
    assert_eq!(r.rejected_edges.len(), 1);
    assert_eq!(r.rejected_edges[0].edge_id, "cz");
    assert_eq!(r.rejected_edges[0].endpoint, Endpoint::Target);
    assert_eq!(r.rejected_edges[0].missing_node_id, "Z");
    assert_eq!(r.statistics.sink_nodes, vec!["C"]);
}

#[test]
fn nodes_only_document_is_all_isolated() {
    let p = parse(r#"{"nodes": [{"id": "a", "type": "text"}, {"id": "b", "type": "text"}]}"#);
    let r = analyze_pipeline(&p);
    assert!(r.is_dag);
    assert_eq!(r.statistics.isolated_nodes, vec!["a", "b"]);
    assert_eq!(r.statistics.connectivity, 0.0);
    assert!(r.message.contains("Warning: 2 isolated node(s) detected."));
    assert!(r.message.contains("Warning: no source nodes detected."));
}

#[test]
fn duplicate_node_ids_are_errors_for_check_but_analyzable() {
    let p = parse(
        r#"{
            "nodes": [
                {"id": "a", "type": "input"},
                {"id": "a", "type": "output"},
                {"id": "b", "type": "output"}
            ],
            "edges": [{"id": "e", "source": "a", "target": "b"}]
        }"#,
    );
    let report = check(&p, &CheckConfig::default());
    assert_eq!(report.by_code(CheckCode::DuplicateNode).count(), 1);

    let r = analyze_pipeline(&p);
    assert_eq!(r.node_count, 2);
    assert_eq!(r.statistics.node_types.get("input"), Some(&1));
    assert_eq!(r.statistics.node_types.get("output"), Some(&1));
}

#[test]
fn interlocking_cycles_are_all_counted() {
    // a → b → c → a and c → d → c share node c.
    let p = parse(
        r#"{
            "nodes": [
                {"id": "a", "type": "text"}, {"id": "b", "type": "text"},
                {"id": "c", "type": "text"}, {"id": "d", "type": "text"}
            ],
            "edges": [
                {"id": "1", "source": "a", "target": "b"},
                {"id": "2", "source": "b", "target": "c"},
                {"id": "3", "source": "c", "target": "a"},
                {"id": "4", "source": "c", "target": "d"},
                {"id": "5", "source": "d", "target": "c"}
            ]
        }"#,
    );
    let model = GraphModel::build(&p.nodes, &p.edges);
    let cycles = find_all_cycles(&model);
    assert_eq!(cycles.len(), 2);
    assert_eq!(cycles[0], vec!["a", "b", "c", "a"]);
    assert_eq!(cycles[1], vec!["c", "d", "c"]);
    assert_eq!(analyze_pipeline(&p).cycles_found, Some(2));
}

#[test]
fn result_json_shape() {
    let p = parse(
        r#"{"nodes": [{"id": "x", "type": "input"}, {"id": "y", "type": "output"}],
            "edges": [{"id": "e", "source": "x", "target": "y"}]}"#,
    );
    let json = serde_json::to_value(analyze_pipeline(&p)).expect("serializes");
    for key in [
        "node_count",
        "edge_count",
        "is_dag",
        "topological_order",
        "statistics",
        "rejected_edges",
        "message",
    ] {
        assert!(json.get(key).is_some(), "missing key {key}");
    }
    assert_eq!(json["statistics"]["node_types"]["input"], 1);
    assert_eq!(json["statistics"]["max_out_degree"], 1);
}
