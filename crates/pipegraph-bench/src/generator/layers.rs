//! Layered layout: nodes are split into columns, each node is fed by the
//! column before it, then skip edges, back edges, and dangling edges are
//! overlaid.

use pipegraph_core::{Payload, Pipeline, PipelineEdge, PipelineNode};
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::index;
use serde_json::json;

use super::GeneratorConfig;

/// Node types used for the processing layers between inputs and outputs.
pub const PROCESSING_TYPES: &[&str] = &[
    "text",
    "llm",
    "api",
    "filter",
    "transform",
    "math",
    "database",
    "validator",
];

/// Horizontal distance between layers in generated `position` payloads.
const LAYER_SPACING: u64 = 240;
/// Vertical distance between nodes of one layer.
const ROW_SPACING: u64 = 120;

/// Builds a complete [`Pipeline`] from the generator configuration.
pub fn build_layered_pipeline(config: &GeneratorConfig, rng: &mut StdRng) -> Pipeline {
    let layer_sizes = layer_sizes(config);

    let mut nodes: Vec<PipelineNode> = Vec::with_capacity(config.num_nodes);
    let mut layers: Vec<Vec<usize>> = Vec::with_capacity(layer_sizes.len());
    let last = layer_sizes.len().saturating_sub(1);

    for (layer, &size) in layer_sizes.iter().enumerate() {
        let mut members = Vec::with_capacity(size);
        for row in 0..size {
            let node_type = if layer == 0 {
                "input"
            } else if layer == last {
                "output"
            } else {
                PROCESSING_TYPES[rng.gen_range(0..PROCESSING_TYPES.len())]
            };
            members.push(nodes.len());
            let node = build_node(nodes.len(), node_type, layer, row, config.with_payload);
            nodes.push(node);
        }
        layers.push(members);
    }

    let mut edges: Vec<PipelineEdge> = Vec::new();
    let mut edge_counter: usize = 0;

    build_feed_edges(rng, &nodes, &layers, config, &mut edges, &mut edge_counter);
    build_skip_edges(rng, &nodes, &layers, config, &mut edges, &mut edge_counter);

    if config.inject_cycles && !edges.is_empty() {
        inject_cycles(rng, &mut edges, &mut edge_counter);
    }

    for k in 0..config.dangling_edges {
        if nodes.is_empty() {
            break;
        }
        let source = &nodes[rng.gen_range(0..nodes.len())].id;
        edges.push(PipelineEdge::new(
            format!("e-{edge_counter}"),
            source.clone(),
            format!("missing-{k}"),
        ));
        edge_counter += 1;
    }

    Pipeline::new(nodes, edges)
}

/// Splits `num_nodes` into `depth` non-empty layers: inputs first, outputs
/// last, and the remainder spread evenly across the middle.
fn layer_sizes(config: &GeneratorConfig) -> Vec<usize> {
    let inputs = config.num_inputs.min(config.num_nodes);
    let outputs = config.num_outputs.min(config.num_nodes - inputs);
    let middle = config.num_nodes - inputs - outputs;
    let middle_layers = config.depth.max(3) - 2;

    let mut sizes = vec![inputs];
    let base = middle / middle_layers;
    let extra = middle % middle_layers;
    for i in 0..middle_layers {
        sizes.push(base + usize::from(i < extra));
    }
    sizes.push(outputs);

    sizes.retain(|&n| n > 0);
    sizes
}

fn build_node(
    index: usize,
    node_type: &str,
    layer: usize,
    row: usize,
    with_payload: bool,
) -> PipelineNode {
    let id = format!("{node_type}-{index}");
    let mut node = PipelineNode::new(id.clone(), node_type);
    if with_payload {
        let mut extra = Payload::new();
        extra.insert(
            "position".to_owned(),
            json!({ "x": layer as u64 * LAYER_SPACING, "y": row as u64 * ROW_SPACING }),
        );
        extra.insert(
            "data".to_owned(),
            json!({ "id": id, "nodeType": node_type }),
        );
        node.extra = extra;
    }
    node
}

/// Connects every node outside the first layer to between 1 and `fan_in`
/// distinct nodes of the previous layer.
fn build_feed_edges(
    rng: &mut StdRng,
    nodes: &[PipelineNode],
    layers: &[Vec<usize>],
    config: &GeneratorConfig,
    edges_out: &mut Vec<PipelineEdge>,
    edge_counter: &mut usize,
) {
    for pair in layers.windows(2) {
        let (parents, children) = (&pair[0], &pair[1]);
        for &child in children {
            let max = config.fan_in.clamp(1, parents.len());
            let count = rng.gen_range(1..=max);
            for pick in index::sample(rng, parents.len(), count).iter() {
                push_edge(nodes, parents[pick], child, edges_out, edge_counter);
            }
        }
    }
}

/// Adds forward edges that jump over at least one layer.
fn build_skip_edges(
    rng: &mut StdRng,
    nodes: &[PipelineNode],
    layers: &[Vec<usize>],
    config: &GeneratorConfig,
    edges_out: &mut Vec<PipelineEdge>,
    edge_counter: &mut usize,
) {
    if layers.len() < 3 {
        return;
    }

    let skip_count = (config.skip_density * config.num_nodes as f64).round() as usize;

    for _ in 0..skip_count {
        let from_layer = rng.gen_range(0..layers.len() - 2);
        let to_layer = rng.gen_range(from_layer + 2..layers.len());
        let src = layers[from_layer][rng.gen_range(0..layers[from_layer].len())];
        let tgt = layers[to_layer][rng.gen_range(0..layers[to_layer].len())];
        push_edge(nodes, src, tgt, edges_out, edge_counter);
    }
}

/// Reverses between one and three existing edges, each closing a two-node
/// cycle with the edge it mirrors.
fn inject_cycles(rng: &mut StdRng, edges_out: &mut Vec<PipelineEdge>, edge_counter: &mut usize) {
    let num_cycles = rng.gen_range(1..=3);
    for _ in 0..num_cycles {
        let mirrored = &edges_out[rng.gen_range(0..edges_out.len())];
        let edge = PipelineEdge::new(
            format!("e-{edge_counter}"),
            mirrored.target.clone(),
            mirrored.source.clone(),
        );
        *edge_counter += 1;
        edges_out.push(edge);
    }
}

fn push_edge(
    nodes: &[PipelineNode],
    src: usize,
    tgt: usize,
    edges_out: &mut Vec<PipelineEdge>,
    edge_counter: &mut usize,
) {
    edges_out.push(PipelineEdge::new(
        format!("e-{edge_counter}"),
        nodes[src].id.clone(),
        nodes[tgt].id.clone(),
    ));
    *edge_counter += 1;
}
