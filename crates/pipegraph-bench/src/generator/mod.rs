//! Pipeline generator.
//!
//! Produces [`Pipeline`] instances laid out in layers, the way a visual editor
//! user builds them: inputs on the left, outputs on the right, processing
//! nodes in between.

pub mod layers;

use pipegraph_core::Pipeline;
use rand::SeedableRng;
use rand::rngs::StdRng;

use layers::build_layered_pipeline;

/// Configuration for the pipeline generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Seed for the random number generator (deterministic).
    pub seed: u64,
    /// Total number of nodes, inputs and outputs included.
    pub num_nodes: usize,
    /// Number of `input` nodes in the first layer.
    pub num_inputs: usize,
    /// Number of `output` nodes in the last layer.
    pub num_outputs: usize,
    /// Number of layers, at least 3.
    pub depth: usize,
    /// Maximum incoming edges per node from the previous layer.
    pub fan_in: usize,
    /// Extra forward edges that skip one or more layers, as a fraction of
    /// `num_nodes` (0.0-0.5).
    pub skip_density: f64,
    /// Whether to add back edges that close cycles.
    pub inject_cycles: bool,
    /// Number of edges pointing at node ids that do not exist.
    pub dangling_edges: usize,
    /// Whether nodes carry editor `position` and `data` payloads.
    pub with_payload: bool,
}

/// Predefined size tiers for benchmarking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    /// ~20 nodes, ~30 edges
    Small,
    /// ~200 nodes, ~400 edges
    Medium,
    /// ~2000 nodes, ~4500 edges
    Large,
    /// ~10000 nodes, ~25000 edges
    XLarge,
}

impl SizeTier {
    /// Returns the default `GeneratorConfig` for this size tier.
    pub fn config(self, seed: u64) -> GeneratorConfig {
        match self {
            SizeTier::Small => GeneratorConfig {
                seed,
                num_nodes: 20,
                num_inputs: 2,
                num_outputs: 2,
                depth: 4,
                fan_in: 2,
                skip_density: 0.1,
                inject_cycles: false,
                dangling_edges: 0,
                with_payload: true,
            },
            SizeTier::Medium => GeneratorConfig {
                seed,
                num_nodes: 200,
                num_inputs: 10,
                num_outputs: 8,
                depth: 8,
                fan_in: 3,
                skip_density: 0.15,
                inject_cycles: false,
                dangling_edges: 0,
                with_payload: true,
            },
            SizeTier::Large => GeneratorConfig {
                seed,
                num_nodes: 2000,
                num_inputs: 50,
                num_outputs: 40,
                depth: 16,
                fan_in: 3,
                skip_density: 0.2,
                inject_cycles: false,
                dangling_edges: 0,
                with_payload: true,
            },
            SizeTier::XLarge => GeneratorConfig {
                seed,
                num_nodes: 10_000,
                num_inputs: 200,
                num_outputs: 150,
                depth: 24,
                fan_in: 4,
                skip_density: 0.2,
                inject_cycles: false,
                dangling_edges: 0,
                with_payload: false,
            },
        }
    }
}

/// Generates a [`Pipeline`] from the given configuration.
///
/// All randomness is deterministic, seeded from `config.seed`.
pub fn generate_pipeline(config: &GeneratorConfig) -> Pipeline {
    let mut rng = StdRng::seed_from_u64(config.seed);
    build_layered_pipeline(config, &mut rng)
}
