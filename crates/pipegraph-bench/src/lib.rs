//! Pipeline generator and benchmark utilities for pipegraph.
//!
//! This crate provides deterministic generation of editor-shaped pipeline
//! documents for benchmarking and property-based testing of `pipegraph-core`.

pub mod correctness;
pub mod generator;

pub use generator::{GeneratorConfig, SizeTier, generate_pipeline};
