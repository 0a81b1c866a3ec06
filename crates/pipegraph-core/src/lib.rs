#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod analysis;
pub mod check;
pub mod graph;
pub mod pipeline;
pub mod stats;

pub use analysis::{
    AnalysisConfig, AnalysisResult, DEFAULT_PREVIEW_LEN, analyze, analyze_pipeline,
    analyze_with_config, summary_message,
};
pub use check::{
    CheckCode, CheckConfig, CheckReport, CheckRule, DEFAULT_NODE_TYPES, Diagnostic, Location,
    Severity, build_registry, check,
};
pub use graph::cycles::CycleCheck;
pub use graph::{
    EdgeWeight, Endpoint, GraphModel, NodeOrder, NodeWeight, RejectedEdge, find_all_cycles,
    find_cycle, is_acyclic, topological_sort,
};
pub use pipeline::{Payload, Pipeline, PipelineEdge, PipelineNode, PipelineParseError};
pub use stats::GraphStatistics;

/// Returns the current version of the pipegraph-core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
