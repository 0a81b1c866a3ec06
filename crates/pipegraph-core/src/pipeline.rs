//! Pipeline document types: nodes, edges, and the top-level [`Pipeline`].
//!
//! The analysis engine only ever reads `id`, `type`, `source`, and `target`.
//! Everything else a pipeline editor attaches to a node or edge (canvas
//! position, handle names, per-node settings) is kept verbatim in the
//! `extra` map so a document round-trips through the CLI unchanged.
//!
//! Never add `#[serde(deny_unknown_fields)]` to these structs.
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque pass-through payload attached to nodes, edges, and the document.
pub type Payload = serde_json::Map<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Node / Edge
// ---------------------------------------------------------------------------

/// A single typed node in a pipeline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PipelineNode {
    /// Caller-supplied identifier, unique within one pipeline.
    pub id: String,

    /// Node type (`"input"`, `"llm"`, ...). The engine treats it as an
    /// opaque label and only counts it.
    #[serde(rename = "type")]
    pub node_type: String,

    /// Every other field of the node object.
    #[serde(flatten)]
    pub extra: Payload,
}

impl PipelineNode {
    /// Creates a node with an empty payload.
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            extra: Payload::new(),
        }
    }
}

/// A directed connection from `source` to `target`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PipelineEdge {
    /// Caller-supplied identifier, unique within one pipeline.
    pub id: String,

    /// Id of the node the edge leaves.
    pub source: String,

    /// Id of the node the edge enters.
    pub target: String,

    /// Every other field of the edge object (`sourceHandle`, `targetHandle`, ...).
    #[serde(flatten)]
    pub extra: Payload,
}

impl PipelineEdge {
    /// Creates an edge with an empty payload.
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            extra: Payload::new(),
        }
    }

    /// Returns `true` if the edge starts and ends at the same node.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// A complete pipeline document as submitted by an editor.
///
/// `edges` may be omitted from the JSON and defaults to empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pipeline {
    /// Node list in caller order.
    pub nodes: Vec<PipelineNode>,

    /// Edge list in caller order.
    #[serde(default)]
    pub edges: Vec<PipelineEdge>,

    /// Unknown top-level keys.
    #[serde(flatten)]
    pub extra: Payload,
}

/// Error returned when a pipeline document cannot be decoded.
#[derive(Debug, Error)]
#[error("line {line}, column {column}: {message}")]
pub struct PipelineParseError {
    /// 1-based line of the failure.
    pub line: usize,
    /// 1-based column of the failure.
    pub column: usize,
    /// Decoder message.
    pub message: String,
}

impl From<serde_json::Error> for PipelineParseError {
    fn from(e: serde_json::Error) -> Self {
        let (line, column) = (e.line(), e.column());
        let full = e.to_string();
        let suffix = format!(" at line {line} column {column}");
        let message = full.strip_suffix(&suffix).unwrap_or(&full).to_owned();
        Self {
            line,
            column,
            message,
        }
    }
}

impl Pipeline {
    /// Creates a pipeline from node and edge lists.
    pub fn new(nodes: Vec<PipelineNode>, edges: Vec<PipelineEdge>) -> Self {
        Self {
            nodes,
            edges,
            extra: Payload::new(),
        }
    }

    /// Decodes a pipeline from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineParseError`] when the text is not JSON or lacks the
    /// required `nodes` array or node/edge fields.
    pub fn from_json(s: &str) -> Result<Self, PipelineParseError> {
        Ok(serde_json::from_str(s)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
