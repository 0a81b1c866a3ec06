//! Structural pre-check for parsed pipelines.
//!
//! [`check`] runs every rule in [`build_registry`] over a [`Pipeline`] and
//! collects all findings without stopping at the first one. Errors mark
//! input that the analysis would silently repair (duplicate ids keep their
//! first occurrence, dangling edges are dropped); warnings flag input that is
//! well formed but probably unintended.
//!
//! The pre-check is optional. [`crate::analysis::analyze`] accepts any input
//! and never consults it.
use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};

use crate::pipeline::Pipeline;

/// Node types accepted by [`CheckConfig::strict_types`].
pub const DEFAULT_NODE_TYPES: [&str; 10] = [
    "input",
    "output",
    "text",
    "llm",
    "api",
    "filter",
    "transform",
    "math",
    "database",
    "validator",
];

// ---------------------------------------------------------------------------
// Diagnostic types
// ---------------------------------------------------------------------------

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The pipeline is malformed.
    Error,
    /// The pipeline is well formed but suspect.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Warning => f.write_str("warning"),
        }
    }
}

/// Stable identifier of a check rule.
///
/// [`CheckCode::code`] returns the form used in serialized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckCode {
    /// The pipeline has no nodes.
    Empty,
    /// A node has an empty `id`.
    EmptyNodeId,
    /// An edge has an empty `id`.
    EmptyEdgeId,
    /// Two nodes share an `id`.
    DuplicateNode,
    /// Two edges share an `id`.
    DuplicateEdge,
    /// An edge `source` is not a node id.
    UnknownSource,
    /// An edge `target` is not a node id.
    UnknownTarget,
    /// An edge connects a node to itself.
    SelfLoop,
    /// A node type is outside the configured vocabulary.
    UnknownNodeType,
}

impl CheckCode {
    /// Returns the hyphenated code string, e.g. `"PG-DUP-NODE"`.
    pub fn code(self) -> &'static str {
        match self {
            Self::Empty => "PG-EMPTY",
            Self::EmptyNodeId => "PG-NODE-ID",
            Self::EmptyEdgeId => "PG-EDGE-ID",
            Self::DuplicateNode => "PG-DUP-NODE",
            Self::DuplicateEdge => "PG-DUP-EDGE",
            Self::UnknownSource => "PG-SOURCE",
            Self::UnknownTarget => "PG-TARGET",
            Self::SelfLoop => "PG-SELF-LOOP",
            Self::UnknownNodeType => "PG-NODE-TYPE",
        }
    }

    /// The severity every finding of this rule carries.
    pub fn severity(self) -> Severity {
        match self {
            Self::Empty
            | Self::EmptyNodeId
            | Self::EmptyEdgeId
            | Self::DuplicateNode
            | Self::DuplicateEdge
            | Self::UnknownSource
            | Self::UnknownTarget => Severity::Error,
            Self::SelfLoop | Self::UnknownNodeType => Severity::Warning,
        }
    }
}

impl fmt::Display for CheckCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for CheckCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// Where a finding was detected. Node and edge positions are zero-based
/// indices into the input arrays, since ids may be empty or repeated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Location {
    /// The pipeline as a whole.
    Pipeline,
    /// A node record.
    Node {
        /// Position in the `nodes` array.
        index: usize,
        /// The node's id as given.
        node_id: String,
    },
    /// An edge record, optionally narrowed to one field.
    Edge {
        /// Position in the `edges` array.
        index: usize,
        /// The edge's id as given.
        edge_id: String,
        /// The offending field, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        field: Option<&'static str>,
    },
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pipeline => f.write_str("pipeline"),
            Self::Node { index, node_id } => write!(f, "nodes[{index}] \"{node_id}\""),
            Self::Edge {
                index,
                edge_id,
                field: None,
            } => write!(f, "edges[{index}] \"{edge_id}\""),
            Self::Edge {
                index,
                edge_id,
                field: Some(field),
            } => write!(f, "edges[{index}] \"{edge_id}\".{field}"),
        }
    }
}

/// A single pre-check finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// The rule that produced this finding.
    pub code: CheckCode,
    /// Severity of the finding, fixed per rule.
    pub severity: Severity,
    /// Where the problem was found.
    pub location: Location,
    /// Human-readable explanation.
    pub message: String,
}

impl Diagnostic {
    /// Constructs a [`Diagnostic`] whose severity follows from `code`.
    pub fn new(code: CheckCode, location: Location, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: code.severity(),
            location,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level_char = match self.severity {
            Severity::Error => 'E',
            Severity::Warning => 'W',
        };
        write!(
            f,
            "[{level_char}] {} {}: {}",
            self.code, self.location, self.message
        )
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// All findings of one [`check`] pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckReport {
    /// Every finding, in rule order then input order.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of node records in the input, duplicates included.
    pub node_count: usize,
    /// Number of edge records in the input, dangling edges included.
    pub edge_count: usize,
}

impl CheckReport {
    /// Returns `true` if no finding is an error. Warnings do not count.
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    /// Iterates error findings.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    /// Iterates warning findings.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    /// Iterates findings produced by `code`.
    pub fn by_code(&self, code: CheckCode) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.code == code)
    }
}

impl Serialize for CheckReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let errors: Vec<&Diagnostic> = self.errors().collect();
        let warnings: Vec<&Diagnostic> = self.warnings().collect();
        let mut s = serializer.serialize_struct("CheckReport", 5)?;
        s.serialize_field("valid", &errors.is_empty())?;
        s.serialize_field("errors", &errors)?;
        s.serialize_field("warnings", &warnings)?;
        s.serialize_field("node_count", &self.node_count)?;
        s.serialize_field("edge_count", &self.edge_count)?;
        s.end()
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Controls optional rules of the pre-check.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckConfig {
    /// When set, node types outside this set produce `PG-NODE-TYPE`
    /// warnings. When `None` any node type is accepted.
    pub allowed_node_types: Option<BTreeSet<String>>,
}

impl CheckConfig {
    /// A configuration that restricts node types to [`DEFAULT_NODE_TYPES`].
    pub fn strict_types() -> Self {
        Self {
            allowed_node_types: Some(DEFAULT_NODE_TYPES.iter().map(|t| (*t).to_owned()).collect()),
        }
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// A stateless rule that inspects a [`Pipeline`] and pushes findings.
pub trait CheckRule {
    /// The code of every finding this rule produces.
    fn code(&self) -> CheckCode;

    /// Inspects `pipeline` and pushes zero or more findings into `diags`.
    fn check(&self, pipeline: &Pipeline, config: &CheckConfig, diags: &mut Vec<Diagnostic>);
}

/// `PG-EMPTY`
struct EmptyPipeline;

impl CheckRule for EmptyPipeline {
    fn code(&self) -> CheckCode {
        CheckCode::Empty
    }

    fn check(&self, pipeline: &Pipeline, _config: &CheckConfig, diags: &mut Vec<Diagnostic>) {
        if pipeline.nodes.is_empty() {
            diags.push(Diagnostic::new(
                self.code(),
                Location::Pipeline,
                "pipeline must contain at least one node",
            ));
        }
    }
}

/// `PG-NODE-ID`
struct EmptyNodeId;

impl CheckRule for EmptyNodeId {
    fn code(&self) -> CheckCode {
        CheckCode::EmptyNodeId
    }

    fn check(&self, pipeline: &Pipeline, _config: &CheckConfig, diags: &mut Vec<Diagnostic>) {
        for (index, node) in pipeline.nodes.iter().enumerate() {
            if node.id.is_empty() {
                diags.push(Diagnostic::new(
                    self.code(),
                    Location::Node {
                        index,
                        node_id: String::new(),
                    },
                    "node id must not be empty",
                ));
            }
        }
    }
}

/// `PG-EDGE-ID`
struct EmptyEdgeId;

impl CheckRule for EmptyEdgeId {
    fn code(&self) -> CheckCode {
        CheckCode::EmptyEdgeId
    }

    fn check(&self, pipeline: &Pipeline, _config: &CheckConfig, diags: &mut Vec<Diagnostic>) {
        for (index, edge) in pipeline.edges.iter().enumerate() {
            if edge.id.is_empty() {
                diags.push(Diagnostic::new(
                    self.code(),
                    Location::Edge {
                        index,
                        edge_id: String::new(),
                        field: Some("id"),
                    },
                    "edge id must not be empty",
                ));
            }
        }
    }
}

/// `PG-DUP-NODE`: one finding per repeat beyond the first occurrence.
/// Empty ids are left to `PG-NODE-ID`.
struct DuplicateNode;

impl CheckRule for DuplicateNode {
    fn code(&self) -> CheckCode {
        CheckCode::DuplicateNode
    }

    fn check(&self, pipeline: &Pipeline, _config: &CheckConfig, diags: &mut Vec<Diagnostic>) {
        let mut seen: HashSet<&str> = HashSet::new();
        for (index, node) in pipeline.nodes.iter().enumerate() {
            let id = node.id.as_str();
            if !id.is_empty() && !seen.insert(id) {
                diags.push(Diagnostic::new(
                    self.code(),
                    Location::Node {
                        index,
                        node_id: id.to_owned(),
                    },
                    format!("duplicate node id \"{id}\""),
                ));
            }
        }
    }
}

/// `PG-DUP-EDGE`: one finding per repeat beyond the first occurrence.
struct DuplicateEdge;

impl CheckRule for DuplicateEdge {
    fn code(&self) -> CheckCode {
        CheckCode::DuplicateEdge
    }

    fn check(&self, pipeline: &Pipeline, _config: &CheckConfig, diags: &mut Vec<Diagnostic>) {
        let mut seen: HashSet<&str> = HashSet::new();
        for (index, edge) in pipeline.edges.iter().enumerate() {
            let id = edge.id.as_str();
            if !id.is_empty() && !seen.insert(id) {
                diags.push(Diagnostic::new(
                    self.code(),
                    Location::Edge {
                        index,
                        edge_id: id.to_owned(),
                        field: None,
                    },
                    format!("duplicate edge id \"{id}\""),
                ));
            }
        }
    }
}

/// `PG-SOURCE` and `PG-TARGET`. Both endpoints are checked independently, so
/// an edge with two unknown endpoints yields two findings.
struct DanglingEndpoint;

impl CheckRule for DanglingEndpoint {
    fn code(&self) -> CheckCode {
        CheckCode::UnknownSource
    }

    fn check(&self, pipeline: &Pipeline, _config: &CheckConfig, diags: &mut Vec<Diagnostic>) {
        let ids: HashSet<&str> = pipeline.nodes.iter().map(|n| n.id.as_str()).collect();
        for (index, edge) in pipeline.edges.iter().enumerate() {
            let endpoints = [
                (CheckCode::UnknownSource, "source", &edge.source),
                (CheckCode::UnknownTarget, "target", &edge.target),
            ];
            for (code, field, node_id) in endpoints {
                if !ids.contains(node_id.as_str()) {
                    diags.push(Diagnostic::new(
                        code,
                        Location::Edge {
                            index,
                            edge_id: edge.id.clone(),
                            field: Some(field),
                        },
                        format!("{field} references non-existent node \"{node_id}\""),
                    ));
                }
            }
        }
    }
}

/// `PG-SELF-LOOP`
struct SelfLoop;

impl CheckRule for SelfLoop {
    fn code(&self) -> CheckCode {
        CheckCode::SelfLoop
    }

    fn check(&self, pipeline: &Pipeline, _config: &CheckConfig, diags: &mut Vec<Diagnostic>) {
        for (index, edge) in pipeline.edges.iter().enumerate() {
            if edge.is_self_loop() {
                diags.push(Diagnostic::new(
                    self.code(),
                    Location::Edge {
                        index,
                        edge_id: edge.id.clone(),
                        field: None,
                    },
                    format!("self-loop on node \"{}\"", edge.source),
                ));
            }
        }
    }
}

/// `PG-NODE-TYPE`. Does nothing unless [`CheckConfig::allowed_node_types`]
/// is set.
struct UnknownNodeType;

impl CheckRule for UnknownNodeType {
    fn code(&self) -> CheckCode {
        CheckCode::UnknownNodeType
    }

    fn check(&self, pipeline: &Pipeline, config: &CheckConfig, diags: &mut Vec<Diagnostic>) {
        let Some(allowed) = &config.allowed_node_types else {
            return;
        };
        for (index, node) in pipeline.nodes.iter().enumerate() {
            if !allowed.contains(&node.node_type) {
                diags.push(Diagnostic::new(
                    self.code(),
                    Location::Node {
                        index,
                        node_id: node.id.clone(),
                    },
                    format!("unknown node type \"{}\"", node.node_type),
                ));
            }
        }
    }
}

/// Returns every built-in rule in reporting order.
pub fn build_registry() -> Vec<Box<dyn CheckRule>> {
    vec![
        Box::new(EmptyPipeline),
        Box::new(EmptyNodeId),
        Box::new(EmptyEdgeId),
        Box::new(DuplicateNode),
        Box::new(DuplicateEdge),
        Box::new(DanglingEndpoint),
        Box::new(SelfLoop),
        Box::new(UnknownNodeType),
    ]
}

/// Runs every rule over `pipeline` and collects all findings.
pub fn check(pipeline: &Pipeline, config: &CheckConfig) -> CheckReport {
    let mut diagnostics = Vec::new();
    for rule in build_registry() {
        rule.check(pipeline, config, &mut diagnostics);
    }

    let report = CheckReport {
        diagnostics,
        node_count: pipeline.nodes.len(),
        edge_count: pipeline.edges.len(),
    };
    tracing::debug!(
        errors = report.errors().count(),
        warnings = report.warnings().count(),
        "pre-check complete"
    );
    report
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
