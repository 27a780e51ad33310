//! Pipeline graph data model.
//!
//! A pipeline is a saved graph: nodes reference widgets, connections
//! wire one node's output port to another node's input port. Pipelines
//! are authored by editor tooling and arrive here as data; the router
//! never mutates them.
//!
//! # Identity Ambiguity
//!
//! A node's `widget_instance_id` may hold either a runtime instance id
//! or a design-time definition id — authored pipelines survive sessions
//! while instances do not. The optional [`NodeKind`] tag makes the
//! space explicit; untagged legacy nodes fall back to heuristics in the
//! index (see [`super::index`]).

use serde::{Deserialize, Serialize};
use weft_types::{CanvasId, ConnectionId, NodeId, PipelineId, PortName};

fn default_true() -> bool {
    true
}

/// Which identity space a node's `widget_instance_id` lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// The id is a stable design-time definition id.
    Definition,
    /// The id is a runtime instance id.
    Instance,
}

/// A pipeline-local reference to a widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Graph-local node id.
    pub id: NodeId,
    /// Widget reference — instance id or definition id (see [`NodeKind`]).
    pub widget_instance_id: String,
    /// Optional display label; also consulted during definition-id
    /// fallback lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Explicit identity-space tag. Absent in legacy pipelines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,
}

/// One side of a connection: a node and a port on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// The node.
    pub node_id: NodeId,
    /// The port on that node.
    pub port_name: PortName,
}

/// A directed wire from an output port to an input port.
///
/// Fan-in (many `from`, one `to`) and fan-out (one `from`, many `to`)
/// are both legal across any number of connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    /// Wire id, carried on every delivery for telemetry.
    pub id: ConnectionId,
    /// Source output port.
    pub from: Endpoint,
    /// Target input port.
    pub to: Endpoint,
    /// Disabled connections are skipped during routing.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// A saved pipeline graph, scoped to one canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pipeline {
    /// Pipeline id.
    pub id: PipelineId,
    /// Owning canvas; the reserved default id is accepted everywhere.
    pub canvas_id: CanvasId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Widget references.
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Directed wires.
    #[serde(default)]
    pub connections: Vec<Connection>,
    /// Disabled pipelines are skipped entirely during routing.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Pipeline {
    /// `true` when this pipeline may be loaded by a router for `canvas`.
    #[must_use]
    pub fn belongs_to(&self, canvas: &CanvasId) -> bool {
        self.canvas_id == *canvas || self.canvas_id.is_default()
    }
}
