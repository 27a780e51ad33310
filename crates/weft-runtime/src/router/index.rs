//! Per-pipeline routing indices.
//!
//! Built once per loaded pipeline and rebuilt on update; the routing
//! hot path only performs hash lookups.
//!
//! Two indices per pipeline:
//!
//! - **connection index** — `"node_id:port_name"` → outgoing connections
//! - **node index** — node id, live widget-instance id, and a
//!   definition-id guess (explicit [`NodeKind`] tag, the node label, or
//!   an untagged id that does not look like a generated instance id)

use std::collections::HashMap;

use weft_types::{DefinitionId, InstanceId, NodeId, PortName};

use super::pipeline::{Connection, Node, NodeKind, Pipeline};

fn source_key(node_id: &NodeId, port: &PortName) -> String {
    format!("{}:{}", node_id.as_str(), port.as_str())
}

/// Prebuilt lookup structures for one pipeline.
#[derive(Debug)]
pub struct PipelineIndex {
    connections_by_source: HashMap<String, Vec<Connection>>,
    nodes_by_id: HashMap<NodeId, Node>,
    /// `widget_instance_id` verbatim → node, for direct instance matches.
    nodes_by_reference: HashMap<String, NodeId>,
    /// Definition-id guesses → node. Tagged definition nodes, labels,
    /// and untagged ids that do not look generated all land here.
    nodes_by_definition: HashMap<String, NodeId>,
}

impl PipelineIndex {
    /// Builds the indices for a pipeline.
    #[must_use]
    pub fn build(pipeline: &Pipeline) -> Self {
        let mut connections_by_source: HashMap<String, Vec<Connection>> = HashMap::new();
        for conn in &pipeline.connections {
            connections_by_source
                .entry(source_key(&conn.from.node_id, &conn.from.port_name))
                .or_default()
                .push(conn.clone());
        }

        let mut nodes_by_id = HashMap::new();
        let mut nodes_by_reference = HashMap::new();
        let mut nodes_by_definition = HashMap::new();
        for node in &pipeline.nodes {
            nodes_by_id.insert(node.id.clone(), node.clone());
            nodes_by_reference.insert(node.widget_instance_id.clone(), node.id.clone());

            let definition_like = match node.kind {
                Some(NodeKind::Definition) => true,
                Some(NodeKind::Instance) => false,
                // Untagged legacy node: heuristic only. See DefinitionId
                // fallback notes in the resolver.
                None => !InstanceId::new(node.widget_instance_id.as_str()).looks_generated(),
            };
            if definition_like {
                nodes_by_definition.insert(node.widget_instance_id.clone(), node.id.clone());
            }
            if let Some(label) = &node.label {
                nodes_by_definition.insert(label.clone(), node.id.clone());
            }
        }

        Self {
            connections_by_source,
            nodes_by_id,
            nodes_by_reference,
            nodes_by_definition,
        }
    }

    /// Looks up a node by its graph-local id.
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes_by_id.get(id)
    }

    /// Enabled or not, every connection leaving `node_id:port`.
    #[must_use]
    pub fn connections_from(&self, node_id: &NodeId, port: &PortName) -> &[Connection] {
        self.connections_by_source
            .get(&source_key(node_id, port))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Finds the node representing a live widget, by ordered fallback:
    ///
    /// 1. direct match on the widget's instance id;
    /// 2. match on the widget's definition id via the guess index;
    /// 3. linear scan for a label or raw reference equal to the
    ///    definition id.
    ///
    /// The chain exists because authored pipelines may reference either
    /// identity space, and instances are re-created across sessions
    /// while definitions are stable. `None` is the common case — most
    /// pipelines do not involve any given widget.
    #[must_use]
    pub fn find_source_node(
        &self,
        instance: &InstanceId,
        definition: Option<&DefinitionId>,
    ) -> Option<&Node> {
        if let Some(node_id) = self.nodes_by_reference.get(instance.as_str()) {
            return self.nodes_by_id.get(node_id);
        }

        let definition = definition?;
        if let Some(node_id) = self.nodes_by_definition.get(definition.as_str()) {
            return self.nodes_by_id.get(node_id);
        }

        self.nodes_by_id.values().find(|node| {
            // A node explicitly tagged as instance-referencing never
            // matches by definition id, whatever its raw id looks like.
            let raw_matches = node.widget_instance_id == definition.as_str()
                && node.kind != Some(NodeKind::Instance);
            raw_matches || node.label.as_deref() == Some(definition.as_str())
        })
    }
}
