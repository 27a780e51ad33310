//! Manifest capability declarations and scan results.
//!
//! [`CapabilityDeclaration`] is the raw block consumed from a widget
//! manifest (produced by the bundle-loading collaborator).
//! [`WidgetDeclaration`] is the derived, cached view the registry
//! computes from it on first query.

use serde::{Deserialize, Serialize};
use weft_types::DefinitionId;

use crate::definition::CapabilityDefinition;

/// The raw capability block of a widget manifest.
///
/// All fields are optional in manifest JSON; a widget may declare only
/// `entityTypes` and rely on the registry to suggest ports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CapabilityDeclaration {
    /// Capability ids this widget consumes.
    pub inputs: Vec<String>,
    /// Capability ids this widget produces.
    pub outputs: Vec<String>,
    /// Custom input capability definitions, registered alongside the widget.
    pub custom_inputs: Vec<CapabilityDefinition>,
    /// Custom output capability definitions, registered alongside the widget.
    pub custom_outputs: Vec<CapabilityDefinition>,
    /// Semantic tags for port suggestion when no explicit ports exist.
    pub entity_types: Vec<String>,
    /// Event-type patterns this widget listens for without a wire
    /// (`"audio:*"`, `"*"`, or exact names).
    pub listens: Vec<String>,
}

impl CapabilityDeclaration {
    /// Returns `true` when the manifest declares no explicit ports.
    #[must_use]
    pub fn has_no_explicit_ports(&self) -> bool {
        self.inputs.is_empty() && self.outputs.is_empty()
    }
}

/// Derived, cached view of a registered widget's capabilities.
///
/// Computed lazily on first query and invalidated whenever the widget's
/// manifest is re-registered. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetDeclaration {
    /// The widget's design-time identity.
    pub widget_id: DefinitionId,
    /// Human-readable widget name.
    pub widget_name: String,
    /// Explicitly declared input capability ids.
    pub inputs: Vec<String>,
    /// Explicitly declared output capability ids.
    pub outputs: Vec<String>,
    /// Inputs inferred from `entityTypes` when no explicit ports exist.
    /// Advisory: suggestions are never auto-wired.
    pub suggested_inputs: Vec<String>,
    /// Outputs inferred from `entityTypes` when no explicit ports exist.
    pub suggested_outputs: Vec<String>,
}

impl WidgetDeclaration {
    /// Declared plus suggested inputs, in that order.
    #[must_use]
    pub fn effective_inputs(&self) -> Vec<&str> {
        self.inputs
            .iter()
            .chain(&self.suggested_inputs)
            .map(String::as_str)
            .collect()
    }

    /// Declared plus suggested outputs, in that order.
    #[must_use]
    pub fn effective_outputs(&self) -> Vec<&str> {
        self.outputs
            .iter()
            .chain(&self.suggested_outputs)
            .map(String::as_str)
            .collect()
    }
}
