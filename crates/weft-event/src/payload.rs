//! Typed views over event payloads.
//!
//! The bus carries payloads as raw [`serde_json::Value`] so that custom
//! widget data passes through untouched. The router and bridge exchange
//! *structured* payloads for their own event types; these structs are
//! those contracts. Each converts to/from `Value` at the edges — the bus
//! itself never inspects payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use weft_types::{ConnectionId, InstanceId, NodeId, PipelineId, PortName};

use crate::EventError;

/// Payload of a `widget:output` event: one named output emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputPayload {
    /// The output port (signal name) the widget emitted on.
    pub port_name: PortName,
    /// The emitted value, untransformed.
    pub value: Value,
}

/// Payload of a `widget:input` event: one resolved delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputPayload {
    /// Target input port.
    pub port_name: PortName,
    /// The delivered value, identical to what the source emitted.
    pub value: Value,
    /// Widget that produced the value.
    pub source_widget: InstanceId,
    /// Port the value was emitted on.
    pub source_port: PortName,
    /// Wire that carried the delivery; `broadcast:<type>` for
    /// manifest-declared broadcast deliveries.
    pub connection_id: ConnectionId,
}

/// Payload of a `widget:stateChanged` event: a state patch.
///
/// Each changed key is routed by the pipeline router as if the widget
/// had emitted an output port of the same name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateChangePayload {
    /// Changed keys and their new values.
    pub changes: Map<String, Value>,
}

/// Payload of a `pipeline:activity` telemetry event: one routed delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPayload {
    /// Pipeline whose wire carried the delivery, when one did.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_id: Option<PipelineId>,
    /// The wire (or synthetic broadcast id).
    pub connection_id: ConnectionId,
    /// Source node, for point-to-point deliveries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_node: Option<NodeId>,
    /// Source widget instance.
    pub source_widget: InstanceId,
    /// Target widget instance.
    pub target_widget: InstanceId,
}

macro_rules! payload_conversions {
    ($ty:ty) => {
        impl $ty {
            /// Serializes into a raw event payload.
            #[must_use]
            pub fn into_value(self) -> Value {
                // Serialization of plain data structs cannot fail.
                serde_json::to_value(self).unwrap_or(Value::Null)
            }

            /// Parses a raw event payload into this view.
            ///
            /// # Errors
            ///
            /// Returns [`EventError::MalformedPayload`] when the value
            /// does not match the contract.
            pub fn from_value(value: &Value) -> Result<Self, EventError> {
                serde_json::from_value(value.clone())
                    .map_err(|e| EventError::MalformedPayload(e.to_string()))
            }
        }
    };
}

payload_conversions!(OutputPayload);
payload_conversions!(InputPayload);
payload_conversions!(StateChangePayload);
payload_conversions!(ActivityPayload);
