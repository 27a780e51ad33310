//! The cross-boundary message protocol.
//!
//! Every message crossing the host ⇄ sandbox boundary is a flat JSON
//! object with a `type` discriminator and a `widgetId`. The bridge is
//! the only host-side code permitted to speak this protocol.
//!
//! # Inbound (sandbox → host)
//!
//! | `type` | Fields | Becomes |
//! |--------|--------|---------|
//! | `widget-event` | `signal`, `payload` | `widget:output` bus event |
//! | `widget-ready` | — | `widget:ready` bus event |
//! | `widget-error` | `error` | `widget:error` bus event |
//! | `widget-log` | `message`, `payload` | local debug output |
//!
//! # Outbound (host → sandbox)
//!
//! | `type` | Fields |
//! |--------|--------|
//! | `init` | `config` |
//! | `action` | `action`, `payload` |
//! | `input` | `portName`, `value`, `source` |
//!
//! Any message without a recognized kind or widget id fails to parse
//! and is silently discarded by the bridge (with a log line).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use weft_types::{ConnectionId, InstanceId, PortName};

/// A message arriving from a sandboxed widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum InboundMessage {
    /// The widget emitted a named output signal.
    WidgetEvent {
        /// Claimed sender identity; validated against the mount table.
        widget_id: InstanceId,
        /// Output port name.
        signal: PortName,
        /// Emitted value.
        #[serde(default)]
        payload: Value,
    },
    /// The sandbox finished booting.
    WidgetReady {
        /// Claimed sender identity.
        widget_id: InstanceId,
    },
    /// The sandbox reported a failure.
    WidgetError {
        /// Claimed sender identity.
        widget_id: InstanceId,
        /// Error description.
        error: String,
    },
    /// A sandbox log line; surfaced to host debugging only.
    WidgetLog {
        /// Claimed sender identity.
        widget_id: InstanceId,
        /// Log message.
        message: String,
        /// Optional structured context.
        #[serde(default)]
        payload: Value,
    },
}

impl InboundMessage {
    /// The widget id the message claims to originate from.
    #[must_use]
    pub fn widget_id(&self) -> &InstanceId {
        match self {
            Self::WidgetEvent { widget_id, .. }
            | Self::WidgetReady { widget_id }
            | Self::WidgetError { widget_id, .. }
            | Self::WidgetLog { widget_id, .. } => widget_id,
        }
    }

    /// Returns a copy with the claimed widget id replaced.
    ///
    /// Used when the claimed id fails validation and the message's true
    /// origin is known from its arrival channel.
    #[must_use]
    pub fn with_widget_id(mut self, id: InstanceId) -> Self {
        match &mut self {
            Self::WidgetEvent { widget_id, .. }
            | Self::WidgetReady { widget_id }
            | Self::WidgetError { widget_id, .. }
            | Self::WidgetLog { widget_id, .. } => *widget_id = id,
        }
        self
    }
}

/// Provenance attached to a delivered input value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputSource {
    /// Widget that produced the value.
    pub widget_id: InstanceId,
    /// Output port the value was emitted on.
    pub port_name: PortName,
    /// Wire that carried the delivery (`broadcast:<type>` for
    /// broadcast deliveries).
    pub connection_id: ConnectionId,
}

/// A message posted into a sandboxed widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum OutboundMessage {
    /// Initial configuration for a freshly mounted widget.
    Init {
        /// Target widget.
        widget_id: InstanceId,
        /// Opaque configuration blob.
        config: Value,
    },
    /// A host-initiated action.
    Action {
        /// Target widget.
        widget_id: InstanceId,
        /// Action name.
        action: String,
        /// Action arguments.
        #[serde(default)]
        payload: Value,
    },
    /// A routed input delivery.
    Input {
        /// Target widget.
        widget_id: InstanceId,
        /// Target input port.
        port_name: PortName,
        /// Delivered value, untransformed.
        value: Value,
        /// Where the value came from.
        source: InputSource,
    },
}

impl OutboundMessage {
    /// The widget id the message is addressed to.
    #[must_use]
    pub fn widget_id(&self) -> &InstanceId {
        match self {
            Self::Init { widget_id, .. }
            | Self::Action { widget_id, .. }
            | Self::Input { widget_id, .. } => widget_id,
        }
    }
}
