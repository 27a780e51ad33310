//! The bus event type.
//!
//! Every message that crosses the Weft event bus is an [`Event`]: a
//! string-typed, scope-tagged, timestamped envelope around an arbitrary
//! JSON payload. Events are immutable once published — the bus hands
//! each listener a shared reference and never mutates in flight.
//!
//! # Scope
//!
//! [`EventScope`] is advisory metadata for filtering and telemetry, not
//! an access-control boundary. Isolation is enforced at the sandbox
//! boundary, never by scope inspection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use weft_types::InstanceId;

/// Advisory visibility scope of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventScope {
    /// Concerns a single widget (output, input, ready, error).
    Widget,
    /// Concerns one canvas (pipeline lifecycle).
    Canvas,
    /// Host-wide (debug, telemetry).
    Global,
}

/// A single bus event.
///
/// # Example
///
/// ```
/// use weft_event::{names, Event, EventScope};
/// use weft_types::InstanceId;
///
/// let event = Event::new(names::WIDGET_OUTPUT, serde_json::json!({"value": 1}))
///     .with_source(InstanceId::new("w-1"))
///     .with_scope(EventScope::Widget);
///
/// assert_eq!(event.event_type, names::WIDGET_OUTPUT);
/// assert!(event.target_widget.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Event type name, e.g. `widget:output`. See [`crate::names`].
    #[serde(rename = "type")]
    pub event_type: String,

    /// Advisory scope tag.
    pub scope: EventScope,

    /// Arbitrary JSON payload. Typed views live in [`crate::payload`].
    pub payload: Value,

    /// Widget that caused this event, when attributable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_widget: Option<InstanceId>,

    /// Widget this event is addressed to, for point deliveries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_widget: Option<InstanceId>,

    /// Publication time.
    pub timestamp: DateTime<Utc>,
}

impl Event {
    /// Creates a widget-scoped event with the current timestamp.
    #[must_use]
    pub fn new(event_type: impl Into<String>, payload: Value) -> Self {
        Self {
            event_type: event_type.into(),
            scope: EventScope::Widget,
            payload,
            source_widget: None,
            target_widget: None,
            timestamp: Utc::now(),
        }
    }

    /// Sets the advisory scope.
    #[must_use]
    pub fn with_scope(mut self, scope: EventScope) -> Self {
        self.scope = scope;
        self
    }

    /// Attributes the event to a source widget.
    #[must_use]
    pub fn with_source(mut self, source: InstanceId) -> Self {
        self.source_widget = Some(source);
        self
    }

    /// Addresses the event to a target widget.
    #[must_use]
    pub fn with_target(mut self, target: InstanceId) -> Self {
        self.target_widget = Some(target);
        self
    }

    /// Returns the namespace portion of a `ns:action` event type, or
    /// `None` when the type carries no `:` separator.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.event_type.split_once(':').map(|(ns, _)| ns)
    }
}
