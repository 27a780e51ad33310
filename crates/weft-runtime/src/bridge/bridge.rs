//! The sandbox boundary bridge.
//!
//! The only host-side code permitted to speak the raw cross-boundary
//! protocol. Inbound sandbox messages become bus events; `widget:input`
//! bus events are forwarded back out to the target's mount.
//!
//! ```text
//! ┌─────────┐  InboundMessage  ┌─────────────────┐  widget:output  ┌─────┐
//! │ Sandbox │ ───────────────► │  BoundaryBridge │ ──────────────► │ Bus │
//! │         │ ◄─────────────── │                 │ ◄────────────── │     │
//! └─────────┘  OutboundMessage └─────────────────┘  widget:input   └─────┘
//! ```
//!
//! # Lifecycle
//!
//! The bridge is explicitly owned and constructor-injected:
//! `new → register_widget* → destroy`. There is no global accessor;
//! whoever owns sandbox mounting holds the bridge and hands the shared
//! [`EventBus`] to other components.
//!
//! # Failure Semantics
//!
//! Nothing here throws across the boundary edge. Malformed inbound
//! messages are dropped and logged; outbound delivery to a missing or
//! unmounted sandbox is reported in the return value and logged,
//! never panicked on, since sandboxes unmount asynchronously mid-flight.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use tracing::{debug, warn};
use weft_event::{names, Event, EventScope, InputPayload, OutputPayload};
use weft_types::InstanceId;

use super::error::BridgeError;
use super::mount::MountHandle;
use super::protocol::{InboundMessage, InputSource, OutboundMessage};
use crate::bus::{EventBus, Subscription};

/// Host-side endpoint of the sandbox boundary.
///
/// # Example
///
/// ```
/// use weft_runtime::{BoundaryBridge, EventBus, MountHandle};
/// use weft_types::InstanceId;
///
/// let bus = EventBus::new();
/// let bridge = BoundaryBridge::new(bus);
///
/// let (mount, _rx) = MountHandle::channel(InstanceId::new("w-1"), 8);
/// bridge.register_widget(InstanceId::new("w-1"), mount);
/// assert_eq!(bridge.registered_count(), 1);
///
/// bridge.unregister_widget(&InstanceId::new("w-1"));
/// bridge.destroy();
/// ```
pub struct BoundaryBridge {
    bus: EventBus,
    mounts: Arc<RwLock<HashMap<InstanceId, MountHandle>>>,
    forward_sub: Mutex<Option<Subscription>>,
}

impl BoundaryBridge {
    /// Creates a bridge on the shared bus.
    ///
    /// The bridge subscribes to `widget:input` and forwards each
    /// delivery to the target widget's mount, so routed traffic reaches
    /// sandboxes without manual plumbing.
    #[must_use]
    pub fn new(bus: EventBus) -> Self {
        let mounts: Arc<RwLock<HashMap<InstanceId, MountHandle>>> =
            Arc::new(RwLock::new(HashMap::new()));

        let forward_sub = {
            let mounts = Arc::clone(&mounts);
            bus.on(names::WIDGET_INPUT, move |event| {
                forward_input(&mounts, event);
            })
        };

        Self {
            bus,
            mounts,
            forward_sub: Mutex::new(Some(forward_sub)),
        }
    }

    /// Associates a runtime instance with its boundary endpoint.
    ///
    /// Re-registering an instance replaces its mount (the previous
    /// sandbox is assumed unmounted).
    pub fn register_widget(&self, instance_id: InstanceId, mount: MountHandle) {
        let previous = self.mounts.write().insert(instance_id.clone(), mount);
        if previous.is_some() {
            debug!(widget = %instance_id, "mount replaced");
        }
    }

    /// Removes a widget's mount. Idempotent.
    pub fn unregister_widget(&self, instance_id: &InstanceId) {
        self.mounts.write().remove(instance_id);
    }

    /// Number of registered mounts.
    #[must_use]
    pub fn registered_count(&self) -> usize {
        self.mounts.read().len()
    }

    /// Handles a raw boundary message.
    ///
    /// `origin` is the instance whose arrival channel physically carried
    /// the message, when known; it overrides a stale or spoofed claimed
    /// id. Malformed messages are dropped with a log line, never thrown.
    pub fn handle_raw(&self, raw: Value, origin: Option<&InstanceId>) {
        match serde_json::from_value::<InboundMessage>(raw) {
            Ok(message) => self.handle_message(message, origin),
            Err(e) => {
                debug!(error = %e, "dropping unrecognized boundary message");
            }
        }
    }

    /// Handles a parsed boundary message.
    ///
    /// Validates the claimed sender identity against the mount table,
    /// then dispatches by kind.
    pub fn handle_message(&self, message: InboundMessage, origin: Option<&InstanceId>) {
        let message = match self.validate_sender(message, origin) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "dropping boundary message with unverifiable sender");
                return;
            }
        };

        match message {
            InboundMessage::WidgetEvent { widget_id, signal, payload } => {
                let output = OutputPayload {
                    port_name: signal,
                    value: payload,
                };
                self.bus.emit(
                    Event::new(names::WIDGET_OUTPUT, output.into_value()).with_source(widget_id),
                );
            }
            InboundMessage::WidgetReady { widget_id } => {
                self.bus
                    .emit(Event::new(names::WIDGET_READY, Value::Null).with_source(widget_id));
            }
            InboundMessage::WidgetError { widget_id, error } => {
                warn!(widget = %widget_id, error = %error, "widget reported error");
                self.bus.emit(
                    Event::new(names::WIDGET_ERROR, serde_json::json!({ "error": error }))
                        .with_source(widget_id),
                );
            }
            InboundMessage::WidgetLog { widget_id, message, payload } => {
                // Surfaced to host debugging only; broadcast listeners
                // never see log traffic.
                debug!(widget = %widget_id, payload = %payload, "widget log: {message}");
                self.bus.emit(
                    Event::new(
                        names::DEBUG_MESSAGE,
                        serde_json::json!({ "message": message, "payload": payload }),
                    )
                    .with_scope(EventScope::Global)
                    .with_source(widget_id),
                );
            }
        }
    }

    /// Resolves the effective sender of an inbound message.
    ///
    /// A claimed id matching a registered mount is trusted. Otherwise
    /// the message's physical origin wins: widgets may carry stale or
    /// placeholder ids across remounts, and a widget must never be able
    /// to impersonate another by claiming its id.
    fn validate_sender(
        &self,
        message: InboundMessage,
        origin: Option<&InstanceId>,
    ) -> Result<InboundMessage, BridgeError> {
        let claimed = message.widget_id().clone();
        let mounts = self.mounts.read();

        if let Some(origin) = origin {
            if origin != &claimed {
                warn!(claimed = %claimed, actual = %origin, "widget id mismatch, using message origin");
                return Ok(message.with_widget_id(origin.clone()));
            }
        }

        if mounts.contains_key(&claimed) {
            return Ok(message);
        }
        match origin {
            // Origin equals claimed but isn't registered yet: a sandbox
            // may speak before its mount lands; trust the channel.
            Some(_) => Ok(message),
            None => Err(BridgeError::UnknownOrigin(claimed)),
        }
    }

    /// Posts the initial configuration to a widget.
    ///
    /// Returns `false` (with a logged warning) when the instance has no
    /// mount or the mount rejected the message.
    pub fn send_config(&self, instance_id: &InstanceId, config: Value) -> bool {
        self.post(
            instance_id,
            OutboundMessage::Init {
                widget_id: instance_id.clone(),
                config,
            },
        )
    }

    /// Posts a host-initiated action to a widget.
    pub fn send_action(&self, instance_id: &InstanceId, action: impl Into<String>, payload: Value) -> bool {
        self.post(
            instance_id,
            OutboundMessage::Action {
                widget_id: instance_id.clone(),
                action: action.into(),
                payload,
            },
        )
    }

    /// Posts an input delivery to a widget.
    ///
    /// Routed deliveries arrive automatically via the bridge's
    /// `widget:input` subscription; call this only for out-of-band
    /// injection.
    pub fn deliver_input(&self, instance_id: &InstanceId, input: &InputPayload) -> bool {
        self.post(instance_id, outbound_input(instance_id, input))
    }

    fn post(&self, instance_id: &InstanceId, message: OutboundMessage) -> bool {
        let mount = self.mounts.read().get(instance_id).cloned();
        let Some(mount) = mount else {
            warn!(widget = %instance_id, "outbound delivery to unregistered widget dropped");
            return false;
        };
        match mount.try_send(message) {
            Ok(()) => true,
            Err(e) => {
                warn!(widget = %instance_id, error = %e, "outbound delivery failed");
                false
            }
        }
    }

    /// Tears the bridge down: stops forwarding and drops every mount.
    pub fn destroy(&self) {
        if let Some(sub) = self.forward_sub.lock().take() {
            sub.unsubscribe();
        }
        self.mounts.write().clear();
    }
}

impl std::fmt::Debug for BoundaryBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundaryBridge")
            .field("registered", &self.registered_count())
            .finish()
    }
}

/// Forwards one `widget:input` bus event to its target mount.
fn forward_input(mounts: &RwLock<HashMap<InstanceId, MountHandle>>, event: &Event) {
    let Some(target) = &event.target_widget else {
        debug!("widget:input event without target, nothing to forward");
        return;
    };
    let payload = match InputPayload::from_value(&event.payload) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "widget:input event with malformed payload");
            return;
        }
    };

    let mount = mounts.read().get(target).cloned();
    let Some(mount) = mount else {
        // Expected steady-state: the target may have unmounted after
        // routing resolved it.
        debug!(widget = %target, "no mount for routed input");
        return;
    };
    if let Err(e) = mount.try_send(outbound_input(target, &payload)) {
        warn!(widget = %target, error = %e, "forwarding routed input failed");
    }
}

fn outbound_input(target: &InstanceId, input: &InputPayload) -> OutboundMessage {
    OutboundMessage::Input {
        widget_id: target.clone(),
        port_name: input.port_name.clone(),
        value: input.value.clone(),
        source: InputSource {
            widget_id: input.source_widget.clone(),
            port_name: input.source_port.clone(),
            connection_id: input.connection_id.clone(),
        },
    }
}
