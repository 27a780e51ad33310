//! EventBus - shared pub/sub substrate.
//!
//! Every component of the runtime communicates over one [`EventBus`]:
//! the boundary bridge publishes sandbox traffic, the pipeline router
//! consumes outputs and publishes inputs, and host collaborators
//! (canvas UI, telemetry) subscribe to the stable name surface in
//! [`weft_event::names`].
//!
//! # Delivery Contract
//!
//! - [`emit`](EventBus::emit) is synchronous: listeners for the event's
//!   exact type run first, in subscription order, then listeners for the
//!   `"*"` wildcard type.
//! - The listener set is snapshotted before dispatch, so subscribing,
//!   unsubscribing, or emitting from inside a handler is safe; an
//!   in-flight emission always completes to the snapshot.
//! - Ordering is guaranteed only across repeated emissions of the same
//!   type to the same listener set, never across types.
//!
//! The bus holds no state beyond the listener registry; side effects
//! belong entirely to handlers.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{trace, warn};
use weft_event::Event;

/// The wildcard listener type: receives every event.
pub const WILDCARD: &str = "*";

type Handler = Arc<dyn Fn(&Event) + Send + Sync>;

struct Listener {
    id: u64,
    handler: Handler,
}

#[derive(Default)]
struct ListenerTable {
    next_id: u64,
    by_type: HashMap<String, Vec<Listener>>,
}

/// Process-wide typed publish/subscribe dispatcher.
///
/// Cheap to clone; all clones share one listener registry.
///
/// # Example
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use weft_event::{names, Event};
/// use weft_runtime::EventBus;
///
/// let bus = EventBus::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let sink = Arc::clone(&seen);
/// let sub = bus.on(names::WIDGET_READY, move |event| {
///     sink.lock().unwrap().push(event.event_type.clone());
/// });
///
/// bus.emit(Event::new(names::WIDGET_READY, serde_json::Value::Null));
/// assert_eq!(seen.lock().unwrap().len(), 1);
///
/// sub.unsubscribe();
/// bus.emit(Event::new(names::WIDGET_READY, serde_json::Value::Null));
/// assert_eq!(seen.lock().unwrap().len(), 1);
/// ```
#[derive(Clone)]
pub struct EventBus {
    table: Arc<Mutex<ListenerTable>>,
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: Arc::new(Mutex::new(ListenerTable::default())),
        }
    }

    /// Registers a handler for an event type.
    ///
    /// Pass [`WILDCARD`] to receive every event. The returned
    /// [`Subscription`] is the capability to remove the handler;
    /// dropping it does *not* unsubscribe.
    pub fn on<F>(&self, event_type: impl Into<String>, handler: F) -> Subscription
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let event_type = event_type.into();
        let mut table = self.table.lock();
        let id = table.next_id;
        table.next_id += 1;
        table.by_type.entry(event_type.clone()).or_default().push(Listener {
            id,
            handler: Arc::new(handler),
        });

        Subscription {
            table: Arc::downgrade(&self.table),
            event_type,
            id,
        }
    }

    /// Publishes an event synchronously.
    ///
    /// Returns the number of handlers invoked. An event with an empty
    /// type is dropped with a warning.
    pub fn emit(&self, event: Event) -> usize {
        if event.event_type.is_empty() {
            warn!("dropping event with empty type");
            return 0;
        }

        // Snapshot under the lock, dispatch outside it: handlers may
        // subscribe, unsubscribe, or emit again.
        let snapshot: Vec<Handler> = {
            let table = self.table.lock();
            let exact = table.by_type.get(&event.event_type);
            // Guard against double delivery for a literal "*" event.
            let wildcard = if event.event_type == WILDCARD {
                None
            } else {
                table.by_type.get(WILDCARD)
            };
            exact
                .into_iter()
                .flatten()
                .chain(wildcard.into_iter().flatten())
                .map(|l| Arc::clone(&l.handler))
                .collect()
        };

        trace!(event_type = %event.event_type, listeners = snapshot.len(), "emit");
        for handler in &snapshot {
            handler(&event);
        }
        snapshot.len()
    }

    /// Number of registered listeners, across all types.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.table.lock().by_type.values().map(Vec::len).sum()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Capability to remove one registered handler.
///
/// Unsubscribing is idempotent and safe to call from within a handler;
/// the current emission still completes to its snapshot.
pub struct Subscription {
    table: Weak<Mutex<ListenerTable>>,
    event_type: String,
    id: u64,
}

impl Subscription {
    /// Removes the handler. A second call is a no-op.
    pub fn unsubscribe(&self) {
        let Some(table) = self.table.upgrade() else {
            return;
        };
        let mut table = table.lock();
        if let Some(listeners) = table.by_type.get_mut(&self.event_type) {
            listeners.retain(|l| l.id != self.id);
            if listeners.is_empty() {
                table.by_type.remove(&self.event_type);
            }
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("event_type", &self.event_type)
            .field("id", &self.id)
            .finish()
    }
}
