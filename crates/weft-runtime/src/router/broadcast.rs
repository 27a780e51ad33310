//! Manifest-declared broadcast listeners.
//!
//! Besides explicit point-to-point wires, a widget may declare (via its
//! manifest) that it listens for an event type, a namespace wildcard
//! (`audio:*`), or everything (`*`). [`BroadcastListeners`] owns those
//! declarations for one router plus the dedupe table that keeps an
//! event routed through several observation paths from reaching the
//! same audience twice.
//!
//! # Dedupe Window
//!
//! Deliveries are deduplicated per `(event_type, source)` pair for a
//! short trailing window (default tens of milliseconds). The window is
//! a fire-and-forget deadline: the key simply stops suppressing after
//! it elapses; there is no cancellation contract.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::{Duration, Instant};

use weft_event::EventPattern;
use weft_types::InstanceId;

/// Listener set and dedupe state for one router instance.
#[derive(Debug)]
pub struct BroadcastListeners {
    listeners: HashMap<EventPattern, HashSet<InstanceId>>,
    dedupe: HashMap<(String, InstanceId), Instant>,
    window: Duration,
}

impl BroadcastListeners {
    /// Creates an empty set with the given dedupe window.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            listeners: HashMap::new(),
            dedupe: HashMap::new(),
            window,
        }
    }

    /// Declares a widget's listener patterns (from its manifest).
    pub fn add(&mut self, instance: InstanceId, patterns: &[String]) {
        for raw in patterns {
            self.listeners
                .entry(EventPattern::parse(raw))
                .or_default()
                .insert(instance.clone());
        }
    }

    /// Removes a widget from every pattern set. Idempotent.
    pub fn remove(&mut self, instance: &InstanceId) {
        self.listeners.retain(|_, set| {
            set.remove(instance);
            !set.is_empty()
        });
    }

    /// Computes the delivery audience for one emission.
    ///
    /// Returns every declared listener matching `event_type`, excluding
    /// the source itself (no self-delivery, even through `*`). Returns
    /// an empty audience when the `(event_type, source)` pair was
    /// already broadcast within the dedupe window; a successful call
    /// arms the window for the pair.
    pub fn audience(&mut self, event_type: &str, source: &InstanceId) -> Vec<InstanceId> {
        let now = Instant::now();
        let key = (event_type.to_string(), source.clone());

        if let Some(armed) = self.dedupe.get(&key) {
            if now.duration_since(*armed) < self.window {
                return Vec::new();
            }
        }

        // Opportunistic pruning keeps the table from growing with dead
        // keys between emissions.
        let window = self.window;
        self.dedupe.retain(|_, armed| now.duration_since(*armed) < window);
        self.dedupe.insert(key, now);

        // BTreeSet gives a deterministic delivery order.
        let mut audience = BTreeSet::new();
        for (pattern, instances) in &self.listeners {
            if pattern.matches(event_type) {
                audience.extend(instances.iter().cloned());
            }
        }
        audience.remove(source);
        audience.into_iter().collect()
    }

    /// Number of distinct declared listeners across all patterns.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners
            .values()
            .flatten()
            .collect::<HashSet<_>>()
            .len()
    }

    /// Drops all listeners and dedupe state.
    pub fn clear(&mut self) {
        self.listeners.clear();
        self.dedupe.clear();
    }
}
