//! Live widget registration and identity resolution.
//!
//! The router must map whatever identifier a pipeline node carries to a
//! live runtime instance. [`LiveRegistry`] holds the transient
//! bidirectional `InstanceId ⇄ DefinitionId` map — rebuilt whenever the
//! widget set on a canvas changes, never persisted — and implements the
//! one authoritative resolution direction as an ordered strategy chain:
//!
//! 1. [`Resolution::Direct`] — the id is a registered instance id.
//! 2. [`Resolution::Definition`] — the id is a registered definition id;
//!    resolve to its current instance.
//! 3. [`Resolution::AssumeLive`] — neither: assume the id is already a
//!    live instance id. Stale pipelines referencing disconnected
//!    widgets are an expected steady-state condition, not an error.

use std::collections::HashMap;

use tracing::trace;
use weft_types::{DefinitionId, InstanceId};

/// Which strategy resolved an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Registered instance id, used as-is.
    Direct,
    /// Definition id mapped to its current instance.
    Definition,
    /// Unknown id passed through unchanged.
    AssumeLive,
}

/// Transient bidirectional map between the two widget identity spaces.
#[derive(Debug, Default)]
pub struct LiveRegistry {
    by_instance: HashMap<InstanceId, DefinitionId>,
    by_definition: HashMap<DefinitionId, InstanceId>,
}

impl LiveRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a live widget under both identities.
    ///
    /// When several instances of one definition are mounted, the most
    /// recently registered instance wins the definition → instance
    /// direction.
    pub fn register(&mut self, instance: InstanceId, definition: DefinitionId) {
        self.by_definition.insert(definition.clone(), instance.clone());
        self.by_instance.insert(instance, definition);
    }

    /// Removes a live widget. Idempotent.
    pub fn unregister(&mut self, instance: &InstanceId) {
        if let Some(definition) = self.by_instance.remove(instance) {
            // Only drop the reverse entry if it still points at us; a
            // newer instance of the same definition may have replaced it.
            if self.by_definition.get(&definition) == Some(instance) {
                self.by_definition.remove(&definition);
            }
        }
    }

    /// The definition a live instance was registered under.
    #[must_use]
    pub fn definition_of(&self, instance: &InstanceId) -> Option<&DefinitionId> {
        self.by_instance.get(instance)
    }

    /// The current live instance of a definition.
    #[must_use]
    pub fn instance_of(&self, definition: &DefinitionId) -> Option<&InstanceId> {
        self.by_definition.get(definition)
    }

    /// Resolves an id from either identity space to an instance id.
    ///
    /// This is the authoritative direction; see the module docs for the
    /// strategy order.
    #[must_use]
    pub fn resolve(&self, id: &str) -> (InstanceId, Resolution) {
        let as_instance = InstanceId::new(id);
        if self.by_instance.contains_key(&as_instance) {
            return (as_instance, Resolution::Direct);
        }

        if let Some(instance) = self.by_definition.get(&DefinitionId::new(id)) {
            trace!(id, instance = %instance, "resolved definition id to live instance");
            return (instance.clone(), Resolution::Definition);
        }

        (as_instance, Resolution::AssumeLive)
    }

    /// Number of registered live widgets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_instance.len()
    }

    /// `true` when no widgets are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_instance.is_empty()
    }

    /// Drops all registrations.
    pub fn clear(&mut self) {
        self.by_instance.clear();
        self.by_definition.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_resolution_wins() {
        let mut registry = LiveRegistry::new();
        registry.register(InstanceId::new("instance-123"), DefinitionId::new("button.basic"));

        let (id, how) = registry.resolve("instance-123");
        assert_eq!(id.as_str(), "instance-123");
        assert_eq!(how, Resolution::Direct);
    }

    #[test]
    fn definition_resolves_to_current_instance() {
        let mut registry = LiveRegistry::new();
        registry.register(InstanceId::new("instance-123"), DefinitionId::new("button.basic"));

        let (id, how) = registry.resolve("button.basic");
        assert_eq!(id.as_str(), "instance-123");
        assert_eq!(how, Resolution::Definition);
    }

    #[test]
    fn unknown_id_is_assumed_live() {
        let registry = LiveRegistry::new();
        let (id, how) = registry.resolve("w-ghost");
        assert_eq!(id.as_str(), "w-ghost");
        assert_eq!(how, Resolution::AssumeLive);
    }

    #[test]
    fn latest_instance_wins_the_definition_direction() {
        let mut registry = LiveRegistry::new();
        let def = DefinitionId::new("button.basic");
        registry.register(InstanceId::new("old"), def.clone());
        registry.register(InstanceId::new("new"), def.clone());

        assert_eq!(registry.instance_of(&def).unwrap().as_str(), "new");
    }

    #[test]
    fn unregister_is_idempotent_and_precise() {
        let mut registry = LiveRegistry::new();
        let def = DefinitionId::new("button.basic");
        registry.register(InstanceId::new("old"), def.clone());
        registry.register(InstanceId::new("new"), def.clone());

        // Removing the superseded instance must not break the current one.
        registry.unregister(&InstanceId::new("old"));
        registry.unregister(&InstanceId::new("old"));
        assert_eq!(registry.instance_of(&def).unwrap().as_str(), "new");
        assert_eq!(registry.len(), 1);

        registry.unregister(&InstanceId::new("new"));
        assert!(registry.is_empty());
        assert!(registry.instance_of(&def).is_none());
    }
}
