//! Identifier types for Weft.
//!
//! Widgets live in two identity spaces:
//!
//! - [`DefinitionId`] — stable design-time identity (`button.basic`).
//!   Survives sessions; pipelines authored in an editor usually carry it.
//! - [`InstanceId`] — disposable runtime identity of one mounted sandbox.
//!   Recreated every session; the boundary protocol always carries it.
//!
//! All identifiers are string newtypes rather than UUIDs because authored
//! pipeline documents reference widgets with free-form strings from either
//! space. [`InstanceId::generate`] appends a UUID v4 so generated ids are
//! distinguishable from authored definition ids (see
//! [`InstanceId::looks_generated`]).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps a raw string identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

string_id! {
    /// Runtime identity of a mounted widget sandbox.
    ///
    /// One `InstanceId` maps to exactly one live mount point. A widget
    /// re-created across sessions receives a fresh instance id; only its
    /// [`DefinitionId`] is stable.
    ///
    /// # Example
    ///
    /// ```
    /// use weft_types::{DefinitionId, InstanceId};
    ///
    /// let def = DefinitionId::new("button.basic");
    /// let a = InstanceId::generate(&def);
    /// let b = InstanceId::generate(&def);
    /// assert_ne!(a, b);
    /// assert!(a.looks_generated());
    /// ```
    InstanceId, "widget"
}

string_id! {
    /// Stable design-time widget identity, conventionally `domain.name`.
    DefinitionId, "def"
}

string_id! {
    /// Identifier for a saved pipeline graph.
    PipelineId, "pipeline"
}

string_id! {
    /// Graph-local node identifier within one pipeline.
    NodeId, "node"
}

string_id! {
    /// Identifier for a directed wire between two pipeline nodes.
    ConnectionId, "conn"
}

string_id! {
    /// Named input or output port on a widget.
    PortName, "port"
}

impl InstanceId {
    /// Generates a fresh instance id for a definition.
    ///
    /// The format is `{definition}-{uuid}`, so generated ids always
    /// carry a UUID v4 suffix and satisfy [`looks_generated`](Self::looks_generated).
    #[must_use]
    pub fn generate(definition: &DefinitionId) -> Self {
        Self(format!("{}-{}", definition.as_str(), Uuid::new_v4()))
    }

    /// Heuristic: does this id look like a generated instance id?
    ///
    /// Generated ids end in a UUID v4 (four hyphens in the suffix alone),
    /// while authored definition ids (`button.basic`) rarely contain any.
    /// This is a last-resort disambiguator for pipeline nodes that carry
    /// no explicit identity-space tag; two spaces can still collide in
    /// format, so callers must treat a negative as "probably a definition
    /// id", never as proof.
    #[must_use]
    pub fn looks_generated(&self) -> bool {
        self.0.split('-').count() >= 5
    }
}

impl ConnectionId {
    /// Synthetic connection id used for manifest-declared broadcast
    /// deliveries (no explicit wire exists).
    #[must_use]
    pub fn broadcast(event_type: &str) -> Self {
        Self(format!("broadcast:{event_type}"))
    }
}

/// Identifier for one canvas; every router instance is scoped to one.
///
/// The reserved [`CanvasId::DEFAULT`] id is accepted by every router so
/// that pipelines can be reused across contexts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanvasId(String);

impl CanvasId {
    /// The reserved cross-context canvas id.
    pub const DEFAULT: &'static str = "default";

    /// Wraps a raw canvas identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the reserved default canvas id.
    #[must_use]
    pub fn default_canvas() -> Self {
        Self(Self::DEFAULT.to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the reserved cross-context id.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.0 == Self::DEFAULT
    }
}

impl From<&str> for CanvasId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for CanvasId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "canvas:{}", self.0)
    }
}
