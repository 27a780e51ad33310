//! Event-type patterns for broadcast listeners.
//!
//! A widget's manifest may declare interest in event types without an
//! explicit point-to-point wire. Three pattern forms exist:
//!
//! | Declared | Parsed as | Matches |
//! |----------|-----------|---------|
//! | `audio:beat-detected` | [`EventPattern::Exact`] | that type only |
//! | `audio:*` | [`EventPattern::Namespace`] | any `audio:…` type |
//! | `*` | [`EventPattern::Any`] | every type |

use serde::{Deserialize, Serialize};

/// A parsed event-type pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventPattern {
    /// Exact event-type name.
    Exact(String),
    /// Every event type in one `ns:` namespace.
    Namespace(String),
    /// The global wildcard.
    Any,
}

impl EventPattern {
    /// Parses a declared pattern string.
    ///
    /// `"*"` is the global wildcard, `"ns:*"` a namespace wildcard, and
    /// anything else an exact type name.
    ///
    /// # Example
    ///
    /// ```
    /// use weft_event::EventPattern;
    ///
    /// assert_eq!(EventPattern::parse("*"), EventPattern::Any);
    /// assert_eq!(
    ///     EventPattern::parse("audio:*"),
    ///     EventPattern::Namespace("audio".into())
    /// );
    /// assert_eq!(
    ///     EventPattern::parse("color.set"),
    ///     EventPattern::Exact("color.set".into())
    /// );
    /// ```
    #[must_use]
    pub fn parse(pattern: &str) -> Self {
        if pattern == "*" {
            return Self::Any;
        }
        if let Some(ns) = pattern.strip_suffix(":*") {
            if !ns.is_empty() {
                return Self::Namespace(ns.to_string());
            }
        }
        Self::Exact(pattern.to_string())
    }

    /// Returns `true` when the pattern matches an event type.
    ///
    /// Namespace patterns match on the `:`-delimited prefix:
    /// `audio:*` matches `audio:beat-detected` but not `audio` alone
    /// and not `video:frame`.
    #[must_use]
    pub fn matches(&self, event_type: &str) -> bool {
        match self {
            Self::Exact(name) => name == event_type,
            Self::Namespace(ns) => event_type
                .split_once(':')
                .is_some_and(|(prefix, _)| prefix == ns),
            Self::Any => true,
        }
    }
}

impl std::fmt::Display for EventPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(name) => write!(f, "{name}"),
            Self::Namespace(ns) => write!(f, "{ns}:*"),
            Self::Any => write!(f, "*"),
        }
    }
}
