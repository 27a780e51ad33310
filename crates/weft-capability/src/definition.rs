//! Capability definitions.
//!
//! A capability is a named, directional message contract: the id names
//! it (`domain.action`), the direction says whether a widget consumes or
//! produces it, and the payload lists the fields a conforming value
//! carries. Type compatibility established from these shapes is
//! advisory — it informs editor tooling and is never enforced at
//! delivery time.

use serde::{Deserialize, Serialize};

/// Whether a capability is consumed or produced by its declaring widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// The widget consumes messages of this shape.
    Input,
    /// The widget produces messages of this shape.
    Output,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
        }
    }
}

/// One named, typed field of a capability payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadField {
    /// Field name.
    pub name: String,
    /// Declared type tag (`string`, `number`, `boolean`, `object`, …).
    #[serde(rename = "type")]
    pub field_type: String,
    /// Whether a conforming value must carry this field.
    #[serde(default)]
    pub required: bool,
}

impl PayloadField {
    /// Creates a required field.
    #[must_use]
    pub fn required(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            required: true,
        }
    }

    /// Creates an optional field.
    #[must_use]
    pub fn optional(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            required: false,
        }
    }
}

/// A named, directional message contract.
///
/// Standard capabilities are seeded into the registry at construction;
/// custom ones arrive with individual widget manifests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityDefinition {
    /// Namespaced id, conventionally `domain.action` (e.g. `text.set`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// One-line description for editor tooling.
    #[serde(default)]
    pub description: String,
    /// Message direction relative to the declaring widget.
    pub direction: Direction,
    /// Ordered payload fields.
    #[serde(default)]
    pub payload: Vec<PayloadField>,
    /// Semantic tags used for port suggestion (`"text"`, `"audio"`, …).
    #[serde(default)]
    pub entity_types: Vec<String>,
}

impl CapabilityDefinition {
    /// Returns the `domain` half of a `domain.action` id, when present.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        namespace_of(&self.id)
    }

    /// Returns the `action` half of a `domain.action` id, when present.
    #[must_use]
    pub fn action(&self) -> Option<&str> {
        self.id.split_once('.').map(|(_, action)| action)
    }
}

/// Returns the `domain` half of a `domain.action` id, when present.
#[must_use]
pub fn namespace_of(id: &str) -> Option<&str> {
    id.split_once('.').map(|(ns, _)| ns)
}

/// Checks the `domain.action` naming convention.
///
/// Exactly one dot, non-empty halves, lowercase alphanumerics with
/// hyphens. Ids that fail this produce a validation warning, never an
/// error.
#[must_use]
pub fn is_well_formed_id(id: &str) -> bool {
    let Some((domain, action)) = id.split_once('.') else {
        return false;
    };
    let half_ok = |s: &str| {
        !s.is_empty()
            && !s.contains('.')
            && s.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    };
    half_ok(domain) && half_ok(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_and_action_split() {
        let cap = CapabilityDefinition {
            id: "text.set".into(),
            name: "Set Text".into(),
            description: String::new(),
            direction: Direction::Input,
            payload: vec![PayloadField::required("value", "string")],
            entity_types: vec!["text".into()],
        };

        assert_eq!(cap.namespace(), Some("text"));
        assert_eq!(cap.action(), Some("set"));
    }

    #[test]
    fn well_formed_ids() {
        assert!(is_well_formed_id("text.set"));
        assert!(is_well_formed_id("audio.beat-detected"));
        assert!(!is_well_formed_id("noseparator"));
        assert!(!is_well_formed_id("too.many.dots"));
        assert!(!is_well_formed_id(".action"));
        assert!(!is_well_formed_id("Domain.Action"));
    }

    #[test]
    fn payload_field_type_serializes_as_type() {
        let field = PayloadField::required("value", "string");
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "string");
        assert_eq!(json["required"], true);
    }

    #[test]
    fn direction_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Direction::Input).unwrap(), "\"input\"");
        assert_eq!(serde_json::to_string(&Direction::Output).unwrap(), "\"output\"");
    }
}
