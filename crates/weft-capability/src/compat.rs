//! Connection compatibility reasoning.
//!
//! Two judgments live here:
//!
//! - [`score_pair`] — can a given output capability feed a given input
//!   capability, and with what confidence?
//! - [`similarity`] — how close are two capability ids, for ranking
//!   alternatives when a hypothetical wire is impossible?
//!
//! Both are advisory. The router performs no compatibility checks at
//! delivery time; these scores exist for editor tooling.

use serde::{Deserialize, Serialize};
use weft_types::DefinitionId;

use crate::definition::CapabilityDefinition;

/// Why a pair of capabilities was judged compatible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchReason {
    /// Output and input declare the same capability id.
    ExactId,
    /// Same `domain.` namespace with a compatible payload shape.
    SharedNamespace,
}

/// One compatible `(output, input)` pair between two widgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionMatch {
    /// Widget producing the value.
    pub source: DefinitionId,
    /// Output capability id on the source.
    pub source_port: String,
    /// Widget consuming the value.
    pub target: DefinitionId,
    /// Input capability id on the target.
    pub target_port: String,
    /// Confidence in `(0, 1]`, higher is better.
    pub confidence: f32,
    /// Why the pair matched.
    pub reason: MatchReason,
}

/// Which side of a hypothetical wire lacks the declared capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapSide {
    /// The source widget does not declare the output port.
    Source,
    /// The target widget does not declare the input port.
    Target,
}

/// A ranked alternative that would make an impossible wire possible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapSuggestion {
    /// Existing capability id the widget could declare or switch to.
    pub capability_id: String,
    /// Similarity to the missing port, in `[0, 1]`.
    pub score: f32,
}

/// Result of analyzing one hypothetical wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapAnalysis {
    /// Whether the wire is possible as declared.
    pub possible: bool,
    /// Confidence of the pairing when possible, `0.0` otherwise.
    pub confidence: f32,
    /// The side missing its capability, when the wire is impossible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing: Option<GapSide>,
    /// Closest existing capabilities that would unblock the wire,
    /// best first.
    #[serde(default)]
    pub suggestions: Vec<GapSuggestion>,
}

/// Scores an `(output, input)` capability pairing.
///
/// Returns `None` when the pair is incompatible. Definitions may be
/// absent for ids the registry has never seen; scoring degrades to
/// id-level heuristics in that case.
#[must_use]
pub fn score_pair(
    output_id: &str,
    input_id: &str,
    output_def: Option<&CapabilityDefinition>,
    input_def: Option<&CapabilityDefinition>,
) -> Option<(f32, MatchReason)> {
    if output_id == input_id {
        // Exact id match is the strongest signal; shape is identical
        // by definition when both resolve to the same capability.
        return Some((1.0, MatchReason::ExactId));
    }

    let out_ns = output_id.split_once('.').map(|(ns, _)| ns)?;
    let in_ns = input_id.split_once('.').map(|(ns, _)| ns)?;
    if out_ns != in_ns {
        return None;
    }

    match (output_def, input_def) {
        (Some(out), Some(inp)) => {
            if payload_satisfies(out, inp) {
                Some((0.8, MatchReason::SharedNamespace))
            } else {
                None
            }
        }
        // One or both sides unknown: namespace agreement alone is a
        // weak but usable signal for tooling.
        _ => Some((0.4, MatchReason::SharedNamespace)),
    }
}

/// Checks whether the output's payload shape satisfies every required
/// input field (name and type both matching).
fn payload_satisfies(output: &CapabilityDefinition, input: &CapabilityDefinition) -> bool {
    input
        .payload
        .iter()
        .filter(|field| field.required)
        .all(|field| {
            output
                .payload
                .iter()
                .any(|f| f.name == field.name && f.field_type == field.field_type)
        })
}

/// Token-level similarity between two capability ids, in `[0, 1]`.
///
/// Exact match is `1.0`; ids sharing a namespace score `0.6` plus a
/// token-overlap bonus; unrelated ids score by overall token overlap
/// alone. Used to rank gap suggestions.
#[must_use]
pub fn similarity(a: &str, b: &str) -> f32 {
    if a == b {
        return 1.0;
    }

    let ns = |id: &str| id.split_once('.').map(|(ns, _)| ns.to_string());
    let tokens = |id: &str| -> Vec<String> {
        id.split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_ascii_lowercase)
            .collect()
    };

    let overlap = {
        let ta = tokens(a);
        let tb = tokens(b);
        if ta.is_empty() || tb.is_empty() {
            0.0
        } else {
            let shared = ta.iter().filter(|t| tb.contains(t)).count();
            let union = ta.len() + tb.len() - shared;
            shared as f32 / union as f32
        }
    };

    match (ns(a), ns(b)) {
        (Some(na), Some(nb)) if na == nb => 0.6 + 0.4 * overlap,
        _ => 0.3 * overlap,
    }
}
