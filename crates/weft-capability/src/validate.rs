//! Manifest declaration validation.
//!
//! Validation reports problems to authoring tooling; it never blocks
//! registration. Direction mismatches are errors (the manifest is
//! self-contradictory); everything else is at most a warning.
//!
//! | Issue | Severity |
//! |-------|----------|
//! | custom capability direction contradicts its array | error |
//! | custom capability id absent from `inputs`/`outputs` | warning |
//! | non-catalog id not following `domain.action` | warning |

use serde::{Deserialize, Serialize};

use crate::declaration::CapabilityDeclaration;
use crate::definition::{is_well_formed_id, CapabilityDefinition, Direction};

/// How serious a validation issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The manifest is self-contradictory; tooling should block publication.
    Error,
    /// Suspicious but publishable; tooling should flag it.
    Warning,
}

/// One problem found in a capability declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    /// Issue severity.
    pub severity: Severity,
    /// Stable issue kind (`direction-mismatch`, `not-declared`,
    /// `non-standard-id`).
    pub kind: String,
    /// Human-readable explanation.
    pub message: String,
    /// The capability id the issue concerns, when one does.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capability_id: Option<String>,
}

/// Result of validating one manifest declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// All issues found, errors and warnings interleaved in scan order.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Issues with [`Severity::Error`].
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
    }

    /// Issues with [`Severity::Warning`].
    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
    }

    /// `true` when no errors were found (warnings permitted).
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors().next().is_none()
    }

    fn push(
        &mut self,
        severity: Severity,
        kind: &str,
        message: String,
        capability_id: Option<String>,
    ) {
        self.issues.push(ValidationIssue {
            severity,
            kind: kind.to_string(),
            message,
            capability_id,
        });
    }
}

/// Validates a manifest's capability block for internal consistency.
///
/// `known_ids` is the set of capability ids the registry already knows
/// (the standard catalog plus previously registered customs); ids
/// outside it are checked against the `domain.action` convention.
#[must_use]
pub fn validate_declaration(
    decl: &CapabilityDeclaration,
    known_ids: &dyn Fn(&str) -> bool,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    check_customs(
        &mut report,
        &decl.custom_inputs,
        Direction::Input,
        &decl.inputs,
        "inputs",
    );
    check_customs(
        &mut report,
        &decl.custom_outputs,
        Direction::Output,
        &decl.outputs,
        "outputs",
    );

    let custom_ids: Vec<&str> = decl
        .custom_inputs
        .iter()
        .chain(&decl.custom_outputs)
        .map(|c| c.id.as_str())
        .collect();

    for id in decl.inputs.iter().chain(&decl.outputs) {
        if known_ids(id) || custom_ids.contains(&id.as_str()) {
            continue;
        }
        if !is_well_formed_id(id) {
            report.push(
                Severity::Warning,
                "non-standard-id",
                format!("capability id '{id}' does not follow the domain.action convention"),
                Some(id.clone()),
            );
        }
    }

    report
}

fn check_customs(
    report: &mut ValidationReport,
    customs: &[CapabilityDefinition],
    expected: Direction,
    declared: &[String],
    array_name: &str,
) {
    for cap in customs {
        if cap.direction != expected {
            report.push(
                Severity::Error,
                "direction-mismatch",
                format!(
                    "custom capability '{}' declares direction '{}' but sits under custom {}",
                    cap.id, cap.direction, array_name
                ),
                Some(cap.id.clone()),
            );
        }
        if !declared.iter().any(|d| d == &cap.id) {
            report.push(
                Severity::Warning,
                "not-declared",
                format!(
                    "custom capability '{}' is not declared in the {} array",
                    cap.id, array_name
                ),
                Some(cap.id.clone()),
            );
        }
    }
}
