//! The capability registry.
//!
//! A host-wide catalog: standard capabilities pre-seeded at
//! construction, custom ones added as widgets register. Two consumers:
//!
//! - **Declaration scanning** — the cached [`WidgetDeclaration`] view of
//!   a registered manifest, computed lazily and invalidated on
//!   re-registration.
//! - **Compatibility reasoning** — which ports of two widgets could be
//!   wired together, and what would unblock an impossible wire.
//!
//! The registry never enforces anything at runtime; its validation and
//! analysis APIs exist to report problems to authoring tooling.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::{debug, warn};
use weft_types::DefinitionId;

use crate::catalog::standard_capabilities;
use crate::compat::{
    score_pair, similarity, ConnectionMatch, GapAnalysis, GapSide, GapSuggestion,
};
use crate::declaration::{CapabilityDeclaration, WidgetDeclaration};
use crate::definition::{CapabilityDefinition, Direction};
use crate::error::CapabilityError;
use crate::validate::{validate_declaration, ValidationReport};

/// A registered widget manifest.
#[derive(Debug, Clone)]
struct RegisteredWidget {
    name: String,
    declaration: CapabilityDeclaration,
}

/// Host-wide capability catalog and per-widget declaration scanner.
///
/// # Example
///
/// ```
/// use weft_capability::{CapabilityDeclaration, CapabilityRegistry};
/// use weft_types::DefinitionId;
///
/// let registry = CapabilityRegistry::new();
/// let decl = CapabilityDeclaration {
///     inputs: vec!["color.set".into()],
///     outputs: vec!["color.changed".into()],
///     ..Default::default()
/// };
///
/// let report = registry.register_widget(DefinitionId::new("paint.swatch"), "Swatch", decl);
/// assert!(report.is_ok());
///
/// let scan = registry.declaration(&DefinitionId::new("paint.swatch")).unwrap();
/// assert_eq!(scan.inputs, vec!["color.set"]);
/// ```
pub struct CapabilityRegistry {
    standard: HashMap<String, CapabilityDefinition>,
    custom: RwLock<HashMap<String, CapabilityDefinition>>,
    widgets: RwLock<HashMap<DefinitionId, RegisteredWidget>>,
    scans: RwLock<HashMap<DefinitionId, WidgetDeclaration>>,
}

impl CapabilityRegistry {
    /// Creates a registry seeded with the standard catalog.
    #[must_use]
    pub fn new() -> Self {
        let standard = standard_capabilities()
            .into_iter()
            .map(|cap| (cap.id.clone(), cap))
            .collect();

        Self {
            standard,
            custom: RwLock::new(HashMap::new()),
            widgets: RwLock::new(HashMap::new()),
            scans: RwLock::new(HashMap::new()),
        }
    }

    /// Registers (or re-registers) a widget manifest.
    ///
    /// Custom capabilities are added to the catalog, the cached scan is
    /// invalidated, and the returned [`ValidationReport`] carries any
    /// direction mismatches (errors) or naming problems (warnings).
    /// Registration always succeeds — enforcement is the caller's
    /// decision, per the authoring-tool contract.
    pub fn register_widget(
        &self,
        widget_id: DefinitionId,
        widget_name: impl Into<String>,
        declaration: CapabilityDeclaration,
    ) -> ValidationReport {
        let report = self.validate_capability_declaration(&declaration);
        for issue in &report.issues {
            warn!(widget = %widget_id, kind = %issue.kind, "manifest declaration issue: {}", issue.message);
        }

        {
            let mut custom = self.custom.write();
            for cap in declaration
                .custom_inputs
                .iter()
                .chain(&declaration.custom_outputs)
            {
                custom.insert(cap.id.clone(), cap.clone());
            }
        }

        self.scans.write().remove(&widget_id);
        self.widgets.write().insert(
            widget_id.clone(),
            RegisteredWidget {
                name: widget_name.into(),
                declaration,
            },
        );
        debug!(widget = %widget_id, "widget manifest registered");

        report
    }

    /// Removes a widget manifest and its cached scan. Idempotent.
    pub fn unregister_widget(&self, widget_id: &DefinitionId) {
        self.widgets.write().remove(widget_id);
        self.scans.write().remove(widget_id);
    }

    /// Returns the cached declaration scan for a widget, computing it
    /// on first query.
    ///
    /// Returns `None` for unregistered widgets.
    #[must_use]
    pub fn declaration(&self, widget_id: &DefinitionId) -> Option<WidgetDeclaration> {
        if let Some(scan) = self.scans.read().get(widget_id) {
            return Some(scan.clone());
        }

        let scan = {
            let widgets = self.widgets.read();
            let widget = widgets.get(widget_id)?;
            self.scan(widget_id, widget)
        };

        self.scans
            .write()
            .entry(widget_id.clone())
            .or_insert_with(|| scan.clone());
        Some(scan)
    }

    fn scan(&self, widget_id: &DefinitionId, widget: &RegisteredWidget) -> WidgetDeclaration {
        let decl = &widget.declaration;
        let mut suggested_inputs = Vec::new();
        let mut suggested_outputs = Vec::new();

        // Ports are suggested only when the manifest declares none and
        // carries semantic tags instead.
        if decl.has_no_explicit_ports() && !decl.entity_types.is_empty() {
            let custom = self.custom.read();
            for cap in self.standard.values().chain(custom.values()) {
                let tagged = cap
                    .entity_types
                    .iter()
                    .any(|tag| decl.entity_types.contains(tag));
                if !tagged {
                    continue;
                }
                match cap.direction {
                    Direction::Input => suggested_inputs.push(cap.id.clone()),
                    Direction::Output => suggested_outputs.push(cap.id.clone()),
                }
            }
            suggested_inputs.sort();
            suggested_outputs.sort();
        }

        WidgetDeclaration {
            widget_id: widget_id.clone(),
            widget_name: widget.name.clone(),
            inputs: decl.inputs.clone(),
            outputs: decl.outputs.clone(),
            suggested_inputs,
            suggested_outputs,
        }
    }

    /// Looks up a capability definition, customs shadowing the catalog.
    #[must_use]
    pub fn capability(&self, id: &str) -> Option<CapabilityDefinition> {
        if let Some(cap) = self.custom.read().get(id) {
            return Some(cap.clone());
        }
        self.standard.get(id).cloned()
    }

    /// Validates a manifest capability block for internal consistency.
    ///
    /// Warnings never block registration; errors indicate a
    /// self-contradictory manifest and are surfaced for tooling to act on.
    #[must_use]
    pub fn validate_capability_declaration(
        &self,
        declaration: &CapabilityDeclaration,
    ) -> ValidationReport {
        let known = |id: &str| self.standard.contains_key(id) || self.custom.read().contains_key(id);
        validate_declaration(declaration, &known)
    }

    /// Enumerates every compatible `(output, input)` pair between two
    /// widgets, in both directions, ordered by descending confidence.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::UnknownWidget`] when either widget has
    /// no registered manifest.
    pub fn find_compatible_connections(
        &self,
        a: &DefinitionId,
        b: &DefinitionId,
    ) -> Result<Vec<ConnectionMatch>, CapabilityError> {
        let decl_a = self
            .declaration(a)
            .ok_or_else(|| CapabilityError::UnknownWidget(a.clone()))?;
        let decl_b = self
            .declaration(b)
            .ok_or_else(|| CapabilityError::UnknownWidget(b.clone()))?;

        let mut matches = Vec::new();
        self.collect_matches(&decl_a, &decl_b, &mut matches);
        self.collect_matches(&decl_b, &decl_a, &mut matches);

        matches.sort_by(|x, y| y.confidence.total_cmp(&x.confidence));
        Ok(matches)
    }

    fn collect_matches(
        &self,
        source: &WidgetDeclaration,
        target: &WidgetDeclaration,
        out: &mut Vec<ConnectionMatch>,
    ) {
        for output in source.effective_outputs() {
            for input in target.effective_inputs() {
                let output_def = self.capability(output);
                let input_def = self.capability(input);
                if let Some((confidence, reason)) =
                    score_pair(output, input, output_def.as_ref(), input_def.as_ref())
                {
                    out.push(ConnectionMatch {
                        source: source.widget_id.clone(),
                        source_port: output.to_string(),
                        target: target.widget_id.clone(),
                        target_port: input.to_string(),
                        confidence,
                        reason,
                    });
                }
            }
        }
    }

    /// Analyzes one hypothetical wire between two widgets' ports.
    ///
    /// When the wire is impossible, the analysis names the side missing
    /// its declared capability and ranks the closest existing
    /// capabilities that would make the wire possible.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::UnknownWidget`] when either widget has
    /// no registered manifest.
    pub fn analyze_capability_gap(
        &self,
        source: &DefinitionId,
        source_port: &str,
        target: &DefinitionId,
        target_port: &str,
    ) -> Result<GapAnalysis, CapabilityError> {
        let decl_source = self
            .declaration(source)
            .ok_or_else(|| CapabilityError::UnknownWidget(source.clone()))?;
        let decl_target = self
            .declaration(target)
            .ok_or_else(|| CapabilityError::UnknownWidget(target.clone()))?;

        let has_output = decl_source
            .effective_outputs()
            .iter()
            .any(|p| *p == source_port);
        let has_input = decl_target
            .effective_inputs()
            .iter()
            .any(|p| *p == target_port);

        if !has_output {
            return Ok(GapAnalysis {
                possible: false,
                confidence: 0.0,
                missing: Some(GapSide::Source),
                suggestions: self.rank_alternatives(source_port, Direction::Output),
            });
        }
        if !has_input {
            return Ok(GapAnalysis {
                possible: false,
                confidence: 0.0,
                missing: Some(GapSide::Target),
                suggestions: self.rank_alternatives(target_port, Direction::Input),
            });
        }

        let output_def = self.capability(source_port);
        let input_def = self.capability(target_port);
        let scored = score_pair(
            source_port,
            target_port,
            output_def.as_ref(),
            input_def.as_ref(),
        );

        Ok(match scored {
            Some((confidence, _)) => GapAnalysis {
                possible: true,
                confidence,
                missing: None,
                suggestions: Vec::new(),
            },
            None => GapAnalysis {
                possible: false,
                confidence: 0.0,
                missing: None,
                suggestions: self.rank_alternatives(target_port, Direction::Input),
            },
        })
    }

    fn rank_alternatives(&self, port: &str, direction: Direction) -> Vec<GapSuggestion> {
        let custom = self.custom.read();
        let mut ranked: Vec<GapSuggestion> = self
            .standard
            .values()
            .chain(custom.values())
            .filter(|cap| cap.direction == direction)
            .map(|cap| GapSuggestion {
                capability_id: cap.id.clone(),
                score: similarity(port, &cap.id),
            })
            .filter(|s| s.score > 0.0)
            .collect();

        ranked.sort_by(|x, y| y.score.total_cmp(&x.score));
        ranked.truncate(5);
        ranked
    }

    /// Number of registered widget manifests.
    #[must_use]
    pub fn widget_count(&self) -> usize {
        self.widgets.read().len()
    }

    /// Ids of the standard catalog, sorted.
    #[must_use]
    pub fn standard_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.standard.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}
