//! Capability catalog and registry for the Weft widget platform.
//!
//! A *capability* is a named, directional message contract
//! (`text.set`, input, `{value: string}`). Widgets declare the
//! capabilities they consume and produce in their manifests; this crate
//! catalogs those declarations and reasons statically about which
//! widgets *could* be wired together.
//!
//! # Responsibilities
//!
//! ```text
//! manifest ──► CapabilityRegistry::register_widget ──► ValidationReport
//!                        │
//!                        ├── declaration()            cached scan
//!                        ├── find_compatible_connections()
//!                        └── analyze_capability_gap()
//! ```
//!
//! Everything here is advisory: the pipeline router performs no
//! compatibility checks at delivery time. Validation errors and gap
//! analyses exist so authoring tools can block or flag a widget before
//! it ever reaches the runtime.

mod catalog;
mod compat;
mod declaration;
mod definition;
mod error;
mod registry;
mod validate;

pub use catalog::standard_capabilities;
pub use compat::{ConnectionMatch, GapAnalysis, GapSide, GapSuggestion, MatchReason};
pub use declaration::{CapabilityDeclaration, WidgetDeclaration};
pub use definition::{is_well_formed_id, CapabilityDefinition, Direction, PayloadField};
pub use error::CapabilityError;
pub use registry::CapabilityRegistry;
pub use validate::{Severity, ValidationIssue, ValidationReport};
