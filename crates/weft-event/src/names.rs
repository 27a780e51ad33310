//! The bus event-type surface.
//!
//! External collaborators (canvas UI, widget host, telemetry panel)
//! subscribe to these names verbatim. Renaming any constant is a
//! breaking change to every consumer.
//!
//! | Constant | Emitted by | Meaning |
//! |----------|-----------|---------|
//! | [`WIDGET_OUTPUT`] | bridge | a sandbox emitted a named output |
//! | [`WIDGET_INPUT`] | router | a delivery addressed to one widget |
//! | [`WIDGET_READY`] | bridge | sandbox finished booting |
//! | [`WIDGET_ERROR`] | bridge | sandbox reported a failure |
//! | [`WIDGET_STATE_CHANGED`] | host | a widget's state patch |
//! | [`PIPELINE_LOADED`] | router | pipelines replaced atomically |
//! | [`PIPELINE_UPDATED`] | router | one pipeline re-indexed |
//! | [`PIPELINE_REMOVED`] | router | one pipeline dropped |
//! | [`PIPELINE_ACTIVITY`] | router | one routed delivery (telemetry) |
//! | [`PIPELINE_DESTROYED`] | router | router state torn down |
//! | [`DEBUG_MESSAGE`] | bridge | sandbox log line surfaced to tooling |

/// A sandboxed widget emitted a named output signal.
pub const WIDGET_OUTPUT: &str = "widget:output";

/// A routed delivery addressed to a single widget's input port.
pub const WIDGET_INPUT: &str = "widget:input";

/// A sandbox finished booting and can receive config.
pub const WIDGET_READY: &str = "widget:ready";

/// A sandbox reported an error.
pub const WIDGET_ERROR: &str = "widget:error";

/// A widget's state patch; each changed key routes as an output.
pub const WIDGET_STATE_CHANGED: &str = "widget:stateChanged";

/// Router replaced its pipeline set atomically.
pub const PIPELINE_LOADED: &str = "pipeline:loaded";

/// Router re-indexed a single pipeline.
pub const PIPELINE_UPDATED: &str = "pipeline:updated";

/// Router removed a single pipeline.
pub const PIPELINE_REMOVED: &str = "pipeline:removed";

/// One routed delivery occurred (telemetry).
pub const PIPELINE_ACTIVITY: &str = "pipeline:activity";

/// Router state was torn down.
pub const PIPELINE_DESTROYED: &str = "pipeline:destroyed";

/// Sandbox log line surfaced to host tooling; never re-broadcast.
pub const DEBUG_MESSAGE: &str = "debug:message";
