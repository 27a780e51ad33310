//! Capability layer errors.
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`CapabilityError::UnknownWidget`] | `CAP_UNKNOWN_WIDGET` | Yes |

use thiserror::Error;
use weft_types::{DefinitionId, ErrorCode};

/// Capability registry error.
///
/// Only the analysis APIs return errors; registration and validation
/// always succeed and report through [`ValidationReport`](crate::ValidationReport).
#[derive(Debug, Clone, Error)]
pub enum CapabilityError {
    /// The widget has no registered manifest.
    ///
    /// Recoverable: registering the widget first makes the query valid.
    #[error("no registered manifest for widget: {0}")]
    UnknownWidget(DefinitionId),
}

impl ErrorCode for CapabilityError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownWidget(_) => "CAP_UNKNOWN_WIDGET",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnknownWidget(_))
    }
}
