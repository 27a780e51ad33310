//! Pipeline router errors.
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`RouterError::CanvasMismatch`] | `ROUTER_CANVAS_MISMATCH` | No |
//!
//! Only the single-pipeline mutation API returns errors. Bulk loading
//! skips foreign pipelines with a warning, and the routing hot path is
//! infallible: stale data degrades to zero deliveries, never to a
//! failure.

use thiserror::Error;
use weft_types::{CanvasId, ErrorCode, PipelineId};

/// Pipeline router error.
#[derive(Debug, Clone, Error)]
pub enum RouterError {
    /// A pipeline belongs to a different canvas than this router.
    #[error("pipeline '{pipeline}' belongs to canvas '{actual}', router owns '{expected}'")]
    CanvasMismatch {
        /// The rejected pipeline.
        pipeline: PipelineId,
        /// This router's canvas.
        expected: CanvasId,
        /// The pipeline's canvas.
        actual: CanvasId,
    },
}

impl ErrorCode for RouterError {
    fn code(&self) -> &'static str {
        match self {
            Self::CanvasMismatch { .. } => "ROUTER_CANVAS_MISMATCH",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
