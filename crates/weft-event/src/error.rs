//! Event layer errors.
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`EventError::MalformedPayload`] | `EVENT_MALFORMED_PAYLOAD` | No |

use thiserror::Error;
use weft_types::ErrorCode;

/// Event layer error.
#[derive(Debug, Clone, Error)]
pub enum EventError {
    /// A payload did not match its typed contract.
    ///
    /// Retrying will not help; the emitter is sending the wrong shape.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

impl ErrorCode for EventError {
    fn code(&self) -> &'static str {
        match self {
            Self::MalformedPayload(_) => "EVENT_MALFORMED_PAYLOAD",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_types::assert_error_codes;

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&[EventError::MalformedPayload("x".into())], "EVENT_");
    }
}
