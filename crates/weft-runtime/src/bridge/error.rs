//! Boundary bridge errors.
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`BridgeError::Malformed`] | `BRIDGE_MALFORMED` | No |
//! | [`BridgeError::UnknownOrigin`] | `BRIDGE_UNKNOWN_ORIGIN` | No |
//! | [`BridgeError::NotRegistered`] | `BRIDGE_NOT_REGISTERED` | Yes |
//! | [`BridgeError::SendFailed`] | `BRIDGE_SEND_FAILED` | Yes |
//!
//! These never cross the boundary edge: the bridge absorbs and logs
//! every inbound failure. The types exist for the host-facing send
//! APIs and for tests.

use thiserror::Error;
use weft_types::{ErrorCode, InstanceId};

/// Boundary bridge error.
#[derive(Debug, Clone, Error)]
pub enum BridgeError {
    /// An inbound message lacked a recognized kind or widget id.
    #[error("malformed boundary message: {0}")]
    Malformed(String),

    /// An inbound message's claimed id is unregistered and its true
    /// origin is unknown.
    #[error("message from unregistered widget '{0}' with no known origin")]
    UnknownOrigin(InstanceId),

    /// Outbound delivery targeted an instance with no mount.
    ///
    /// Recoverable: sandboxes mount asynchronously; the instance may
    /// register shortly.
    #[error("no mount registered for widget: {0}")]
    NotRegistered(InstanceId),

    /// The mount channel rejected a message.
    ///
    /// Recoverable when the buffer is merely full; a closed channel
    /// means the sandbox unmounted mid-flight, which is an expected
    /// steady-state condition.
    #[error("send to widget '{widget}' failed: {reason}")]
    SendFailed {
        /// Target widget.
        widget: InstanceId,
        /// Why the channel rejected the message.
        reason: String,
    },
}

impl ErrorCode for BridgeError {
    fn code(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "BRIDGE_MALFORMED",
            Self::UnknownOrigin(_) => "BRIDGE_UNKNOWN_ORIGIN",
            Self::NotRegistered(_) => "BRIDGE_NOT_REGISTERED",
            Self::SendFailed { .. } => "BRIDGE_SEND_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotRegistered(_) | Self::SendFailed { .. })
    }
}
