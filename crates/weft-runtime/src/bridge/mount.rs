//! Mount handles - boundary endpoints for reaching a sandbox.
//!
//! A [`MountHandle`] wraps the sending half of the structured-message
//! channel into one widget sandbox. The bridge holds one handle per
//! registered instance; the sandbox host owns the receiving half and
//! pumps messages across the real isolation boundary.

use tokio::sync::mpsc;
use weft_types::InstanceId;

use super::error::BridgeError;
use super::protocol::OutboundMessage;

/// Sending endpoint for one widget sandbox.
///
/// Cloneable; all clones feed the same sandbox channel.
#[derive(Debug, Clone)]
pub struct MountHandle {
    instance_id: InstanceId,
    sender: mpsc::Sender<OutboundMessage>,
}

impl MountHandle {
    /// Wraps an existing channel sender.
    #[must_use]
    pub fn new(instance_id: InstanceId, sender: mpsc::Sender<OutboundMessage>) -> Self {
        Self { instance_id, sender }
    }

    /// Creates a handle and its receiving half with the given buffer.
    #[must_use]
    pub fn channel(
        instance_id: InstanceId,
        buffer: usize,
    ) -> (Self, mpsc::Receiver<OutboundMessage>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self::new(instance_id, tx), rx)
    }

    /// The instance this handle reaches.
    #[must_use]
    pub fn instance_id(&self) -> &InstanceId {
        &self.instance_id
    }

    /// Posts a message without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::SendFailed`] when the channel buffer is
    /// full (recoverable — the sandbox may drain it) or closed (the
    /// sandbox unmounted mid-flight).
    pub fn try_send(&self, message: OutboundMessage) -> Result<(), BridgeError> {
        self.sender.try_send(message).map_err(|e| {
            let reason = match e {
                mpsc::error::TrySendError::Full(_) => "buffer full",
                mpsc::error::TrySendError::Closed(_) => "channel closed",
            };
            BridgeError::SendFailed {
                widget: self.instance_id.clone(),
                reason: reason.to_string(),
            }
        })
    }

    /// Posts a message, waiting for buffer space.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::SendFailed`] when the channel is closed.
    pub async fn send(&self, message: OutboundMessage) -> Result<(), BridgeError> {
        self.sender
            .send(message)
            .await
            .map_err(|_| BridgeError::SendFailed {
                widget: self.instance_id.clone(),
                reason: "channel closed".to_string(),
            })
    }

    /// `true` when the sandbox side has dropped its receiver.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
