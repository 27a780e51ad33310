//! Sandbox boundary bridge.
//!
//! The bridge is the single enforced isolation boundary in the system:
//! no direct references are ever held from the host into sandbox memory
//! or vice versa. Everything crosses as a structured message
//! ([`protocol`]), carried over a per-widget channel ([`MountHandle`]).
//!
//! See [`BoundaryBridge`] for the host-side endpoint.

#[allow(clippy::module_inception)]
mod bridge;
mod error;
mod mount;
pub mod protocol;

pub use bridge::BoundaryBridge;
pub use error::BridgeError;
pub use mount::MountHandle;
pub use protocol::{InboundMessage, InputSource, OutboundMessage};
