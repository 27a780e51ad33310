//! Weft runtime - event bus, sandbox boundary bridge, pipeline router.
//!
//! This crate is the runtime layer of the Weft widget platform: it
//! safely delivers events between isolated widget sandboxes without
//! letting any one widget crash or spy on another.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     SDK Layer                               │
//! │  weft-types      : identifiers, ErrorCode                   │
//! │  weft-event      : Event, names, patterns, payloads         │
//! │  weft-capability : capability catalog + registry            │
//! ├─────────────────────────────────────────────────────────────┤
//! │                 Runtime Layer (THIS CRATE)                  │
//! │  bus       : EventBus - synchronous typed pub/sub           │
//! │  bridge/   : BoundaryBridge, MountHandle, wire protocol     │
//! │  router/   : PipelineRouter, pipelines, live registry       │
//! │  config/   : WeftConfig, ConfigLoader                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Data Flow
//!
//! A widget in an isolated sandbox emits a named output → the
//! [`BoundaryBridge`] validates the message's source and publishes a
//! `widget:output` bus event → the [`PipelineRouter`] matches it
//! against loaded pipeline graphs and manifest-declared broadcast
//! listeners, resolves each target's live runtime identity, and
//! publishes one `widget:input` event per delivery → the bridge
//! forwards each input to the target's mount.
//!
//! # Concurrency Model
//!
//! One logical thread of execution per host: nothing in the bus,
//! router, or capability registry blocks or suspends — all are
//! synchronous state transitions over in-memory indices. The only
//! asynchrony is at the bridge's edges (sandbox message arrival is
//! unordered across widgets) and in the broadcast dedupe window.
//! Events from the *same* source route in emission order; no ordering
//! holds across sources.
//!
//! # Example
//!
//! ```
//! use weft_runtime::{BoundaryBridge, EventBus, PipelineRouter, WeftConfig};
//! use weft_types::CanvasId;
//!
//! let config = WeftConfig::default();
//! let bus = EventBus::new();
//! let bridge = BoundaryBridge::new(bus.clone());
//! let router = PipelineRouter::new(CanvasId::new("canvas-1"), bus, &config.router);
//!
//! // ... register widgets, load pipelines, pump sandbox messages ...
//!
//! router.destroy();
//! bridge.destroy();
//! ```

mod bridge;
mod bus;
pub mod config;
mod router;

pub use bridge::{
    BoundaryBridge, BridgeError, InboundMessage, InputSource, MountHandle, OutboundMessage,
};
pub use bridge::protocol;
pub use bus::{EventBus, Subscription, WILDCARD};
pub use config::{BridgeConfig, ConfigError, ConfigLoader, RouterConfig, WeftConfig};
pub use router::{
    Connection, Endpoint, LiveRegistry, Node, NodeKind, Pipeline, PipelineRouter, Resolution,
    RouterError,
};
