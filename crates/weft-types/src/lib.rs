//! Core types for the Weft widget platform.
//!
//! This crate is the leaf of the workspace: identifier newtypes for the
//! two widget identity spaces and the [`ErrorCode`] convention every
//! other crate's errors implement.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  weft-types      : identifiers, ErrorCode      ◄── HERE     │
//! │  weft-event      : Event, scope, patterns, payloads         │
//! │  weft-capability : capability catalog + registry            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  weft-runtime    : EventBus, BoundaryBridge, PipelineRouter │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Identity Spaces
//!
//! | Type | Space | Lifetime |
//! |------|-------|----------|
//! | [`DefinitionId`] | design-time | stable across sessions |
//! | [`InstanceId`] | runtime | one mount, one session |
//!
//! Pipelines may reference widgets through either space; the runtime's
//! resolver maps between them (see `weft-runtime`).

mod error;
mod id;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::{
    CanvasId, ConnectionId, DefinitionId, InstanceId, NodeId, PipelineId, PortName,
};
