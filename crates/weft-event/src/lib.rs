//! Event types for the Weft widget platform.
//!
//! This crate defines what crosses the event bus: the [`Event`]
//! envelope, the stable [`names`] surface, [`EventPattern`] matching for
//! broadcast listeners, and the typed [`payload`] contracts the router
//! and bridge exchange.
//!
//! # Event Flow
//!
//! ```text
//! ┌──────────┐ boundary msg ┌──────────┐ widget:output ┌──────────┐
//! │ Sandbox  │ ───────────► │  Bridge  │ ────────────► │  Router  │
//! └──────────┘              └──────────┘               └──────────┘
//!       ▲                        │ widget:input              │
//!       └────────────────────────┴───────────────────────────┘
//! ```
//!
//! The bus (in `weft-runtime`) delivers synchronously in subscription
//! order; this crate carries no behavior beyond parsing and matching.

mod error;
mod event;
pub mod names;
mod pattern;
pub mod payload;

pub use error::EventError;
pub use event::{Event, EventScope};
pub use pattern::EventPattern;
pub use payload::{ActivityPayload, InputPayload, OutputPayload, StateChangePayload};
