//! Pipeline-graph routing.
//!
//! The router owns the graph of pipelines for one canvas and turns
//! `widget:output` emissions into `widget:input` deliveries: explicit
//! point-to-point wires first, then manifest-declared broadcast
//! listeners. See [`PipelineRouter`].

mod broadcast;
mod error;
mod index;
mod pipeline;
mod resolver;
#[allow(clippy::module_inception)]
mod router;

pub use error::RouterError;
pub use pipeline::{Connection, Endpoint, Node, NodeKind, Pipeline};
pub use resolver::{LiveRegistry, Resolution};
pub use router::PipelineRouter;
