//! PipelineRouter - the routing core.
//!
//! One router owns one canvas's routing state: loaded pipelines with
//! their indices, the live widget registration map, and the broadcast
//! listener set. No two routers share mutable state, which eliminates
//! cross-canvas races by construction.
//!
//! # State Machine
//!
//! ```text
//! Unloaded ──load_pipelines──► Loaded ──register_widget──► Loaded+Live
//!     ▲                                                        │
//!     └──────────────────────destroy──────────────────────────┘
//! ```
//!
//! # Routing
//!
//! ```text
//! widget:output (instance, port, value)
//!     │
//!     ├─ per enabled pipeline: source node (instance → definition →
//!     │  label scan), connections from "node:port", target resolution
//!     │  ──► one widget:input per wire
//!     │
//!     └─ broadcast pass: manifest listeners matching the port name as
//!        an event type ──► widget:input per listener, deduped, never
//!        back to the source
//! ```
//!
//! The router transforms nothing: values pass through unmodified, and
//! type compatibility is advisory (established at design time by the
//! capability registry), never enforced at delivery time.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, warn};
use weft_event::{
    names, ActivityPayload, Event, EventScope, InputPayload, OutputPayload, StateChangePayload,
};
use weft_types::{CanvasId, ConnectionId, InstanceId, NodeId, PipelineId, PortName};

use weft_capability::CapabilityRegistry;

use super::broadcast::BroadcastListeners;
use super::error::RouterError;
use super::index::PipelineIndex;
use super::pipeline::{NodeKind, Pipeline};
use super::resolver::LiveRegistry;
use crate::bus::{EventBus, Subscription};
use crate::config::RouterConfig;

struct RouterState {
    pipelines: HashMap<PipelineId, Pipeline>,
    indices: HashMap<PipelineId, PipelineIndex>,
    live: LiveRegistry,
    broadcast: BroadcastListeners,
}

/// One resolved point-to-point delivery, computed under the state lock
/// and emitted after it is released.
struct Delivery {
    pipeline: PipelineId,
    connection: ConnectionId,
    source_node: NodeId,
    target: InstanceId,
    to_port: PortName,
}

/// Canvas-scoped pipeline router.
///
/// Constructed with [`PipelineRouter::new`], which subscribes the
/// router to `widget:output` and `widget:stateChanged` bus traffic;
/// bridge-published outputs route without further plumbing.
///
/// # Example
///
/// ```
/// use weft_runtime::{EventBus, PipelineRouter, RouterConfig};
/// use weft_types::{CanvasId, DefinitionId, InstanceId};
///
/// let bus = EventBus::new();
/// let router = PipelineRouter::new(CanvasId::new("canvas-1"), bus, &RouterConfig::default());
///
/// router.register_widget(
///     InstanceId::new("instance-123"),
///     DefinitionId::new("button.basic"),
///     &[],
/// );
/// assert_eq!(router.registered_widget_count(), 1);
/// ```
pub struct PipelineRouter {
    canvas_id: CanvasId,
    bus: EventBus,
    state: Mutex<RouterState>,
    subscriptions: Mutex<Vec<Subscription>>,
    /// Used for advisory design-time connection checks only; never
    /// consulted on the delivery path.
    registry: Option<Arc<CapabilityRegistry>>,
}

impl PipelineRouter {
    /// Creates a router for one canvas and attaches it to the bus.
    #[must_use]
    pub fn new(canvas_id: CanvasId, bus: EventBus, config: &RouterConfig) -> Arc<Self> {
        Self::build(canvas_id, bus, config, None)
    }

    /// Creates a router that additionally checks loaded connections
    /// against a capability registry, logging advisory warnings for
    /// wires the declared capabilities cannot support. Delivery is
    /// never blocked by these checks.
    #[must_use]
    pub fn with_registry(
        canvas_id: CanvasId,
        bus: EventBus,
        config: &RouterConfig,
        registry: Arc<CapabilityRegistry>,
    ) -> Arc<Self> {
        Self::build(canvas_id, bus, config, Some(registry))
    }

    fn build(
        canvas_id: CanvasId,
        bus: EventBus,
        config: &RouterConfig,
        registry: Option<Arc<CapabilityRegistry>>,
    ) -> Arc<Self> {
        let router = Arc::new(Self {
            canvas_id,
            bus: bus.clone(),
            state: Mutex::new(RouterState {
                pipelines: HashMap::new(),
                indices: HashMap::new(),
                live: LiveRegistry::new(),
                broadcast: BroadcastListeners::new(config.dedupe_window()),
            }),
            subscriptions: Mutex::new(Vec::new()),
            registry,
        });

        let output_sub = {
            let weak = Arc::downgrade(&router);
            bus.on(names::WIDGET_OUTPUT, move |event| {
                Self::on_widget_output(&weak, event);
            })
        };
        let state_sub = {
            let weak = Arc::downgrade(&router);
            bus.on(names::WIDGET_STATE_CHANGED, move |event| {
                Self::on_state_changed(&weak, event);
            })
        };
        router.subscriptions.lock().extend([output_sub, state_sub]);

        router
    }

    fn on_widget_output(weak: &Weak<Self>, event: &Event) {
        let Some(router) = weak.upgrade() else { return };
        let Some(source) = &event.source_widget else {
            debug!("widget:output without source, ignoring");
            return;
        };
        match OutputPayload::from_value(&event.payload) {
            Ok(output) => {
                router.route_output(source, &output.port_name, &output.value);
            }
            Err(e) => debug!(error = %e, "widget:output with malformed payload"),
        }
    }

    fn on_state_changed(weak: &Weak<Self>, event: &Event) {
        let Some(router) = weak.upgrade() else { return };
        let Some(source) = &event.source_widget else {
            debug!("widget:stateChanged without source, ignoring");
            return;
        };
        match StateChangePayload::from_value(&event.payload) {
            Ok(patch) => {
                router.route_state_change(source, &patch.changes);
            }
            Err(e) => debug!(error = %e, "widget:stateChanged with malformed payload"),
        }
    }

    /// The canvas this router serves.
    #[must_use]
    pub fn canvas_id(&self) -> &CanvasId {
        &self.canvas_id
    }

    // === Pipeline lifecycle ===

    /// Replaces all loaded pipelines atomically.
    ///
    /// Existing indices are cleared and rebuilt under one lock; partial
    /// state is never observable. Pipelines belonging to another canvas
    /// (other than the reserved default) are skipped with a warning,
    /// never an error. Returns the number of accepted pipelines and
    /// emits `pipeline:loaded`.
    pub fn load_pipelines(&self, pipelines: Vec<Pipeline>) -> usize {
        let accepted = {
            let mut state = self.state.lock();
            state.pipelines.clear();
            state.indices.clear();

            let mut accepted = 0;
            for pipeline in pipelines {
                if !pipeline.belongs_to(&self.canvas_id) {
                    warn!(
                        pipeline = %pipeline.id,
                        canvas = %pipeline.canvas_id,
                        router_canvas = %self.canvas_id,
                        "skipping pipeline for foreign canvas"
                    );
                    continue;
                }
                self.advisory_check(&pipeline);
                state.indices.insert(pipeline.id.clone(), PipelineIndex::build(&pipeline));
                state.pipelines.insert(pipeline.id.clone(), pipeline);
                accepted += 1;
            }
            accepted
        };

        self.bus.emit(
            Event::new(names::PIPELINE_LOADED, serde_json::json!({ "count": accepted }))
                .with_scope(EventScope::Canvas),
        );
        accepted
    }

    /// Inserts or replaces a single pipeline, rebuilding only its
    /// indices. Emits `pipeline:updated`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::CanvasMismatch`] when the pipeline
    /// belongs to another canvas.
    pub fn update_pipeline(&self, pipeline: Pipeline) -> Result<(), RouterError> {
        if !pipeline.belongs_to(&self.canvas_id) {
            return Err(RouterError::CanvasMismatch {
                pipeline: pipeline.id.clone(),
                expected: self.canvas_id.clone(),
                actual: pipeline.canvas_id.clone(),
            });
        }

        let id = pipeline.id.clone();
        self.advisory_check(&pipeline);
        {
            let mut state = self.state.lock();
            state.indices.insert(id.clone(), PipelineIndex::build(&pipeline));
            state.pipelines.insert(id.clone(), pipeline);
        }

        self.bus.emit(
            Event::new(names::PIPELINE_UPDATED, serde_json::json!({ "pipelineId": id }))
                .with_scope(EventScope::Canvas),
        );
        Ok(())
    }

    /// Removes a single pipeline. A second call for the same id is a
    /// no-op. Returns whether anything was removed; emits
    /// `pipeline:removed` only when it was.
    pub fn remove_pipeline(&self, id: &PipelineId) -> bool {
        let removed = {
            let mut state = self.state.lock();
            state.indices.remove(id);
            state.pipelines.remove(id).is_some()
        };
        if removed {
            self.bus.emit(
                Event::new(names::PIPELINE_REMOVED, serde_json::json!({ "pipelineId": id }))
                    .with_scope(EventScope::Canvas),
            );
        }
        removed
    }

    /// Checks a pipeline's wires against the capability registry, when
    /// one is attached, and logs advisory warnings for impossible
    /// connections. Only nodes whose reference is definitively a
    /// definition id are checkable; instance-referencing nodes are
    /// skipped since their manifest is unknown here.
    fn advisory_check(&self, pipeline: &Pipeline) {
        let Some(registry) = &self.registry else { return };

        let definition_of = |node_id: &NodeId| -> Option<weft_types::DefinitionId> {
            let node = pipeline.nodes.iter().find(|n| &n.id == node_id)?;
            match node.kind {
                Some(NodeKind::Definition) => {
                    Some(weft_types::DefinitionId::new(node.widget_instance_id.as_str()))
                }
                _ => None,
            }
        };

        for connection in &pipeline.connections {
            let (Some(source), Some(target)) = (
                definition_of(&connection.from.node_id),
                definition_of(&connection.to.node_id),
            ) else {
                continue;
            };
            match registry.analyze_capability_gap(
                &source,
                connection.from.port_name.as_str(),
                &target,
                connection.to.port_name.as_str(),
            ) {
                Ok(gap) if !gap.possible => {
                    warn!(
                        pipeline = %pipeline.id,
                        connection = %connection.id,
                        missing = ?gap.missing,
                        "connection not supported by declared capabilities (advisory)"
                    );
                }
                Ok(_) => {}
                Err(e) => debug!(
                    pipeline = %pipeline.id,
                    connection = %connection.id,
                    error = %e,
                    "capability check skipped"
                ),
            }
        }
    }

    // === Widget lifecycle ===

    /// Registers a live widget: its identity pair and its
    /// manifest-declared broadcast listener patterns.
    pub fn register_widget(
        &self,
        instance: InstanceId,
        definition: weft_types::DefinitionId,
        listen_patterns: &[String],
    ) {
        let mut state = self.state.lock();
        state.broadcast.add(instance.clone(), listen_patterns);
        state.live.register(instance, definition);
    }

    /// Removes a live widget from the registration map and every
    /// broadcast listener set. Idempotent.
    pub fn unregister_widget(&self, instance: &InstanceId) {
        let mut state = self.state.lock();
        state.live.unregister(instance);
        state.broadcast.remove(instance);
    }

    // === Routing ===

    /// Routes one output emission to every wired input and every
    /// matching broadcast listener.
    ///
    /// Returns the total number of `widget:input` events emitted.
    /// Routing misses (no source node, no connections, no listeners)
    /// are normal outcomes, not errors.
    pub fn route_output(&self, source: &InstanceId, port: &PortName, value: &Value) -> usize {
        let deliveries = self.resolve_deliveries(source, port);

        // Emissions happen outside the state lock: handlers may call
        // back into the router (e.g. a widget reacting synchronously).
        for delivery in &deliveries {
            self.emit_input(
                source,
                port,
                value,
                &delivery.target,
                &delivery.to_port,
                &delivery.connection,
                Some((&delivery.pipeline, &delivery.source_node)),
            );
        }

        deliveries.len() + self.broadcast_event(port.as_str(), source, value)
    }

    fn resolve_deliveries(&self, source: &InstanceId, port: &PortName) -> Vec<Delivery> {
        let state = self.state.lock();
        let definition = state.live.definition_of(source).cloned();

        let mut deliveries = Vec::new();
        for (pipeline_id, pipeline) in &state.pipelines {
            if !pipeline.enabled {
                continue;
            }
            let Some(index) = state.indices.get(pipeline_id) else {
                continue;
            };
            // Most pipelines do not involve this widget; a miss here
            // contributes nothing and is not an error.
            let Some(source_node) = index.find_source_node(source, definition.as_ref()) else {
                continue;
            };

            for connection in index.connections_from(&source_node.id, port) {
                if !connection.enabled {
                    continue;
                }
                let Some(target_node) = index.node(&connection.to.node_id) else {
                    debug!(
                        pipeline = %pipeline_id,
                        connection = %connection.id,
                        "dangling target node, connection yields nothing"
                    );
                    continue;
                };
                let (target, _how) = state.live.resolve(&target_node.widget_instance_id);
                deliveries.push(Delivery {
                    pipeline: pipeline_id.clone(),
                    connection: connection.id.clone(),
                    source_node: source_node.id.clone(),
                    target,
                    to_port: connection.to.port_name.clone(),
                });
            }
        }
        deliveries
    }

    /// Delivers a value to every manifest-declared listener matching
    /// `event_type`, independent of point-to-point wiring.
    ///
    /// Deliveries carry the synthetic connection id
    /// `broadcast:<event_type>`. The source never receives its own
    /// broadcast, and repeated `(event_type, source)` emissions within
    /// the dedupe window produce a single pass.
    pub fn broadcast_event(&self, event_type: &str, source: &InstanceId, value: &Value) -> usize {
        let audience = self.state.lock().broadcast.audience(event_type, source);
        if audience.is_empty() {
            return 0;
        }

        let connection = ConnectionId::broadcast(event_type);
        let port = PortName::new(event_type);
        for target in &audience {
            self.emit_input(source, &port, value, target, &port, &connection, None);
        }
        audience.len()
    }

    /// Routes a widget state patch: each changed key is treated as an
    /// output port of the same name.
    ///
    /// Returns the total number of `widget:input` events emitted.
    pub fn route_state_change(&self, source: &InstanceId, changes: &Map<String, Value>) -> usize {
        changes
            .iter()
            .map(|(key, value)| self.route_output(source, &PortName::new(key.as_str()), value))
            .sum()
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_input(
        &self,
        source: &InstanceId,
        source_port: &PortName,
        value: &Value,
        target: &InstanceId,
        to_port: &PortName,
        connection: &ConnectionId,
        wire: Option<(&PipelineId, &NodeId)>,
    ) {
        let input = InputPayload {
            port_name: to_port.clone(),
            value: value.clone(),
            source_widget: source.clone(),
            source_port: source_port.clone(),
            connection_id: connection.clone(),
        };
        self.bus.emit(
            Event::new(names::WIDGET_INPUT, input.into_value())
                .with_source(source.clone())
                .with_target(target.clone()),
        );

        let activity = ActivityPayload {
            pipeline_id: wire.map(|(pipeline, _)| pipeline.clone()),
            connection_id: connection.clone(),
            source_node: wire.map(|(_, node)| node.clone()),
            source_widget: source.clone(),
            target_widget: target.clone(),
        };
        self.bus.emit(
            Event::new(names::PIPELINE_ACTIVITY, activity.into_value())
                .with_scope(EventScope::Canvas),
        );
    }

    // === Introspection ===

    /// Number of loaded pipelines.
    #[must_use]
    pub fn pipeline_count(&self) -> usize {
        self.state.lock().pipelines.len()
    }

    /// Number of registered live widgets.
    #[must_use]
    pub fn registered_widget_count(&self) -> usize {
        self.state.lock().live.len()
    }

    /// Number of distinct broadcast listeners.
    #[must_use]
    pub fn broadcast_listener_count(&self) -> usize {
        self.state.lock().broadcast.listener_count()
    }

    // === Teardown ===

    /// Detaches from the bus, clears all state, and emits
    /// `pipeline:destroyed`.
    pub fn destroy(&self) {
        for sub in self.subscriptions.lock().drain(..) {
            sub.unsubscribe();
        }
        {
            let mut state = self.state.lock();
            state.pipelines.clear();
            state.indices.clear();
            state.live.clear();
            state.broadcast.clear();
        }
        self.bus.emit(
            Event::new(names::PIPELINE_DESTROYED, Value::Null).with_scope(EventScope::Canvas),
        );
    }
}

impl std::fmt::Debug for PipelineRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineRouter")
            .field("canvas_id", &self.canvas_id)
            .field("pipelines", &self.pipeline_count())
            .field("widgets", &self.registered_widget_count())
            .finish()
    }
}
