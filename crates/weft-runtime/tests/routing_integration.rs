//! Integration tests for the pipeline routing core.
//!
//! Exercises the full flow: router state, identity resolution, fan-out,
//! broadcast listeners, and the dedupe window, observed through bus
//! events.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{json, Value};
use weft_event::{names, Event, InputPayload};
use weft_runtime::{
    Connection, Endpoint, EventBus, Node, NodeKind, Pipeline, PipelineRouter, RouterConfig,
};
use weft_types::{CanvasId, ConnectionId, DefinitionId, InstanceId, NodeId, PipelineId, PortName};

type Collected = Arc<Mutex<Vec<Event>>>;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn collect_inputs(bus: &EventBus) -> Collected {
    let sink: Collected = Arc::new(Mutex::new(Vec::new()));
    let inner = Arc::clone(&sink);
    let _sub = bus.on(names::WIDGET_INPUT, move |event| inner.lock().push(event.clone()));
    sink
}

fn node(id: &str, reference: &str, kind: Option<NodeKind>) -> Node {
    Node {
        id: NodeId::new(id),
        widget_instance_id: reference.to_string(),
        label: None,
        kind,
    }
}

fn wire(id: &str, from: (&str, &str), to: (&str, &str)) -> Connection {
    Connection {
        id: ConnectionId::new(id),
        from: Endpoint {
            node_id: NodeId::new(from.0),
            port_name: PortName::new(from.1),
        },
        to: Endpoint {
            node_id: NodeId::new(to.0),
            port_name: PortName::new(to.1),
        },
        enabled: true,
    }
}

fn pipeline(id: &str, canvas: &str, nodes: Vec<Node>, connections: Vec<Connection>) -> Pipeline {
    Pipeline {
        id: PipelineId::new(id),
        canvas_id: CanvasId::new(canvas),
        name: id.to_string(),
        nodes,
        connections,
        enabled: true,
    }
}

fn fast_config() -> RouterConfig {
    RouterConfig { dedupe_window_ms: 0 }
}

/// The canonical scenario: pipeline P1 wires n1:colorChanged to
/// n2:setColor; routing "colorChanged" from instance A yields exactly
/// one widget:input addressed to B with full provenance.
#[test]
fn point_to_point_scenario() {
    init_tracing();
    let bus = EventBus::new();
    let inputs = collect_inputs(&bus);
    let router = PipelineRouter::new(CanvasId::new("c1"), bus, &fast_config());

    router.load_pipelines(vec![pipeline(
        "P1",
        "c1",
        vec![node("n1", "A", None), node("n2", "B", None)],
        vec![wire("conn-1", ("n1", "colorChanged"), ("n2", "setColor"))],
    )]);

    let delivered = router.route_output(
        &InstanceId::new("A"),
        &PortName::new("colorChanged"),
        &json!("#ff0000"),
    );

    assert_eq!(delivered, 1);
    let events = inputs.lock();
    assert_eq!(events.len(), 1);

    let event = &events[0];
    assert_eq!(event.target_widget, Some(InstanceId::new("B")));
    assert_eq!(event.source_widget, Some(InstanceId::new("A")));

    let payload = InputPayload::from_value(&event.payload).unwrap();
    assert_eq!(payload.port_name.as_str(), "setColor");
    assert_eq!(payload.value, json!("#ff0000"));
    assert_eq!(payload.source_port.as_str(), "colorChanged");
    assert_eq!(payload.connection_id.as_str(), "conn-1");
}

/// One output wired to N inputs across two pipelines emits exactly N
/// widget:input events, each carrying its own wire's connection id.
#[test]
fn fan_out_across_pipelines() {
    let bus = EventBus::new();
    let inputs = collect_inputs(&bus);
    let router = PipelineRouter::new(CanvasId::new("c1"), bus, &fast_config());

    router.load_pipelines(vec![
        pipeline(
            "P1",
            "c1",
            vec![node("n1", "A", None), node("n2", "B", None), node("n3", "C", None)],
            vec![
                wire("c-ab", ("n1", "out"), ("n2", "in")),
                wire("c-ac", ("n1", "out"), ("n3", "in")),
            ],
        ),
        pipeline(
            "P2",
            "c1",
            vec![node("m1", "A", None), node("m2", "D", None)],
            vec![wire("c-ad", ("m1", "out"), ("m2", "in"))],
        ),
    ]);

    let delivered = router.route_output(&InstanceId::new("A"), &PortName::new("out"), &json!(1));
    assert_eq!(delivered, 3);

    let events = inputs.lock();
    let mut targets: Vec<String> = events
        .iter()
        .filter_map(|e| e.target_widget.as_ref().map(|t| t.as_str().to_string()))
        .collect();
    targets.sort();
    assert_eq!(targets, vec!["B", "C", "D"]);

    for event in events.iter() {
        let payload = InputPayload::from_value(&event.payload).unwrap();
        let expected = match event.target_widget.as_ref().unwrap().as_str() {
            "B" => "c-ab",
            "C" => "c-ac",
            "D" => "c-ad",
            other => panic!("unexpected target {other}"),
        };
        assert_eq!(payload.connection_id.as_str(), expected);
    }
}

/// A pipeline authored against the definition id resolves to the live
/// instance registered under it.
#[test]
fn definition_id_resolves_to_live_instance() {
    let bus = EventBus::new();
    let inputs = collect_inputs(&bus);
    let router = PipelineRouter::new(CanvasId::new("c1"), bus, &fast_config());

    router.register_widget(
        InstanceId::new("instance-123"),
        DefinitionId::new("button.basic"),
        &[],
    );
    router.register_widget(
        InstanceId::new("instance-456"),
        DefinitionId::new("lamp.basic"),
        &[],
    );

    router.load_pipelines(vec![pipeline(
        "P1",
        "c1",
        vec![
            node("n1", "button.basic", Some(NodeKind::Definition)),
            node("n2", "lamp.basic", Some(NodeKind::Definition)),
        ],
        vec![wire("c1", ("n1", "pressed"), ("n2", "toggle"))],
    )]);

    // Output arrives under the *instance* id; the source node is found
    // through the definition fallback, and the target definition
    // resolves back to its live instance.
    let delivered = router.route_output(
        &InstanceId::new("instance-123"),
        &PortName::new("pressed"),
        &Value::Null,
    );

    assert_eq!(delivered, 1);
    let events = inputs.lock();
    assert_eq!(events[0].target_widget, Some(InstanceId::new("instance-456")));
}

/// An unresolvable target reference is assumed to already be a live
/// instance id (stale-pipeline tolerance), not an error.
#[test]
fn unresolved_target_passes_through() {
    let bus = EventBus::new();
    let inputs = collect_inputs(&bus);
    let router = PipelineRouter::new(CanvasId::new("c1"), bus, &fast_config());

    router.load_pipelines(vec![pipeline(
        "P1",
        "c1",
        vec![node("n1", "A", None), node("n2", "w-gone", None)],
        vec![wire("c1", ("n1", "out"), ("n2", "in"))],
    )]);

    router.route_output(&InstanceId::new("A"), &PortName::new("out"), &json!(0));
    assert_eq!(
        inputs.lock()[0].target_widget,
        Some(InstanceId::new("w-gone"))
    );
}

/// Broadcast listeners: exact, namespace wildcard, and global wildcard
/// matching, with the synthetic broadcast connection id.
#[test]
fn broadcast_wildcard_matching() {
    let bus = EventBus::new();
    let inputs = collect_inputs(&bus);
    let router = PipelineRouter::new(CanvasId::new("c1"), bus, &fast_config());

    router.register_widget(
        InstanceId::new("w-exact"),
        DefinitionId::new("a.a"),
        &["audio:beat-detected".into()],
    );
    router.register_widget(
        InstanceId::new("w-ns"),
        DefinitionId::new("a.b"),
        &["audio:*".into()],
    );
    router.register_widget(
        InstanceId::new("w-all"),
        DefinitionId::new("a.c"),
        &["*".into()],
    );

    let source = InstanceId::new("w-source");
    let delivered = router.broadcast_event("audio:beat-detected", &source, &json!(128));
    assert_eq!(delivered, 3);

    let delivered = router.broadcast_event("video:frame", &source, &json!(1));
    assert_eq!(delivered, 1);

    let events = inputs.lock();
    let video_event = events.last().unwrap();
    assert_eq!(video_event.target_widget, Some(InstanceId::new("w-all")));
    let payload = InputPayload::from_value(&video_event.payload).unwrap();
    assert_eq!(payload.connection_id.as_str(), "broadcast:video:frame");
}

/// Broadcasting never delivers back to the source, even when the
/// source declared itself a listener for the type or a wildcard.
#[test]
fn no_self_delivery() {
    let bus = EventBus::new();
    let inputs = collect_inputs(&bus);
    let router = PipelineRouter::new(CanvasId::new("c1"), bus, &fast_config());

    let me = InstanceId::new("w-me");
    router.register_widget(
        me.clone(),
        DefinitionId::new("echo.widget"),
        &["*".into(), "my:event".into()],
    );

    let delivered = router.broadcast_event("my:event", &me, &Value::Null);
    assert_eq!(delivered, 0);
    assert!(inputs.lock().is_empty());
}

/// Two emissions of the same (type, source) pair inside the dedupe
/// window produce one broadcast pass; after the window elapses a new
/// pass happens.
#[test]
fn dedupe_window_suppresses_then_rearms() {
    let bus = EventBus::new();
    let router = PipelineRouter::new(
        CanvasId::new("c1"),
        bus,
        &RouterConfig { dedupe_window_ms: 40 },
    );

    router.register_widget(
        InstanceId::new("w-listener"),
        DefinitionId::new("l.l"),
        &["*".into()],
    );
    let source = InstanceId::new("w-source");

    assert_eq!(router.broadcast_event("tick", &source, &json!(1)), 1);
    assert_eq!(router.broadcast_event("tick", &source, &json!(2)), 0);

    std::thread::sleep(Duration::from_millis(60));
    assert_eq!(router.broadcast_event("tick", &source, &json!(3)), 1);
}

/// A state patch routes each changed key as an output port of the same
/// name.
#[test]
fn state_change_routes_per_key() {
    let bus = EventBus::new();
    let inputs = collect_inputs(&bus);
    let router = PipelineRouter::new(CanvasId::new("c1"), bus, &fast_config());

    router.load_pipelines(vec![pipeline(
        "P1",
        "c1",
        vec![node("n1", "A", None), node("n2", "B", None)],
        vec![
            wire("c-volume", ("n1", "volume"), ("n2", "setVolume")),
            wire("c-muted", ("n1", "muted"), ("n2", "setMuted")),
        ],
    )]);

    let mut changes = serde_json::Map::new();
    changes.insert("volume".into(), json!(0.8));
    changes.insert("muted".into(), json!(false));
    changes.insert("untracked".into(), json!("x"));

    let delivered = router.route_state_change(&InstanceId::new("A"), &changes);
    assert_eq!(delivered, 2);

    let events = inputs.lock();
    let mut ports: Vec<String> = events
        .iter()
        .map(|e| {
            InputPayload::from_value(&e.payload)
                .unwrap()
                .port_name
                .as_str()
                .to_string()
        })
        .collect();
    ports.sort();
    assert_eq!(ports, vec!["setMuted", "setVolume"]);
}

/// Pipelines for a foreign canvas are skipped with a warning; the
/// reserved default canvas is accepted everywhere.
#[test]
fn canvas_scoping() {
    let bus = EventBus::new();
    let router = PipelineRouter::new(CanvasId::new("c1"), bus, &fast_config());

    let accepted = router.load_pipelines(vec![
        pipeline("own", "c1", vec![], vec![]),
        pipeline("foreign", "c2", vec![], vec![]),
        pipeline("shared", CanvasId::DEFAULT, vec![], vec![]),
    ]);

    assert_eq!(accepted, 2);
    assert_eq!(router.pipeline_count(), 2);
}

/// load_pipelines replaces all state atomically: previously loaded
/// pipelines are gone after a reload.
#[test]
fn load_replaces_previous_state() {
    let bus = EventBus::new();
    let inputs = collect_inputs(&bus);
    let router = PipelineRouter::new(CanvasId::new("c1"), bus, &fast_config());

    router.load_pipelines(vec![pipeline(
        "old",
        "c1",
        vec![node("n1", "A", None), node("n2", "B", None)],
        vec![wire("c-old", ("n1", "out"), ("n2", "in"))],
    )]);
    router.load_pipelines(vec![pipeline("new", "c1", vec![], vec![])]);

    let delivered = router.route_output(&InstanceId::new("A"), &PortName::new("out"), &json!(1));
    assert_eq!(delivered, 0);
    assert!(inputs.lock().is_empty());
    assert_eq!(router.pipeline_count(), 1);
}

/// Disabled pipelines and disabled connections contribute nothing.
#[test]
fn disabled_elements_are_skipped() {
    let bus = EventBus::new();
    let router = PipelineRouter::new(CanvasId::new("c1"), bus, &fast_config());

    let mut disabled_pipeline = pipeline(
        "P1",
        "c1",
        vec![node("n1", "A", None), node("n2", "B", None)],
        vec![wire("c1", ("n1", "out"), ("n2", "in"))],
    );
    disabled_pipeline.enabled = false;

    let mut disabled_wire = wire("c2", ("n1", "out"), ("n2", "in"));
    disabled_wire.enabled = false;
    let live_pipeline = pipeline(
        "P2",
        "c1",
        vec![node("n1", "A", None), node("n2", "B", None)],
        vec![disabled_wire],
    );

    router.load_pipelines(vec![disabled_pipeline, live_pipeline]);
    let delivered = router.route_output(&InstanceId::new("A"), &PortName::new("out"), &json!(1));
    assert_eq!(delivered, 0);
}

/// remove_pipeline and unregister_widget are no-ops the second time.
#[test]
fn idempotent_unload() {
    let bus = EventBus::new();
    let router = PipelineRouter::new(CanvasId::new("c1"), bus, &fast_config());

    router.load_pipelines(vec![pipeline("P1", "c1", vec![], vec![])]);
    assert!(router.remove_pipeline(&PipelineId::new("P1")));
    assert!(!router.remove_pipeline(&PipelineId::new("P1")));

    let instance = InstanceId::new("w-1");
    router.register_widget(instance.clone(), DefinitionId::new("d.d"), &["*".into()]);
    router.unregister_widget(&instance);
    router.unregister_widget(&instance);
    assert_eq!(router.registered_widget_count(), 0);
    assert_eq!(router.broadcast_listener_count(), 0);
}

/// A dangling connection target yields zero deliveries, never a panic.
#[test]
fn dangling_target_degrades_to_nothing() {
    let bus = EventBus::new();
    let router = PipelineRouter::new(CanvasId::new("c1"), bus, &fast_config());

    router.load_pipelines(vec![pipeline(
        "P1",
        "c1",
        vec![node("n1", "A", None)],
        vec![wire("c1", ("n1", "out"), ("n-missing", "in"))],
    )]);

    let delivered = router.route_output(&InstanceId::new("A"), &PortName::new("out"), &json!(1));
    assert_eq!(delivered, 0);
}

/// Bridge-style traffic: a widget:output bus event routes without any
/// direct call into the router.
#[test]
fn routes_bus_output_events() {
    use weft_event::OutputPayload;

    let bus = EventBus::new();
    let inputs = collect_inputs(&bus);
    let router = PipelineRouter::new(CanvasId::new("c1"), bus.clone(), &fast_config());

    router.load_pipelines(vec![pipeline(
        "P1",
        "c1",
        vec![node("n1", "A", None), node("n2", "B", None)],
        vec![wire("c1", ("n1", "out"), ("n2", "in"))],
    )]);

    let output = OutputPayload {
        port_name: PortName::new("out"),
        value: json!(7),
    };
    bus.emit(
        Event::new(names::WIDGET_OUTPUT, output.into_value()).with_source(InstanceId::new("A")),
    );

    assert_eq!(inputs.lock().len(), 1);
}

/// pipeline:activity telemetry is emitted once per routed delivery.
#[test]
fn activity_telemetry_per_delivery() {
    use weft_event::ActivityPayload;

    let bus = EventBus::new();
    let activity: Collected = Arc::new(Mutex::new(Vec::new()));
    {
        let inner = Arc::clone(&activity);
        let _sub = bus.on(names::PIPELINE_ACTIVITY, move |event| {
            inner.lock().push(event.clone());
        });
    }
    let router = PipelineRouter::new(CanvasId::new("c1"), bus, &fast_config());

    router.load_pipelines(vec![pipeline(
        "P1",
        "c1",
        vec![node("n1", "A", None), node("n2", "B", None)],
        vec![wire("c1", ("n1", "out"), ("n2", "in"))],
    )]);
    router.route_output(&InstanceId::new("A"), &PortName::new("out"), &json!(1));

    let events = activity.lock();
    assert_eq!(events.len(), 1);
    let payload = ActivityPayload::from_value(&events[0].payload).unwrap();
    assert_eq!(payload.pipeline_id, Some(PipelineId::new("P1")));
    assert_eq!(payload.connection_id.as_str(), "c1");
}

/// destroy() detaches the router from the bus and clears state.
#[test]
fn destroy_detaches_and_clears() {
    let bus = EventBus::new();
    let destroyed: Collected = Arc::new(Mutex::new(Vec::new()));
    {
        let inner = Arc::clone(&destroyed);
        let _sub = bus.on(names::PIPELINE_DESTROYED, move |event| {
            inner.lock().push(event.clone());
        });
    }
    let router = PipelineRouter::new(CanvasId::new("c1"), bus, &fast_config());

    router.load_pipelines(vec![pipeline("P1", "c1", vec![], vec![])]);
    router.destroy();

    assert_eq!(destroyed.lock().len(), 1);
    assert_eq!(router.pipeline_count(), 0);
}

/// With a capability registry attached, loading still accepts pipelines
/// whose wires the declared capabilities cannot support (checks are
/// advisory).
#[test]
fn capability_checks_never_block_loading() {
    use weft_capability::{CapabilityDeclaration, CapabilityRegistry};

    let registry = Arc::new(CapabilityRegistry::new());
    registry.register_widget(
        DefinitionId::new("button.basic"),
        "Button",
        CapabilityDeclaration {
            outputs: vec!["trigger.fired".into()],
            ..Default::default()
        },
    );
    registry.register_widget(
        DefinitionId::new("lamp.basic"),
        "Lamp",
        CapabilityDeclaration {
            inputs: vec!["trigger.fire".into()],
            ..Default::default()
        },
    );

    let bus = EventBus::new();
    let router = PipelineRouter::with_registry(
        CanvasId::new("c1"),
        bus,
        &fast_config(),
        registry,
    );

    // "colorChanged" is not among the button's declared outputs; the
    // wire still loads and routes.
    let accepted = router.load_pipelines(vec![pipeline(
        "P1",
        "c1",
        vec![
            node("n1", "button.basic", Some(NodeKind::Definition)),
            node("n2", "lamp.basic", Some(NodeKind::Definition)),
        ],
        vec![wire("c1", ("n1", "colorChanged"), ("n2", "setColor"))],
    )]);

    assert_eq!(accepted, 1);
    assert_eq!(router.pipeline_count(), 1);
}
