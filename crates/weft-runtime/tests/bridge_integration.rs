//! Integration tests for the boundary bridge.
//!
//! Tests the complete flow: sandbox message → bridge → bus → router →
//! bus → bridge → target mount.

use serde_json::{json, Value};
use weft_runtime::{
    BoundaryBridge, Connection, Endpoint, EventBus, MountHandle, Node, OutboundMessage, Pipeline,
    PipelineRouter, WeftConfig,
};
use weft_types::{CanvasId, ConnectionId, DefinitionId, InstanceId, NodeId, PipelineId, PortName};

fn two_widget_pipeline() -> Pipeline {
    Pipeline {
        id: PipelineId::new("P1"),
        canvas_id: CanvasId::new("c1"),
        name: "color flow".into(),
        nodes: vec![
            Node {
                id: NodeId::new("n1"),
                widget_instance_id: "w-picker".into(),
                label: None,
                kind: None,
            },
            Node {
                id: NodeId::new("n2"),
                widget_instance_id: "w-swatch".into(),
                label: None,
                kind: None,
            },
        ],
        connections: vec![Connection {
            id: ConnectionId::new("c-color"),
            from: Endpoint {
                node_id: NodeId::new("n1"),
                port_name: PortName::new("colorChanged"),
            },
            to: Endpoint {
                node_id: NodeId::new("n2"),
                port_name: PortName::new("setColor"),
            },
            enabled: true,
        }],
        enabled: true,
    }
}

/// A raw sandbox message travels the whole path: bridge inbound →
/// widget:output → router → widget:input → bridge forward → target
/// mount.
fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn sandbox_output_reaches_target_mount() {
    init_tracing();
    let config = WeftConfig::default();
    let bus = EventBus::new();
    let bridge = BoundaryBridge::new(bus.clone());
    let router = PipelineRouter::new(CanvasId::new("c1"), bus, &config.router);

    let picker = InstanceId::new("w-picker");
    let swatch = InstanceId::new("w-swatch");

    let (picker_mount, _picker_rx) =
        MountHandle::channel(picker.clone(), config.bridge.mount_buffer);
    let (swatch_mount, mut swatch_rx) =
        MountHandle::channel(swatch.clone(), config.bridge.mount_buffer);
    bridge.register_widget(picker.clone(), picker_mount);
    bridge.register_widget(swatch.clone(), swatch_mount);

    router.register_widget(picker.clone(), DefinitionId::new("color.picker"), &[]);
    router.register_widget(swatch.clone(), DefinitionId::new("color.swatch"), &[]);
    router.load_pipelines(vec![two_widget_pipeline()]);

    bridge.handle_raw(
        json!({
            "type": "widget-event",
            "widgetId": "w-picker",
            "signal": "colorChanged",
            "payload": "#00ff00"
        }),
        Some(&picker),
    );

    match swatch_rx.try_recv().expect("swatch should receive the routed input") {
        OutboundMessage::Input { widget_id, port_name, value, source } => {
            assert_eq!(widget_id, swatch);
            assert_eq!(port_name.as_str(), "setColor");
            assert_eq!(value, json!("#00ff00"));
            assert_eq!(source.widget_id, picker);
            assert_eq!(source.port_name.as_str(), "colorChanged");
            assert_eq!(source.connection_id.as_str(), "c-color");
        }
        other => panic!("wrong outbound kind: {other:?}"),
    }
}

/// A broadcast-listening widget receives sandbox traffic it never
/// wired, while the emitting widget receives nothing back.
#[test]
fn sandbox_output_reaches_broadcast_listener() {
    let config = WeftConfig::default();
    let bus = EventBus::new();
    let bridge = BoundaryBridge::new(bus.clone());
    let router = PipelineRouter::new(CanvasId::new("c1"), bus, &config.router);

    let beat_source = InstanceId::new("w-audio");
    let listener = InstanceId::new("w-visualizer");

    let (source_mount, mut source_rx) =
        MountHandle::channel(beat_source.clone(), config.bridge.mount_buffer);
    let (listener_mount, mut listener_rx) =
        MountHandle::channel(listener.clone(), config.bridge.mount_buffer);
    bridge.register_widget(beat_source.clone(), source_mount);
    bridge.register_widget(listener.clone(), listener_mount);

    router.register_widget(beat_source.clone(), DefinitionId::new("audio.player"), &[]);
    router.register_widget(
        listener.clone(),
        DefinitionId::new("viz.bars"),
        &["audio:*".into()],
    );

    bridge.handle_raw(
        json!({
            "type": "widget-event",
            "widgetId": "w-audio",
            "signal": "audio:beat-detected",
            "payload": {"bpm": 128}
        }),
        Some(&beat_source),
    );

    match listener_rx.try_recv().expect("listener should receive the broadcast") {
        OutboundMessage::Input { port_name, source, .. } => {
            assert_eq!(port_name.as_str(), "audio:beat-detected");
            assert_eq!(source.connection_id.as_str(), "broadcast:audio:beat-detected");
        }
        other => panic!("wrong outbound kind: {other:?}"),
    }
    assert!(source_rx.try_recv().is_err(), "no self-delivery");
}

/// Ready and error messages surface as their bus events; log messages
/// do not reach the router at all.
#[test]
fn lifecycle_messages_become_bus_events() {
    use parking_lot::Mutex;
    use std::sync::Arc;
    use weft_event::{names, Event};

    let bus = EventBus::new();
    let seen: Arc<Mutex<Vec<Event>>> = Arc::new(Mutex::new(Vec::new()));
    for event_type in [names::WIDGET_READY, names::WIDGET_ERROR] {
        let inner = Arc::clone(&seen);
        let _sub = bus.on(event_type, move |event| inner.lock().push(event.clone()));
    }
    let bridge = BoundaryBridge::new(bus);

    let widget = InstanceId::new("w-1");
    let (mount, _rx) = MountHandle::channel(widget.clone(), 8);
    bridge.register_widget(widget.clone(), mount);

    bridge.handle_raw(json!({"type": "widget-ready", "widgetId": "w-1"}), Some(&widget));
    bridge.handle_raw(
        json!({"type": "widget-error", "widgetId": "w-1", "error": "script crashed"}),
        Some(&widget),
    );
    bridge.handle_raw(
        json!({"type": "widget-log", "widgetId": "w-1", "message": "hello"}),
        Some(&widget),
    );

    let events = seen.lock();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event_type, names::WIDGET_READY);
    assert_eq!(events[1].event_type, names::WIDGET_ERROR);
    assert_eq!(events[1].payload["error"], "script crashed");
}

/// Unmounting a widget mid-flight loses its deliveries quietly; other
/// targets keep receiving.
#[test]
fn unmounted_target_is_nonfatal() {
    let config = WeftConfig::default();
    let bus = EventBus::new();
    let bridge = BoundaryBridge::new(bus.clone());
    let router = PipelineRouter::new(CanvasId::new("c1"), bus, &config.router);

    let picker = InstanceId::new("w-picker");
    let (picker_mount, _picker_rx) =
        MountHandle::channel(picker.clone(), config.bridge.mount_buffer);
    bridge.register_widget(picker.clone(), picker_mount);
    // The swatch never mounts.

    router.load_pipelines(vec![two_widget_pipeline()]);

    // Routing still counts the delivery; only the forward is dropped.
    bridge.handle_raw(
        json!({
            "type": "widget-event",
            "widgetId": "w-picker",
            "signal": "colorChanged",
            "payload": "#000"
        }),
        Some(&picker),
    );

    // A second emission must not be affected by the first one's miss.
    bridge.handle_raw(
        json!({
            "type": "widget-event",
            "widgetId": "w-picker",
            "signal": "colorChanged",
            "payload": "#111"
        }),
        Some(&picker),
    );
}

/// Host-initiated config and action messages arrive on the mount in
/// order.
#[test]
fn host_config_and_action_flow() {
    let bus = EventBus::new();
    let bridge = BoundaryBridge::new(bus);

    let widget = InstanceId::new("w-1");
    let (mount, mut rx) = MountHandle::channel(widget.clone(), 8);
    bridge.register_widget(widget.clone(), mount);

    assert!(bridge.send_config(&widget, json!({"theme": "dark"})));
    assert!(bridge.send_action(&widget, "reset", Value::Null));

    match rx.try_recv().unwrap() {
        OutboundMessage::Init { config, .. } => assert_eq!(config["theme"], "dark"),
        other => panic!("expected init first: {other:?}"),
    }
    match rx.try_recv().unwrap() {
        OutboundMessage::Action { action, .. } => assert_eq!(action, "reset"),
        other => panic!("expected action second: {other:?}"),
    }
}
