/// Delivery to endpoints that are still loading
use zubridge_server::{
    main_bridge, safe_send,
    shared::{json, EndpointEvent, State, SUBSCRIBE_CHANNEL},
    AdapterOptions, BridgeConfig, IpcMain,
};
use zubridge_test::{counter_store, MockEndpoint};

#[test]
fn loading_endpoint_gets_one_send_after_load() {
    let ipc = IpcMain::new();
    let store = counter_store(0);
    let endpoint = MockEndpoint::loading(1);
    let _bridge = main_bridge(
        &ipc,
        &store,
        &[endpoint.target()],
        AdapterOptions::new(),
        BridgeConfig::default(),
    );

    store.set_state(State::object().with("counter", 1i64), false);
    assert_eq!(endpoint.send_count(), 0);
    assert_eq!(endpoint.pending_count(EndpointEvent::DidFinishLoad), 1);

    endpoint.finish_load();
    assert_eq!(endpoint.sent_on(SUBSCRIBE_CHANNEL), vec![json!({ "counter": 1 })]);

    endpoint.finish_load();
    assert_eq!(endpoint.send_count(), 1);
}

#[test]
fn deferred_send_abandoned_when_destroyed_first() {
    let ipc = IpcMain::new();
    let store = counter_store(0);
    let endpoint = MockEndpoint::loading(1);
    let bridge = main_bridge(
        &ipc,
        &store,
        &[endpoint.target()],
        AdapterOptions::new(),
        BridgeConfig::default(),
    );

    store.set_state(State::object().with("counter", 1i64), false);
    endpoint.destroy();
    endpoint.finish_load();

    assert_eq!(endpoint.send_count(), 0);
    assert!(bridge.subscribed_windows().is_empty());
}

#[test]
fn deferred_send_skipped_if_destroyed_without_notice() {
    let endpoint = MockEndpoint::loading(1);

    assert!(safe_send(&endpoint.as_endpoint(), SUBSCRIBE_CHANNEL, &json!({})));
    endpoint.destroy_silently();
    endpoint.finish_load();

    assert_eq!(endpoint.send_count(), 0);
}

#[test]
fn safe_send_never_fails_the_caller() {
    let destroyed = MockEndpoint::new(1);
    destroyed.destroy_silently();
    let faulty = MockEndpoint::new(2);
    faulty.make_faulty();
    let mute = MockEndpoint::new(3);
    mute.remove_send_surface();
    let ready = MockEndpoint::new(4);

    let payload = json!({ "counter": 1 });
    assert!(!safe_send(&destroyed.as_endpoint(), SUBSCRIBE_CHANNEL, &payload));
    assert!(!safe_send(&faulty.as_endpoint(), SUBSCRIBE_CHANNEL, &payload));
    assert!(!safe_send(&mute.as_endpoint(), SUBSCRIBE_CHANNEL, &payload));
    assert!(safe_send(&ready.as_endpoint(), SUBSCRIBE_CHANNEL, &payload));
    assert_eq!(ready.sent(), vec![(SUBSCRIBE_CHANNEL.to_string(), payload)]);
}
