/// End-to-end flows through a registry-backed bridge with mock endpoints
use zubridge_server::{
    main_bridge,
    shared::{json, SUBSCRIBE_CHANNEL},
    AdapterOptions, BridgeConfig, IpcMain,
};
use zubridge_test::{counter_handlers, counter_store, init_logger, MockEndpoint};

#[test]
fn late_subscriber_gets_current_state_without_duplicates() {
    init_logger();
    let ipc = IpcMain::new();
    let store = counter_store(0);
    let options = AdapterOptions::new().with_handlers(counter_handlers(&store));
    let bridge = main_bridge(&ipc, &store, &[], options, BridgeConfig::default());
    let w1 = MockEndpoint::new(1);
    let w2 = MockEndpoint::new(2);

    bridge.subscribe(&[w1.target()]);
    assert_eq!(w1.sent_on(SUBSCRIBE_CHANNEL), vec![json!({ "counter": 0 })]);

    bridge.dispatch(json!({ "type": "INCREMENT" }));
    assert_eq!(
        w1.sent_on(SUBSCRIBE_CHANNEL),
        vec![json!({ "counter": 0 }), json!({ "counter": 1 })]
    );

    bridge.subscribe(&[w2.target()]);
    assert_eq!(w2.sent_on(SUBSCRIBE_CHANNEL), vec![json!({ "counter": 1 })]);
    assert_eq!(w1.send_count(), 2);
}

#[test]
fn unsubscribed_endpoint_stops_receiving() {
    init_logger();
    let ipc = IpcMain::new();
    let store = counter_store(0);
    let options = AdapterOptions::new().with_handlers(counter_handlers(&store));
    let bridge = main_bridge(&ipc, &store, &[], options, BridgeConfig::default());
    let w1 = MockEndpoint::new(1);
    let w2 = MockEndpoint::new(2);

    bridge.subscribe(&[w1.target(), w2.target()]);
    bridge.unsubscribe(Some(&[w1.target()]));
    w1.clear_sent();
    w2.clear_sent();

    bridge.dispatch_with("SET_COUNTER", Some(json!(8)));

    assert_eq!(w1.send_count(), 0);
    assert_eq!(w2.sent_on(SUBSCRIBE_CHANNEL), vec![json!({ "counter": 8 })]);
    assert_eq!(w2.send_count(), 1);
}

#[test]
fn destroyed_endpoint_leaves_subscribed_windows() {
    init_logger();
    let ipc = IpcMain::new();
    let store = counter_store(0);
    let w1 = MockEndpoint::new(1);
    let w2 = MockEndpoint::new(2);
    let bridge = main_bridge(
        &ipc,
        &store,
        &[w1.target(), w2.target()],
        AdapterOptions::new(),
        BridgeConfig::default(),
    );

    w1.destroy();

    let windows = bridge.subscribed_windows();
    assert!(!windows.contains(&w1.endpoint_id()));
    assert_eq!(windows, vec![w2.endpoint_id()]);
}
