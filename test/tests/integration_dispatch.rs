/// Dispatch normalization, thunk isolation and handler priority
use std::{cell::Cell, rc::Rc};

use zubridge_server::{
    create_dispatch, main_bridge,
    shared::{json, Action, State, Value, SUBSCRIBE_CHANNEL},
    AdapterOptions, BridgeConfig, Dispatcher, HandlerMap, IpcMain, ReducerStore, Thunk,
};
use zubridge_test::{
    counter_handlers, counter_of, counter_store, init_logger, method_store, MockEndpoint,
    RecordingManager,
};

// ============================================================================
// Normalization
// ============================================================================

#[test]
fn type_and_object_forms_reach_the_adapter_identically() {
    let manager = RecordingManager::new();
    let dispatch = Dispatcher::new(manager.clone());

    dispatch.dispatch_with("T", Some(json!({ "p": 1 })));
    dispatch.dispatch(json!({ "type": "T", "payload": { "p": 1 } }));
    dispatch.dispatch(Action::with_payload("T", json!({ "p": 1 })));

    let processed = manager.processed();
    assert_eq!(processed.len(), 3);
    assert!(processed.iter().all(|action| *action == processed[0]));
    assert_eq!(processed[0], Action::with_payload("T", json!({ "p": 1 })));
}

#[test]
fn plain_dispatch_returns_nothing() {
    let manager = RecordingManager::new();
    let dispatch = Dispatcher::new(manager);

    assert_eq!(dispatch.dispatch("T"), None);
}

// ============================================================================
// Thunks
// ============================================================================

#[test]
fn failing_thunk_does_not_block_later_dispatches() {
    init_logger();
    let store = counter_store(0);
    let options = AdapterOptions::new().with_handlers(counter_handlers(&store));
    let dispatch = create_dispatch(&store, options);

    let result = dispatch.dispatch(Thunk::new(|_, _| Err("thunk exploded".into())));
    assert_eq!(result, None);

    dispatch.dispatch("INCREMENT");
    assert_eq!(counter_of(&store.get_state()), 1);
}

#[test]
fn thunks_drive_state_methods_and_reach_views() {
    let ipc = IpcMain::new();
    let store = method_store(0);
    let window = MockEndpoint::new(1);
    let bridge = main_bridge(&ipc, &store, &[], AdapterOptions::new(), BridgeConfig::default());
    bridge.subscribe(&[window.target()]);

    let result = bridge.dispatch(Thunk::new(|get_state, dispatch| {
        dispatch.dispatch("increment");
        dispatch.dispatch("increment");
        if counter_of(&get_state()) != 2 {
            return Err("thunk saw stale state".into());
        }
        dispatch.dispatch("decrement");
        Ok(Value::from(counter_of(&get_state())))
    }));

    assert_eq!(result, Some(json!(1)));
    assert_eq!(
        window.sent_on(SUBSCRIBE_CHANNEL),
        vec![
            json!({ "counter": 0 }),
            json!({ "counter": 1 }),
            json!({ "counter": 2 }),
            json!({ "counter": 1 }),
        ]
    );
}

#[test]
fn handler_failure_is_contained() {
    let store = counter_store(4);
    let options = AdapterOptions::new().with_handlers(counter_handlers(&store));
    let dispatch = create_dispatch(&store, options);

    dispatch.dispatch_with("SET_COUNTER", Some(json!("not a number")));
    dispatch.dispatch("DECREMENT");

    assert_eq!(counter_of(&store.get_state()), 3);
}

// ============================================================================
// Priority
// ============================================================================

#[test]
fn handler_wins_over_root_reducer() {
    let store = counter_store(0);
    let handled = Rc::new(Cell::new(0));
    let reduced = Rc::new(Cell::new(0));
    let handler_hits = handled.clone();
    let reducer_hits = reduced.clone();
    let options = AdapterOptions::new()
        .with_handlers(HandlerMap::new().handler("X", move |_| {
            handler_hits.set(handler_hits.get() + 1);
            Ok(())
        }))
        .with_reducer(move |state: &State, _: &Action| {
            reducer_hits.set(reducer_hits.get() + 1);
            Ok(state.clone())
        });
    let dispatch = create_dispatch(&store, options);

    dispatch.dispatch(json!({ "type": "X" }));
    assert_eq!((handled.get(), reduced.get()), (1, 0));

    dispatch.dispatch(json!({ "type": "Y" }));
    assert_eq!((handled.get(), reduced.get()), (1, 1));
}

#[test]
fn reducer_store_keeps_state_when_reducer_fails() {
    let store = ReducerStore::new(
        |state: &State, action: &Action| match action.action_type.as_str() {
            "INCREMENT" => Ok(State::object().with("counter", counter_of(state) + 1)),
            "BROKEN" => Err("reducer exploded".into()),
            _ => Ok(state.clone()),
        },
        State::object().with("counter", 0i64),
    );
    let dispatch = create_dispatch(&store, AdapterOptions::new());

    dispatch.dispatch("INCREMENT");
    dispatch.dispatch("BROKEN");
    dispatch.dispatch("INCREMENT");

    assert_eq!(counter_of(&store.get_state()), 2);
}
