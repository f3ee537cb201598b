/// A view-side stub talking to a coordinator bridge over the in-process
/// control channel
use std::{cell::RefCell, rc::Rc};

use zubridge_client::{ClientError, ThunkPolicy, ViewBridge, ViewConfig, ViewRequest};
use zubridge_server::{
    main_bridge,
    shared::{json, Action, Target, Value},
    transport::{IpcRenderer, LocalWindow},
    AdapterOptions, BridgeConfig, IpcMain,
};
use zubridge_test::{counter_handlers, counter_of, counter_store, init_logger, method_store};

fn view_for(window: &Rc<LocalWindow>) -> ViewBridge<IpcRenderer> {
    ViewBridge::new(window.renderer())
}

fn record(view: &ViewBridge<IpcRenderer>) -> Rc<RefCell<Vec<Value>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    // dropping the subscription keeps it attached
    let _subscription = view
        .subscribe(move |state| sink.borrow_mut().push(state.clone()))
        .unwrap();
    seen
}

#[test]
fn view_dispatch_updates_every_view() {
    init_logger();
    let ipc = IpcMain::new();
    let store = counter_store(0);
    let options = AdapterOptions::new().with_handlers(counter_handlers(&store));
    let bridge = main_bridge(&ipc, &store, &[], options, BridgeConfig::default());

    let first = LocalWindow::new(&ipc, 1);
    let second = LocalWindow::new(&ipc, 2);
    let first_view = view_for(&first);
    let second_view = view_for(&second);
    let first_seen = record(&first_view);
    let second_seen = record(&second_view);
    bridge.subscribe(&[
        Target::contents(&first),
        Target::contents(&second),
    ]);

    first_view.dispatch("INCREMENT").unwrap();
    second_view.dispatch_with("SET_COUNTER", Some(json!(10))).unwrap();
    assert_eq!(counter_of(&store.get_state()), 0);

    assert_eq!(ipc.receive(), 2);
    assert_eq!(counter_of(&store.get_state()), 10);
    for seen in [first_seen, second_seen] {
        assert_eq!(
            *seen.borrow(),
            vec![
                json!({ "counter": 0 }),
                json!({ "counter": 1 }),
                json!({ "counter": 10 }),
            ]
        );
    }
    assert_eq!(first_view.get_state(), Ok(json!({ "counter": 10 })));
}

#[test]
fn view_never_sees_callables_and_can_trigger_them() {
    let ipc = IpcMain::new();
    let store = method_store(3);
    let window = LocalWindow::new(&ipc, 1);
    let _bridge = main_bridge(
        &ipc,
        &store,
        &[Target::contents(&window)],
        AdapterOptions::new(),
        BridgeConfig::default(),
    );
    let view = view_for(&window);

    assert_eq!(view.get_state(), Ok(json!({ "counter": 3 })));

    view.dispatch(Action::new("Reset")).unwrap();
    ipc.receive();

    assert_eq!(view.get_state(), Ok(json!({ "counter": 0 })));
}

#[test]
fn view_thunks_never_reach_the_coordinator() {
    let ipc = IpcMain::new();
    let store = counter_store(0);
    let window = LocalWindow::new(&ipc, 1);
    let _bridge = main_bridge(&ipc, &store, &[], AdapterOptions::new(), BridgeConfig::default());

    let strict = view_for(&window);
    assert_eq!(
        strict.dispatch(ViewRequest::thunk(|| {})),
        Err(ClientError::ThunkNotSupported)
    );

    let lenient = ViewBridge::with_config(
        window.renderer(),
        ViewConfig::default().with_thunk_policy(ThunkPolicy::Decline),
    );
    assert_eq!(lenient.dispatch(ViewRequest::thunk(|| {})), Ok(()));

    assert_eq!(ipc.pending(), 0);
}

#[test]
fn view_of_destroyed_window_is_disconnected() {
    let ipc = IpcMain::new();
    let store = counter_store(0);
    let window = LocalWindow::new(&ipc, 1);
    let bridge = main_bridge(
        &ipc,
        &store,
        &[Target::contents(&window)],
        AdapterOptions::new(),
        BridgeConfig::default(),
    );
    let view = view_for(&window);

    window.destroy();

    assert!(matches!(view.dispatch("INCREMENT"), Err(ClientError::Transport(_))));
    assert!(matches!(view.subscribe(|_| {}), Err(ClientError::Transport(_))));
    assert!(bridge.subscribed_windows().is_empty());
}

#[test]
fn get_state_after_teardown_fails_cleanly() {
    let ipc = IpcMain::new();
    let store = counter_store(0);
    let window = LocalWindow::new(&ipc, 1);
    let bridge = main_bridge(&ipc, &store, &[], AdapterOptions::new(), BridgeConfig::default());
    let view = view_for(&window);

    bridge.destroy();

    assert!(matches!(view.get_state(), Err(ClientError::Transport(_))));
}
