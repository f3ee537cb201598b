use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
};

use log::{debug, info, trace, warn};
use serde_json::{Map, Value};

use zubridge_shared::{Action, Endpoint, EndpointId, ListenerKey, State, Target};

use crate::{
    delivery::safe_send,
    endpoint_tracker::EndpointTracker,
    state_manager::StateManager,
    store::Unsubscribe,
    IpcMain,
};

use super::{BridgeConfig, SubscriptionHandle};

/// Wires a [`StateManager`] to a dynamic set of view endpoints.
///
/// On creation it registers the `dispatch` listener and the `get-state`
/// handler on the control channel and subscribes once to the manager. Each
/// state change is sanitized once and sent to every endpoint that is active
/// at that moment.
pub struct CoreBridge {
    inner: Rc<BridgeInner>,
}

struct BridgeInner {
    manager: Rc<dyn StateManager>,
    tracker: EndpointTracker,
    ipc: IpcMain,
    config: BridgeConfig,
    dispatch_listener: Cell<Option<ListenerKey>>,
    owns_get_state: Cell<bool>,
    state_subscription: RefCell<Option<Unsubscribe>>,
    destroyed: Cell<bool>,
}

/// Creates a bridge between `manager` and the views behind `targets`.
/// Invalid or destroyed targets are skipped.
pub fn create_core_bridge(
    ipc: &IpcMain,
    manager: Rc<dyn StateManager>,
    targets: &[Target],
    config: BridgeConfig,
) -> CoreBridge {
    let inner = Rc::new(BridgeInner {
        manager,
        tracker: EndpointTracker::new(),
        ipc: ipc.clone(),
        config,
        dispatch_listener: Cell::new(None),
        owns_get_state: Cell::new(false),
        state_subscription: RefCell::new(None),
        destroyed: Cell::new(false),
    });

    for target in targets {
        if let Some(endpoint) = target.resolve() {
            inner.tracker.track(&endpoint);
        }
    }

    // Dispatch
    let bridge = Rc::downgrade(&inner);
    let key = ipc.on(&inner.config.channels.dispatch, move |sender, payload| {
        if let Some(bridge) = bridge.upgrade() {
            bridge.receive_action(sender, payload);
        }
        Ok(())
    });
    inner.dispatch_listener.set(Some(key));

    // Get State
    let bridge = Rc::downgrade(&inner);
    match ipc.handle(&inner.config.channels.get_state, move |sender| {
        Ok(BridgeInner::snapshot_for(&bridge, sender))
    }) {
        Ok(()) => inner.owns_get_state.set(true),
        Err(error) => warn!("bridge cannot serve state requests: {}", error),
    }

    // State changes
    let bridge = Rc::downgrade(&inner);
    let subscription = inner.manager.subscribe(Rc::new(move |state: &State| {
        if let Some(bridge) = bridge.upgrade() {
            bridge.broadcast(state);
        }
    }));
    *inner.state_subscription.borrow_mut() = Some(subscription);

    debug!(
        "bridge created with {} initial endpoint(s)",
        inner.tracker.len()
    );

    CoreBridge { inner }
}

impl CoreBridge {
    /// Subscribes the views behind `targets` to state updates and sends each
    /// newly added one the current state. Targets that are invalid,
    /// destroyed or already subscribed are skipped. The returned handle
    /// unsubscribes exactly the endpoints this call added.
    pub fn subscribe(&self, targets: &[Target]) -> SubscriptionHandle {
        if self.inner.destroyed.get() {
            warn!("subscribe called on a destroyed bridge");
            return SubscriptionHandle::empty(&self.inner.tracker);
        }

        let mut added: Vec<(EndpointId, Rc<dyn Endpoint>)> = Vec::new();
        for target in targets {
            let Some(endpoint) = target.resolve() else {
                continue;
            };
            if endpoint.is_gone() || self.inner.tracker.is_tracked(&endpoint) {
                continue;
            }
            let Ok(id) = endpoint.id() else {
                continue;
            };
            if self.inner.tracker.track(&endpoint) {
                added.push((id, endpoint));
            }
        }

        if !added.is_empty() {
            let snapshot = self.inner.manager.get_state().sanitize();
            for (id, endpoint) in &added {
                if !safe_send(endpoint, &self.inner.config.channels.subscribe, &snapshot) {
                    debug!("initial state not delivered to endpoint {}", id);
                }
            }
            info!("subscribed {} endpoint(s)", added.len());
        }

        SubscriptionHandle::new(&self.inner.tracker, added)
    }

    /// Unsubscribes the views behind `targets`, or every view when `None`
    pub fn unsubscribe(&self, targets: Option<&[Target]>) {
        match targets {
            None => {
                debug!("unsubscribing all {} endpoint(s)", self.inner.tracker.len());
                self.inner.tracker.cleanup();
            }
            Some(targets) => {
                for target in targets {
                    if let Some(endpoint) = target.resolve() {
                        self.inner.tracker.untrack(&endpoint);
                    }
                }
            }
        }
    }

    /// Handles of the currently subscribed endpoints, after sweeping out
    /// destroyed ones
    pub fn subscribed_windows(&self) -> Vec<EndpointId> {
        self.inner.tracker.active_endpoints();
        self.inner.tracker.active_ids()
    }

    pub fn manager(&self) -> &Rc<dyn StateManager> {
        &self.inner.manager
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.get()
    }

    /// Stops listening to the manager, deregisters from the control channel
    /// and forgets every endpoint. Actions arriving afterwards are ignored.
    pub fn destroy(&self) {
        if self.inner.destroyed.replace(true) {
            return;
        }

        let subscription = self.inner.state_subscription.borrow_mut().take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
        }
        self.inner.release_channel();
        self.inner.tracker.cleanup();

        info!("bridge destroyed");
    }
}

impl BridgeInner {
    fn receive_action(&self, sender: EndpointId, payload: &Value) {
        if self.destroyed.get() {
            trace!("bridge destroyed, ignoring action from endpoint {}", sender);
            return;
        }
        let Some(action) = Action::from_value(payload) else {
            warn!(
                "ignoring invalid action from endpoint {}: {}",
                sender, payload
            );
            return;
        };
        trace!("endpoint {} dispatched {:?}", sender, action.action_type);
        self.manager.process_action(&action);
    }

    fn snapshot_for(bridge: &Weak<BridgeInner>, sender: EndpointId) -> Value {
        match bridge.upgrade() {
            Some(bridge) if !bridge.destroyed.get() => bridge.manager.get_state().sanitize(),
            _ => {
                warn!(
                    "state requested by endpoint {} after bridge teardown",
                    sender
                );
                Value::Object(Map::new())
            }
        }
    }

    fn broadcast(&self, state: &State) {
        if self.destroyed.get() || self.tracker.is_empty() {
            return;
        }

        let snapshot = state.sanitize();
        for endpoint in self.tracker.active_endpoints() {
            if !safe_send(&endpoint, &self.config.channels.subscribe, &snapshot) {
                trace!("state update not delivered to an endpoint");
            }
        }
    }

    fn release_channel(&self) {
        if self.owns_get_state.replace(false) {
            self.ipc.remove_handler(&self.config.channels.get_state);
        }
        if let Some(key) = self.dispatch_listener.take() {
            self.ipc.remove_listener(&self.config.channels.dispatch, key);
        }
    }
}

impl Drop for BridgeInner {
    fn drop(&mut self) {
        if let Some(subscription) = self.state_subscription.get_mut().take() {
            subscription.unsubscribe();
        }
        self.release_channel();
    }
}
