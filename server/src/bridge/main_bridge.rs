use std::rc::Rc;

use serde_json::Value;

use zubridge_shared::{EndpointId, State, Target};

use crate::{
    dispatch::{DispatchRequest, Dispatcher},
    registry::get_state_manager,
    state_manager::{AdapterOptions, StateManager},
    store::Container,
    IpcMain,
};

use super::{create_core_bridge, BridgeConfig, CoreBridge, SubscriptionHandle};

/// A [`CoreBridge`] over a state container together with the coordinator's
/// [`Dispatcher`] for it. Both share the registry's adapter for the
/// container.
pub struct MainBridge {
    core: CoreBridge,
    dispatcher: Dispatcher,
}

/// Bridges `container` to the views behind `targets`.
///
/// The adapter is fetched from the registry, so a second bridge or a
/// [`create_dispatch`] over the same container reuses it. `options` only
/// apply if this call creates the adapter.
pub fn main_bridge<C: Into<Container>>(
    ipc: &IpcMain,
    container: C,
    targets: &[Target],
    options: AdapterOptions,
    config: BridgeConfig,
) -> MainBridge {
    let container = container.into();
    let manager = get_state_manager(&container, options);
    let core = create_core_bridge(ipc, manager.clone(), targets, config);

    MainBridge {
        core,
        dispatcher: Dispatcher::new(manager),
    }
}

/// A coordinator-side dispatch function for `container`, without any view
/// wiring
pub fn create_dispatch<C: Into<Container>>(container: C, options: AdapterOptions) -> Dispatcher {
    Dispatcher::new(get_state_manager(&container.into(), options))
}

impl MainBridge {
    pub fn subscribe(&self, targets: &[Target]) -> SubscriptionHandle {
        self.core.subscribe(targets)
    }

    pub fn unsubscribe(&self, targets: Option<&[Target]>) {
        self.core.unsubscribe(targets);
    }

    pub fn subscribed_windows(&self) -> Vec<EndpointId> {
        self.core.subscribed_windows()
    }

    pub fn dispatch<R: Into<DispatchRequest>>(&self, request: R) -> Option<Value> {
        self.dispatcher.dispatch(request)
    }

    pub fn dispatch_with<R: Into<DispatchRequest>>(
        &self,
        request: R,
        payload: Option<Value>,
    ) -> Option<Value> {
        self.dispatcher.dispatch_with(request, payload)
    }

    pub fn get_state(&self) -> State {
        self.dispatcher.get_state()
    }

    pub fn manager(&self) -> &Rc<dyn StateManager> {
        self.core.manager()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn core(&self) -> &CoreBridge {
        &self.core
    }

    pub fn destroy(&self) {
        self.core.destroy();
    }
}
