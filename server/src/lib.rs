//! # Zubridge Server
//! The coordinator side of a state bridge: owns the authoritative state
//! container, pushes sanitized snapshots to every subscribed view endpoint
//! and applies the actions views dispatch back over the control channel.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod transport;
pub mod shared {
    pub use zubridge_shared::{
        json, same_endpoint, Action, BoxError, Callable, ChannelNames, Endpoint, EndpointCallback,
        EndpointError, EndpointEvent, EndpointHost, EndpointId, ListenerKey, MessageListener,
        State, Target, Transport, TransportError, Value, DISPATCH_CHANNEL, GET_STATE_CHANNEL,
        SUBSCRIBE_CHANNEL,
    };
}

mod bridge;
mod delivery;
mod dispatch;
mod endpoint_tracker;
mod error;
mod ipc;
mod registry;
mod state_manager;
mod store;

pub use bridge::{
    create_core_bridge, create_dispatch, main_bridge, BridgeConfig, CoreBridge, MainBridge,
    SubscriptionHandle,
};
pub use delivery::safe_send;
pub use dispatch::{DispatchRequest, Dispatcher, Thunk};
pub use endpoint_tracker::EndpointTracker;
pub use error::{ActionError, IpcError};
pub use ipc::{IpcHandler, IpcListener, IpcMain};
pub use registry::{
    get_state_manager, has_state_manager, remove_state_manager, state_manager_count,
};
pub use state_manager::{
    resolve_handler, AdapterOptions, HandlerMap, HandlerNode, HandlerTree, ReducerAdapter,
    StateManager, StoreAdapter, SET_STATE_ACTION,
};
pub use store::{
    Container, Reducer, ReducerStore, StateListener, Store, StoreApi, Unsubscribe,
};
