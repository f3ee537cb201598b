//! # Zubridge Client
//! The view side of a state bridge. Wraps a restricted [`Transport`](shared::Transport) to
//! subscribe to coordinator state, read it on demand and forward actions.
//! Thunks never cross the process boundary.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use zubridge_shared::{
        json, Action, ChannelNames, ListenerKey, MessageListener, Transport, TransportError,
        Value, DISPATCH_CHANNEL, GET_STATE_CHANNEL, SUBSCRIBE_CHANNEL,
    };
}

mod error;
mod request;
mod view_bridge;
mod view_config;

pub use error::ClientError;
pub use request::ViewRequest;
pub use view_bridge::{ViewBridge, ViewSubscription};
pub use view_config::{ThunkPolicy, ViewConfig};
