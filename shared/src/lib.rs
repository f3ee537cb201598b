//! # Zubridge Shared
//! Common functionality shared between the zubridge-server (coordinator) &
//! zubridge-client (view) crates: actions, the state tree and its
//! sanitization, control channel identifiers, and the endpoint/transport
//! collaborator traits.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod action;
mod channels;
mod endpoint;
mod error;
mod state;
mod transport;

pub use action::Action;
pub use channels::{ChannelNames, DISPATCH_CHANNEL, GET_STATE_CHANNEL, SUBSCRIBE_CHANNEL};
pub use endpoint::{
    same_endpoint, Endpoint, EndpointCallback, EndpointEvent, EndpointHost, EndpointId, Target,
};
pub use error::{EndpointError, TransportError};
pub use state::{BoxError, Callable, State};
pub use transport::{ListenerKey, MessageListener, Transport};

pub use serde_json::{json, Value};
