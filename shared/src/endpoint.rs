use std::{fmt, rc::Rc};

use log::trace;
use serde_json::Value;

use crate::EndpointError;

/// Stable positive integer handle of a view endpoint
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EndpointId(u32);

impl EndpointId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle events an endpoint can notify a one-shot listener about
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EndpointEvent {
    /// The host windowing system has destroyed the endpoint
    Destroyed,
    /// The endpoint finished loading and can now receive messages
    DidFinishLoad,
}

pub type EndpointCallback = Box<dyn FnOnce()>;

/// A process-boundary rendering target, owned by the windowing system.
///
/// Every fallible member returns an [`EndpointError`] when the underlying
/// object can no longer be accessed; callers treat such an endpoint as
/// destroyed.
pub trait Endpoint {
    fn id(&self) -> Result<EndpointId, EndpointError>;

    fn is_destroyed(&self) -> Result<bool, EndpointError>;

    fn is_loading(&self) -> Result<bool, EndpointError>;

    /// Whether this endpoint exposes the fire-and-forget send surface at all
    fn can_send(&self) -> bool {
        true
    }

    fn send(&self, channel: &str, payload: &Value) -> Result<(), EndpointError>;

    /// Registers a listener that fires at most once, the next time `event`
    /// happens
    fn once(&self, event: EndpointEvent, callback: EndpointCallback) -> Result<(), EndpointError>;

    /// Returns true when the endpoint is destroyed or can't be queried
    fn is_gone(&self) -> bool {
        match self.is_destroyed() {
            Ok(destroyed) => destroyed,
            Err(error) => {
                trace!("endpoint status unavailable, treating as destroyed: {}", error);
                true
            }
        }
    }
}

/// A container (e.g. a window) that exposes its endpoint through a nested
/// accessor rather than being the endpoint itself
pub trait EndpointHost {
    fn contents(&self) -> Result<Rc<dyn Endpoint>, EndpointError>;
}

/// Anything the bridge accepts where an endpoint is expected: the endpoint
/// itself or a host wrapping it
#[derive(Clone)]
pub enum Target {
    Contents(Rc<dyn Endpoint>),
    Host(Rc<dyn EndpointHost>),
}

impl Target {
    pub fn contents<E: Endpoint + 'static>(endpoint: &Rc<E>) -> Self {
        Target::Contents(endpoint.clone())
    }

    pub fn host<H: EndpointHost + 'static>(host: &Rc<H>) -> Self {
        Target::Host(host.clone())
    }

    /// Unwraps a host to its endpoint. Returns `None` if the host can't
    /// produce one.
    pub fn resolve(&self) -> Option<Rc<dyn Endpoint>> {
        match self {
            Target::Contents(endpoint) => Some(endpoint.clone()),
            Target::Host(host) => match host.contents() {
                Ok(endpoint) => Some(endpoint),
                Err(error) => {
                    trace!("endpoint host has no contents: {}", error);
                    None
                }
            },
        }
    }
}

impl From<Rc<dyn Endpoint>> for Target {
    fn from(endpoint: Rc<dyn Endpoint>) -> Self {
        Target::Contents(endpoint)
    }
}

impl From<Rc<dyn EndpointHost>> for Target {
    fn from(host: Rc<dyn EndpointHost>) -> Self {
        Target::Host(host)
    }
}

/// Compares two endpoint references by allocation identity
pub fn same_endpoint(a: &Rc<dyn Endpoint>, b: &Rc<dyn Endpoint>) -> bool {
    Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
}
