use std::rc::Rc;

use serde_json::Value;

use crate::TransportError;

/// Callback invoked with each message pushed to a view on a channel
pub type MessageListener = Rc<dyn Fn(&Value)>;

/// Identifies a registered listener so it can be removed again
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerKey(u64);

impl ListenerKey {
    pub fn new(key: u64) -> Self {
        Self(key)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

/// The restricted, view-side half of the control channel
pub trait Transport {
    /// Fire-and-forget message to the coordinator
    fn send(&self, channel: &str, payload: Value) -> Result<(), TransportError>;

    /// Request/response call to the coordinator
    fn invoke(&self, channel: &str) -> Result<Value, TransportError>;

    /// Listens for messages the coordinator pushes on `channel`. Fails if
    /// the view is no longer connected.
    fn on(&self, channel: &str, listener: MessageListener) -> Result<ListenerKey, TransportError>;

    fn remove_listener(&self, channel: &str, key: ListenerKey);
}
