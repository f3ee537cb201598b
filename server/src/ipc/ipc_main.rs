use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
};

use log::{trace, warn};
use serde_json::Value;

use zubridge_shared::{BoxError, EndpointId, ListenerKey};

use crate::{
    transport::{InboundMessage, MessageChannel, MessageReceiver, MessageSender},
    IpcError,
};

/// Fire-and-forget listener: `(sender, payload)`
pub type IpcListener = Rc<dyn Fn(EndpointId, &Value) -> Result<(), BoxError>>;
/// Request/response handler: `sender -> response`
pub type IpcHandler = Rc<dyn Fn(EndpointId) -> Result<Value, BoxError>>;

/// Coordinator side of the shared control channel.
///
/// Views post fire-and-forget messages into an ordered queue which is drained
/// by [`IpcMain::receive`]; request/response calls go straight to the
/// registered handler. Cloning yields another handle onto the same channel.
#[derive(Clone)]
pub struct IpcMain {
    inner: Rc<IpcInner>,
}

struct IpcInner {
    listeners: RefCell<HashMap<String, Vec<(ListenerKey, IpcListener)>>>,
    handlers: RefCell<HashMap<String, IpcHandler>>,
    next_key: Cell<u64>,
    sender: MessageSender,
    receiver: MessageReceiver,
}

impl IpcMain {
    pub fn new() -> Self {
        let (sender, receiver) = MessageChannel::unbounded();
        Self {
            inner: Rc::new(IpcInner {
                listeners: RefCell::new(HashMap::new()),
                handlers: RefCell::new(HashMap::new()),
                next_key: Cell::new(0),
                sender,
                receiver,
            }),
        }
    }

    // Listeners

    /// Registers a listener for fire-and-forget messages on `channel`.
    /// Listeners run in registration order.
    pub fn on<F>(&self, channel: &str, listener: F) -> ListenerKey
    where
        F: Fn(EndpointId, &Value) -> Result<(), BoxError> + 'static,
    {
        let key = ListenerKey::new(self.inner.next_key.get());
        self.inner.next_key.set(key.get() + 1);

        self.inner
            .listeners
            .borrow_mut()
            .entry(channel.to_string())
            .or_default()
            .push((key, Rc::new(listener)));

        key
    }

    /// Returns false if no such listener was registered
    pub fn remove_listener(&self, channel: &str, key: ListenerKey) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let Some(list) = listeners.get_mut(channel) else {
            return false;
        };
        let before = list.len();
        list.retain(|(listener_key, _)| *listener_key != key);
        let removed = list.len() != before;
        if list.is_empty() {
            listeners.remove(channel);
        }
        removed
    }

    pub fn listener_count(&self, channel: &str) -> usize {
        self.inner
            .listeners
            .borrow()
            .get(channel)
            .map_or(0, |list| list.len())
    }

    // Handlers

    /// Registers the single request/response handler for `channel`
    pub fn handle<F>(&self, channel: &str, handler: F) -> Result<(), IpcError>
    where
        F: Fn(EndpointId) -> Result<Value, BoxError> + 'static,
    {
        let mut handlers = self.inner.handlers.borrow_mut();
        if handlers.contains_key(channel) {
            return Err(IpcError::HandlerAlreadyRegistered {
                channel: channel.to_string(),
            });
        }
        handlers.insert(channel.to_string(), Rc::new(handler));
        Ok(())
    }

    pub fn remove_handler(&self, channel: &str) -> bool {
        self.inner.handlers.borrow_mut().remove(channel).is_some()
    }

    pub fn has_handler(&self, channel: &str) -> bool {
        self.inner.handlers.borrow().contains_key(channel)
    }

    /// Performs a request/response call on behalf of `sender`
    pub fn invoke(&self, channel: &str, sender: EndpointId) -> Result<Value, IpcError> {
        let handler = self.inner.handlers.borrow().get(channel).cloned();
        let Some(handler) = handler else {
            return Err(IpcError::NoHandler {
                channel: channel.to_string(),
            });
        };
        handler(sender).map_err(|error| IpcError::HandlerFailed {
            channel: channel.to_string(),
            reason: error.to_string(),
        })
    }

    // Messages

    /// Queues a fire-and-forget message from `sender`. It is delivered to
    /// listeners on the next [`IpcMain::receive`].
    pub fn post(&self, sender: EndpointId, channel: &str, payload: Value) -> bool {
        self.inner.sender.send(InboundMessage {
            sender,
            channel: channel.to_string(),
            payload,
        })
    }

    pub fn pending(&self) -> usize {
        self.inner.receiver.len()
    }

    /// Must be called regularly. Delivers every queued message, in arrival
    /// order, and returns how many were processed. Listener failures are
    /// logged and never interrupt the loop.
    pub fn receive(&self) -> usize {
        let mut processed = 0;
        while let Some(message) = self.inner.receiver.receive() {
            self.emit(message.sender, &message.channel, &message.payload);
            processed += 1;
        }
        processed
    }

    /// Delivers a message to the listeners of `channel` immediately
    pub fn emit(&self, sender: EndpointId, channel: &str, payload: &Value) {
        let listeners: Vec<IpcListener> = match self.inner.listeners.borrow().get(channel) {
            Some(list) => list.iter().map(|(_, listener)| listener.clone()).collect(),
            None => {
                trace!("no listeners for message on channel {:?}", channel);
                return;
            }
        };

        for listener in listeners {
            if let Err(error) = listener(sender, payload) {
                warn!(
                    "listener on channel {:?} failed for message from endpoint {}: {}",
                    channel, sender, error
                );
            }
        }
    }
}

impl Default for IpcMain {
    fn default() -> Self {
        Self::new()
    }
}
