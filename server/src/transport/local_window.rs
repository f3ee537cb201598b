use std::{
    cell::RefCell,
    collections::HashMap,
    rc::{Rc, Weak},
};

use log::{debug, trace};
use serde_json::Value;

use zubridge_shared::{
    Endpoint, EndpointCallback, EndpointError, EndpointEvent, EndpointHost, EndpointId,
    ListenerKey, MessageListener, Transport, TransportError,
};

use crate::{IpcError, IpcMain};

/// An in-process view endpoint connected to an [`IpcMain`].
///
/// The coordinator talks to it through [`Endpoint`]; the view talks back
/// through the [`IpcRenderer`] returned by [`LocalWindow::renderer`].
pub struct LocalWindow {
    id: EndpointId,
    ipc: IpcMain,
    state: RefCell<WindowState>,
}

struct WindowState {
    destroyed: bool,
    loading: bool,
    pending: Vec<(EndpointEvent, EndpointCallback)>,
    view_listeners: HashMap<String, Vec<(ListenerKey, MessageListener)>>,
    next_key: u64,
}

impl LocalWindow {
    /// Creates a window that has already finished loading
    pub fn new(ipc: &IpcMain, id: u32) -> Rc<Self> {
        Self::create(ipc, id, false)
    }

    /// Creates a window that is still loading. Call
    /// [`LocalWindow::finish_load`] to complete it.
    pub fn loading(ipc: &IpcMain, id: u32) -> Rc<Self> {
        Self::create(ipc, id, true)
    }

    fn create(ipc: &IpcMain, id: u32, loading: bool) -> Rc<Self> {
        Rc::new(Self {
            id: EndpointId::new(id),
            ipc: ipc.clone(),
            state: RefCell::new(WindowState {
                destroyed: false,
                loading,
                pending: Vec::new(),
                view_listeners: HashMap::new(),
                next_key: 0,
            }),
        })
    }

    pub fn endpoint_id(&self) -> EndpointId {
        self.id
    }

    /// The view-side handle onto the control channel
    pub fn renderer(self: &Rc<Self>) -> IpcRenderer {
        IpcRenderer {
            id: self.id,
            window: Rc::downgrade(self),
            ipc: self.ipc.clone(),
        }
    }

    // Lifecycle

    /// Starts a (re)load. Messages sent meanwhile are the caller's concern.
    pub fn start_loading(&self) {
        let mut state = self.state.borrow_mut();
        if !state.destroyed {
            state.loading = true;
        }
    }

    pub fn finish_load(&self) {
        {
            let mut state = self.state.borrow_mut();
            if state.destroyed || !state.loading {
                return;
            }
            state.loading = false;
        }
        self.fire(EndpointEvent::DidFinishLoad);
    }

    pub fn destroy(&self) {
        {
            let mut state = self.state.borrow_mut();
            if state.destroyed {
                return;
            }
            debug!("destroying local window {}", self.id);
            state.destroyed = true;
            state.loading = false;
            state.view_listeners.clear();
            // a destroyed window never finishes loading
            state
                .pending
                .retain(|(event, _)| *event == EndpointEvent::Destroyed);
        }
        self.fire(EndpointEvent::Destroyed);
    }

    fn fire(&self, event: EndpointEvent) {
        let callbacks: Vec<EndpointCallback> = {
            let mut state = self.state.borrow_mut();
            let (fired, kept) = std::mem::take(&mut state.pending)
                .into_iter()
                .partition(|(pending_event, _)| *pending_event == event);
            state.pending = kept;
            fired.into_iter().map(|(_, callback)| callback).collect()
        };

        trace!(
            "window {} firing {:?} to {} listener(s)",
            self.id,
            event,
            callbacks.len()
        );
        for callback in callbacks {
            callback();
        }
    }

    pub fn pending_listener_count(&self, event: EndpointEvent) -> usize {
        self.state
            .borrow()
            .pending
            .iter()
            .filter(|(pending_event, _)| *pending_event == event)
            .count()
    }

    // View side

    fn add_view_listener(&self, channel: &str, listener: MessageListener) -> Option<ListenerKey> {
        let mut state = self.state.borrow_mut();
        if state.destroyed {
            return None;
        }
        let key = ListenerKey::new(state.next_key);
        state.next_key += 1;
        state
            .view_listeners
            .entry(channel.to_string())
            .or_default()
            .push((key, listener));
        Some(key)
    }

    fn remove_view_listener(&self, channel: &str, key: ListenerKey) {
        let mut state = self.state.borrow_mut();
        if let Some(list) = state.view_listeners.get_mut(channel) {
            list.retain(|(listener_key, _)| *listener_key != key);
        }
    }
}

impl Endpoint for LocalWindow {
    fn id(&self) -> Result<EndpointId, EndpointError> {
        if self.state.borrow().destroyed {
            return Err(EndpointError::Destroyed);
        }
        Ok(self.id)
    }

    fn is_destroyed(&self) -> Result<bool, EndpointError> {
        Ok(self.state.borrow().destroyed)
    }

    fn is_loading(&self) -> Result<bool, EndpointError> {
        let state = self.state.borrow();
        if state.destroyed {
            return Err(EndpointError::Destroyed);
        }
        Ok(state.loading)
    }

    fn send(&self, channel: &str, payload: &Value) -> Result<(), EndpointError> {
        let listeners: Vec<MessageListener> = {
            let state = self.state.borrow();
            if state.destroyed {
                return Err(EndpointError::Destroyed);
            }
            state
                .view_listeners
                .get(channel)
                .map(|list| list.iter().map(|(_, listener)| listener.clone()).collect())
                .unwrap_or_default()
        };

        for listener in listeners {
            listener(payload);
        }
        Ok(())
    }

    fn once(&self, event: EndpointEvent, callback: EndpointCallback) -> Result<(), EndpointError> {
        let mut state = self.state.borrow_mut();
        if state.destroyed {
            return Err(EndpointError::Destroyed);
        }
        state.pending.push((event, callback));
        Ok(())
    }
}

/// Wraps a [`LocalWindow`] the way a native window wraps its web contents
pub struct LocalWindowHost {
    window: Rc<LocalWindow>,
}

impl LocalWindowHost {
    pub fn new(window: &Rc<LocalWindow>) -> Rc<Self> {
        Rc::new(Self {
            window: window.clone(),
        })
    }

    pub fn window(&self) -> &Rc<LocalWindow> {
        &self.window
    }
}

impl EndpointHost for LocalWindowHost {
    fn contents(&self) -> Result<Rc<dyn Endpoint>, EndpointError> {
        Ok(self.window.clone())
    }
}

/// View-side half of the control channel for one [`LocalWindow`]
#[derive(Clone)]
pub struct IpcRenderer {
    id: EndpointId,
    window: Weak<LocalWindow>,
    ipc: IpcMain,
}

impl IpcRenderer {
    fn live_window(&self) -> Result<Rc<LocalWindow>, TransportError> {
        match self.window.upgrade() {
            Some(window) if !window.is_gone() => Ok(window),
            _ => Err(TransportError::Disconnected),
        }
    }
}

impl Transport for IpcRenderer {
    fn send(&self, channel: &str, payload: Value) -> Result<(), TransportError> {
        self.live_window()?;
        if self.ipc.post(self.id, channel, payload) {
            Ok(())
        } else {
            Err(TransportError::Disconnected)
        }
    }

    fn invoke(&self, channel: &str) -> Result<Value, TransportError> {
        self.live_window()?;
        self.ipc
            .invoke(channel, self.id)
            .map_err(|error| match error {
                IpcError::NoHandler { channel } => TransportError::NoHandler { channel },
                IpcError::HandlerFailed { channel, reason } => {
                    TransportError::HandlerFailed { channel, reason }
                }
                IpcError::HandlerAlreadyRegistered { channel } => TransportError::HandlerFailed {
                    channel,
                    reason: "conflicting handler registration".to_string(),
                },
            })
    }

    fn on(&self, channel: &str, listener: MessageListener) -> Result<ListenerKey, TransportError> {
        self.live_window()?
            .add_view_listener(channel, listener)
            .ok_or(TransportError::Disconnected)
    }

    fn remove_listener(&self, channel: &str, key: ListenerKey) {
        if let Some(window) = self.window.upgrade() {
            window.remove_view_listener(channel, key);
        }
    }
}
