use std::rc::Rc;

use log::{debug, warn};
use serde_json::Value;

use zubridge_shared::{ListenerKey, Transport};

use crate::{ClientError, ThunkPolicy, ViewConfig, ViewRequest};

/// The view-side stub: everything a view may do with coordinator state.
///
/// State updates pushed by the coordinator arrive on the `subscribe`
/// channel; [`ViewBridge::get_state`] asks for the current snapshot
/// directly, and [`ViewBridge::dispatch`] forwards actions. Thunks are
/// refused according to the configured [`ThunkPolicy`].
pub struct ViewBridge<T: Transport + 'static> {
    transport: Rc<T>,
    config: ViewConfig,
}

impl<T: Transport + 'static> ViewBridge<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ViewConfig::default())
    }

    pub fn with_config(transport: T, config: ViewConfig) -> Self {
        Self {
            transport: Rc::new(transport),
            config,
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Calls `callback` with every state snapshot the coordinator pushes.
    /// Fails if the view is already disconnected.
    pub fn subscribe<F: Fn(&Value) + 'static>(
        &self,
        callback: F,
    ) -> Result<ViewSubscription, ClientError> {
        let channel = self.config.channels.subscribe.clone();
        let key = self.transport.on(&channel, Rc::new(callback))?;
        Ok(ViewSubscription {
            transport: self.transport.clone(),
            channel,
            key,
        })
    }

    /// Requests the current sanitized state from the coordinator
    pub fn get_state(&self) -> Result<Value, ClientError> {
        Ok(self.transport.invoke(&self.config.channels.get_state)?)
    }

    pub fn dispatch<R: Into<ViewRequest>>(&self, request: R) -> Result<(), ClientError> {
        self.dispatch_with(request, None)
    }

    /// Forwards an action or action type to the coordinator. `payload` is
    /// attached to a bare type, and to an action that has none.
    pub fn dispatch_with<R: Into<ViewRequest>>(
        &self,
        request: R,
        payload: Option<Value>,
    ) -> Result<(), ClientError> {
        let Some(action) = request.into().into_action(payload) else {
            return self.refuse_thunk();
        };

        debug!("forwarding action {:?}", action.action_type);
        self.transport
            .send(&self.config.channels.dispatch, action.to_value())?;
        Ok(())
    }

    fn refuse_thunk(&self) -> Result<(), ClientError> {
        match self.config.thunk_policy {
            ThunkPolicy::Reject => Err(ClientError::ThunkNotSupported),
            ThunkPolicy::Decline => {
                warn!("{}", ClientError::ThunkNotSupported);
                Ok(())
            }
        }
    }
}

/// Detaches a [`ViewBridge::subscribe`] callback. Dropping it leaves the
/// callback attached.
pub struct ViewSubscription {
    transport: Rc<dyn Transport>,
    channel: String,
    key: ListenerKey,
}

impl ViewSubscription {
    pub fn unsubscribe(self) {
        self.transport.remove_listener(&self.channel, self.key);
    }
}
