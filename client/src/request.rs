use std::fmt;

use serde_json::Value;

use zubridge_shared::Action;

/// What a view may pass to [`ViewBridge::dispatch`](crate::ViewBridge::dispatch)
pub enum ViewRequest {
    Action(Action),
    Type(String),
    /// Only representable so it can be refused
    Thunk(Box<dyn FnOnce()>),
}

impl ViewRequest {
    pub fn thunk<F: FnOnce() + 'static>(thunk: F) -> Self {
        ViewRequest::Thunk(Box::new(thunk))
    }

    /// Wire form, `None` for thunks. A separate `payload` is attached to a
    /// bare type, and to an action only when it has none of its own.
    pub(crate) fn into_action(self, payload: Option<Value>) -> Option<Action> {
        match self {
            ViewRequest::Action(mut action) => {
                if action.payload.is_none() {
                    action.payload = payload;
                }
                Some(action)
            }
            ViewRequest::Type(action_type) => Some(Action {
                action_type,
                payload,
            }),
            ViewRequest::Thunk(_) => None,
        }
    }
}

impl fmt::Debug for ViewRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewRequest::Action(action) => f.debug_tuple("Action").field(action).finish(),
            ViewRequest::Type(action_type) => f.debug_tuple("Type").field(action_type).finish(),
            ViewRequest::Thunk(_) => write!(f, "Thunk"),
        }
    }
}

impl From<Action> for ViewRequest {
    fn from(action: Action) -> Self {
        ViewRequest::Action(action)
    }
}

impl From<&str> for ViewRequest {
    fn from(action_type: &str) -> Self {
        ViewRequest::Type(action_type.to_string())
    }
}

impl From<String> for ViewRequest {
    fn from(action_type: String) -> Self {
        ViewRequest::Type(action_type)
    }
}
