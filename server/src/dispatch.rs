use std::{fmt, rc::Rc};

use log::warn;
use serde_json::Value;

use zubridge_shared::{Action, BoxError, State};

use crate::{state_manager::StateManager, ActionError};

type ThunkBody = Box<dyn FnOnce(&dyn Fn() -> State, &Dispatcher) -> Result<Value, BoxError>>;

/// A coordinator-only mutation request: a closure run with a `get_state`
/// capability and the [`Dispatcher`] itself, so it can dispatch further
/// (including nested thunks). Never serialized, never sent to a view.
pub struct Thunk {
    body: ThunkBody,
}

impl Thunk {
    pub fn new<F>(body: F) -> Self
    where
        F: FnOnce(&dyn Fn() -> State, &Dispatcher) -> Result<Value, BoxError> + 'static,
    {
        Self {
            body: Box::new(body),
        }
    }
}

impl fmt::Debug for Thunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Thunk")
    }
}

/// The request shapes [`Dispatcher::dispatch`] accepts
#[derive(Debug)]
pub enum DispatchRequest {
    Thunk(Thunk),
    Action(Action),
    /// An action type; the payload is passed alongside
    Type(String),
    /// Anything else received from an untyped source. Logged and dropped.
    Invalid(Value),
}

impl From<Thunk> for DispatchRequest {
    fn from(thunk: Thunk) -> Self {
        DispatchRequest::Thunk(thunk)
    }
}

impl From<Action> for DispatchRequest {
    fn from(action: Action) -> Self {
        DispatchRequest::Action(action)
    }
}

impl From<&str> for DispatchRequest {
    fn from(action_type: &str) -> Self {
        DispatchRequest::Type(action_type.to_string())
    }
}

impl From<String> for DispatchRequest {
    fn from(action_type: String) -> Self {
        DispatchRequest::Type(action_type)
    }
}

impl From<Value> for DispatchRequest {
    fn from(value: Value) -> Self {
        if let Value::String(action_type) = value {
            return DispatchRequest::Type(action_type);
        }
        match Action::from_value(&value) {
            Some(action) => DispatchRequest::Action(action),
            None => DispatchRequest::Invalid(value),
        }
    }
}

/// The single entry point coordinator code mutates state through.
///
/// Nothing dispatched here ever fails the caller: handler, reducer and thunk
/// errors are logged and the request treated as a no-op.
#[derive(Clone)]
pub struct Dispatcher {
    manager: Rc<dyn StateManager>,
}

impl Dispatcher {
    pub fn new(manager: Rc<dyn StateManager>) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &Rc<dyn StateManager> {
        &self.manager
    }

    pub fn get_state(&self) -> State {
        self.manager.get_state()
    }

    pub fn dispatch<R: Into<DispatchRequest>>(&self, request: R) -> Option<Value> {
        self.dispatch_with(request, None)
    }

    /// Dispatches `request`. `payload` is attached to a bare action type, and
    /// to an action object only when it carries no payload of its own.
    /// Returns the thunk's result for thunks, `None` otherwise or on failure.
    pub fn dispatch_with<R: Into<DispatchRequest>>(
        &self,
        request: R,
        payload: Option<Value>,
    ) -> Option<Value> {
        match request.into() {
            DispatchRequest::Thunk(thunk) => self.run_thunk(thunk),
            DispatchRequest::Type(action_type) => {
                self.manager.process_action(&Action {
                    action_type,
                    payload,
                });
                None
            }
            DispatchRequest::Action(mut action) => {
                if action.payload.is_none() {
                    action.payload = payload;
                }
                self.manager.process_action(&action);
                None
            }
            DispatchRequest::Invalid(value) => {
                warn!(
                    "{}",
                    ActionError::InvalidRequest {
                        received: value.to_string()
                    }
                );
                None
            }
        }
    }

    fn run_thunk(&self, thunk: Thunk) -> Option<Value> {
        let manager = self.manager.clone();
        let get_state = move || manager.get_state();

        match (thunk.body)(&get_state, self) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(
                    "{}",
                    ActionError::Thunk {
                        reason: error.to_string()
                    }
                );
                None
            }
        }
    }
}
