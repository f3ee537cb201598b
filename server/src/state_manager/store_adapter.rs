use std::rc::Rc;

use log::{debug, warn};

use zubridge_shared::{Action, State};

use crate::{
    store::{StateListener, Store, Unsubscribe},
    ActionError,
};

use super::{resolve_handler, AdapterOptions, StateManager};

/// Built-in action type that merges its payload into the state
pub const SET_STATE_ACTION: &str = "setState";

/// [`StateManager`] over an observable [`Store`].
///
/// Resolution order for an action, first match wins: custom handler, root
/// reducer, the built-in `setState`, a callable state member named like the
/// action type. Unmatched actions are dropped. A root reducer's result
/// replaces the state; `setState` merges into it.
pub struct StoreAdapter {
    store: Rc<Store>,
    options: AdapterOptions,
}

impl StoreAdapter {
    pub fn new(store: &Rc<Store>, options: AdapterOptions) -> Self {
        Self {
            store: store.clone(),
            options,
        }
    }

    pub fn store(&self) -> &Rc<Store> {
        &self.store
    }

    fn apply(&self, action: &Action) -> Result<(), ActionError> {
        let action_type = &action.action_type;

        if let Some(handler) = self.options.handlers.resolve(action_type) {
            return handler(action.payload.clone()).map_err(|error| ActionError::Handler {
                action_type: action_type.clone(),
                reason: error.to_string(),
            });
        }

        if let Some(reducer) = &self.options.reducer {
            let next = reducer(&self.store.get_state(), action).map_err(|error| {
                ActionError::Reducer {
                    action_type: action_type.clone(),
                    reason: error.to_string(),
                }
            })?;
            self.store.set_state(next, true);
            return Ok(());
        }

        if action_type == SET_STATE_ACTION {
            if let Some(payload) = &action.payload {
                self.store.set_state(State::from(payload.clone()), false);
            }
            return Ok(());
        }

        let method = resolve_handler(&self.store.get_state(), action_type);
        if let Some(method) = method {
            return method(action.payload.clone()).map_err(|error| ActionError::StateMethod {
                action_type: action_type.clone(),
                reason: error.to_string(),
            });
        }

        debug!("no handler for action {:?}, ignoring", action_type);
        Ok(())
    }
}

impl StateManager for StoreAdapter {
    fn get_state(&self) -> State {
        self.store.get_state()
    }

    fn subscribe(&self, listener: StateListener) -> Unsubscribe {
        self.store.subscribe_listener(listener)
    }

    fn process_action(&self, action: &Action) {
        if let Err(error) = self.apply(action) {
            warn!("{}", error);
        }
    }
}
