use std::rc::Rc;

use log::warn;

use zubridge_shared::{Action, State};

use crate::{
    store::{ReducerStore, StateListener, Unsubscribe},
    ActionError,
};

use super::{AdapterOptions, StateManager};

/// [`StateManager`] over a [`ReducerStore`].
///
/// Custom handlers are consulted first; anything else goes to the store's
/// own reducer, which always matches. A supplied root reducer is ignored
/// here because the store carries its own.
pub struct ReducerAdapter {
    store: Rc<ReducerStore>,
    options: AdapterOptions,
}

impl ReducerAdapter {
    pub fn new(store: &Rc<ReducerStore>, options: AdapterOptions) -> Self {
        if options.reducer.is_some() {
            warn!("root reducer option ignored: reducer stores dispatch through their own reducer");
        }
        Self {
            store: store.clone(),
            options,
        }
    }

    pub fn store(&self) -> &Rc<ReducerStore> {
        &self.store
    }

    fn apply(&self, action: &Action) -> Result<(), ActionError> {
        if let Some(handler) = self.options.handlers.resolve(&action.action_type) {
            return handler(action.payload.clone()).map_err(|error| ActionError::Handler {
                action_type: action.action_type.clone(),
                reason: error.to_string(),
            });
        }

        self.store
            .dispatch(action)
            .map_err(|error| ActionError::Reducer {
                action_type: action.action_type.clone(),
                reason: error.to_string(),
            })
    }
}

impl StateManager for ReducerAdapter {
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
