use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use zubridge_shared::State;

use super::{ListenerSet, StateListener, Unsubscribe};

/// A plain observable store: `get_state` / `set_state` / `subscribe`.
///
/// `set_state` merges the update into the top level of the current state
/// unless asked to replace it, then notifies every listener with the new
/// snapshot before returning.
pub struct Store {
    state: RefCell<State>,
    listeners: ListenerSet,
}

impl Store {
    pub fn new(initial: State) -> Rc<Self> {
        Rc::new(Self::build(initial))
    }

    /// Creates a store whose initial state is built with access to the
    /// store itself, so state-attached methods can mutate it later.
    pub fn create<F>(initializer: F) -> Rc<Self>
    where
        F: FnOnce(StoreApi) -> State,
    {
        Rc::new_cyclic(|store| {
            let api = StoreApi {
                store: store.clone(),
            };
            Self::build(initializer(api))
        })
    }

    fn build(initial: State) -> Self {
        Self {
            state: RefCell::new(initial),
            listeners: ListenerSet::new(),
        }
    }

    pub fn get_state(&self) -> State {
        self.state.borrow().clone()
    }

    pub fn set_state(&self, update: State, replace: bool) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            if replace {
                *state = update;
            } else {
                state.merge(update);
            }
            state.clone()
        };
        self.listeners.notify(snapshot);
    }

    /// Computes the update from the current state
    pub fn update<F>(&self, updater: F, replace: bool)
    where
        F: FnOnce(&State) -> State,
    {
        let update = updater(&self.get_state());
        self.set_state(update, replace);
    }

    pub fn subscribe<F>(&self, listener: F) -> Unsubscribe
    where
        F: Fn(&State) + 'static,
    {
        self.listeners.add(Rc::new(listener))
    }

    pub(crate) fn subscribe_listener(&self, listener: StateListener) -> Unsubscribe {
        self.listeners.add(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// Handle given to a [`Store::create`] initializer. Holds the store weakly.
#[derive(Clone)]
pub struct StoreApi {
    store: Weak<Store>,
}

impl StoreApi {
    /// Returns `State::Null` once the store is gone
    pub fn get_state(&self) -> State {
        self.store
            .upgrade()
            .map(|store| store.get_state())
            .unwrap_or_default()
    }

    pub fn set_state(&self, update: State, replace: bool) {
        if let Some(store) = self.store.upgrade() {
            store.set_state(update, replace);
        }
    }

    pub fn update<F>(&self, updater: F, replace: bool)
    where
        F: FnOnce(&State) -> State,
    {
        if let Some(store) = self.store.upgrade() {
            store.update(updater, replace);
        }
    }
}
