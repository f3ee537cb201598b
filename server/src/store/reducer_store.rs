use std::{cell::RefCell, rc::Rc};

use zubridge_shared::{Action, BoxError, State};

use super::{ListenerSet, StateListener, Unsubscribe};

/// `(current state, action) -> next state`
pub type Reducer = Rc<dyn Fn(&State, &Action) -> Result<State, BoxError>>;

/// A reducer-style store: `get_state` / `dispatch` / `subscribe`
pub struct ReducerStore {
    reducer: Reducer,
    state: RefCell<State>,
    listeners: ListenerSet,
}

impl ReducerStore {
    pub fn new<F>(reducer: F, initial: State) -> Rc<Self>
    where
        F: Fn(&State, &Action) -> Result<State, BoxError> + 'static,
    {
        Rc::new(Self {
            reducer: Rc::new(reducer),
            state: RefCell::new(initial),
            listeners: ListenerSet::new(),
        })
    }

    pub fn get_state(&self) -> State {
        self.state.borrow().clone()
    }

    /// Runs the reducer and notifies listeners. If the reducer fails the
    /// previous state is kept, nobody is notified, and the error returned.
    pub fn dispatch(&self, action: &Action) -> Result<(), BoxError> {
        let current = self.get_state();
        let next = (self.reducer)(&current, action)?;
        *self.state.borrow_mut() = next.clone();
        self.listeners.notify(next);
        Ok(())
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
