use std::{cell::RefCell, rc::Rc};

use zubridge_server::{StateListener, StateManager, Unsubscribe};
use zubridge_shared::{Action, State};

/// A [`StateManager`] that only records the actions it is asked to process
#[derive(Default)]
pub struct RecordingManager {
    processed: RefCell<Vec<Action>>,
}

impl RecordingManager {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn processed(&self) -> Vec<Action> {
        self.processed.borrow().clone()
    }
}

impl StateManager for RecordingManager {
    fn get_state(&self) -> State {
        State::object()
    }

    fn subscribe(&self, _listener: StateListener) -> Unsubscribe {
        Unsubscribe::noop()
    }

    fn process_action(&self, action: &Action) {
        self.processed.borrow_mut().push(action.clone());
    }
}
