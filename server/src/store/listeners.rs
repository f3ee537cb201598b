use std::{
    cell::RefCell,
    collections::VecDeque,
    fmt,
    rc::{Rc, Weak},
};

use zubridge_shared::State;

/// Receives every post-mutation state snapshot
pub type StateListener = Rc<dyn Fn(&State)>;

/// Handle returned by every `subscribe`. Calling
/// [`Unsubscribe::unsubscribe`] detaches the listener; dropping the handle
/// leaves the listener attached.
pub struct Unsubscribe {
    callback: Option<Box<dyn FnOnce()>>,
}

impl Unsubscribe {
    pub fn new<F: FnOnce() + 'static>(callback: F) -> Self {
        Self {
            callback: Some(Box::new(callback)),
        }
    }

    pub fn noop() -> Self {
        Self { callback: None }
    }

    pub fn unsubscribe(mut self) {
        if let Some(callback) = self.callback.take() {
            callback();
        }
    }
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unsubscribe")
            .field("attached", &self.callback.is_some())
            .finish()
    }
}

/// Ordered listener registry shared by the reference stores.
///
/// Notifications are synchronous. A mutation made from inside a listener is
/// queued and delivered once the current snapshot has reached every
/// listener, so no listener ever sees an older state after a newer one.
pub(crate) struct ListenerSet {
    inner: Rc<RefCell<ListenerState>>,
}

#[derive(Default)]
struct ListenerState {
    listeners: Vec<(u64, StateListener)>,
    next_key: u64,
    queue: VecDeque<State>,
    notifying: bool,
}

impl ListenerState {
    fn contains(&self, key: u64) -> bool {
        self.listeners.iter().any(|(listener_key, _)| *listener_key == key)
    }
}

impl ListenerSet {
    pub(crate) fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ListenerState::default())),
        }
    }

    pub(crate) fn add(&self, listener: StateListener) -> Unsubscribe {
        let key = {
            let mut state = self.inner.borrow_mut();
            let key = state.next_key;
            state.next_key += 1;
            state.listeners.push((key, listener));
            key
        };

        let set: Weak<RefCell<ListenerState>> = Rc::downgrade(&self.inner);
        Unsubscribe::new(move || {
            if let Some(set) = set.upgrade() {
                set.borrow_mut()
                    .listeners
                    .retain(|(listener_key, _)| *listener_key != key);
            }
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    pub(crate) fn notify(&self, snapshot: State) {
        {
            let mut state = self.inner.borrow_mut();
            state.queue.push_back(snapshot);
            if state.notifying {
                return;
            }
            state.notifying = true;
        }

        loop {
            let (snapshot, listeners) = {
                let mut state = self.inner.borrow_mut();
                let Some(snapshot) = state.queue.pop_front() else {
                    state.notifying = false;
                    return;
                };
                (snapshot, state.listeners.clone())
            };

            for (key, listener) in listeners {
                // skip listeners detached by an earlier listener
                if !self.inner.borrow().contains(key) {
                    continue;
                }
                listener(&snapshot);
            }
        }
    }
}
