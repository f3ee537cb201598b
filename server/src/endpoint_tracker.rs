use std::{
    cell::RefCell,
    collections::{BTreeSet, HashMap},
    rc::{Rc, Weak},
};

use log::{debug, trace};

use zubridge_shared::{same_endpoint, Endpoint, EndpointEvent, EndpointId};

/// Keeps the live set of subscribed endpoints.
///
/// Three structures are kept in step: a non-owning `id -> Weak` association
/// used to answer identity queries, the set of active ids, and a strong
/// `id -> Rc` index that exists only so the active endpoints can be
/// enumerated. "Destroyed" is the authoritative liveness signal: every
/// enumeration sweeps out endpoints found destroyed, and each tracked
/// endpoint carries a one-shot destroy hook that removes it eagerly. An
/// endpoint tracked again after being untracked reuses its pending hook.
///
/// Cloning yields another handle onto the same tracker.
#[derive(Clone)]
pub struct EndpointTracker {
    inner: Rc<RefCell<TrackerState>>,
}

#[derive(Default)]
struct TrackerState {
    endpoints: HashMap<EndpointId, Weak<dyn Endpoint>>,
    active_ids: BTreeSet<EndpointId>,
    by_id: HashMap<EndpointId, Rc<dyn Endpoint>>,
    // id -> destroy hook still pending: its generation and the reference it
    // was installed on
    hooks: HashMap<EndpointId, (u64, Weak<dyn Endpoint>)>,
    next_hook: u64,
}

impl TrackerState {
    fn insert(&mut self, id: EndpointId, endpoint: &Rc<dyn Endpoint>) {
        self.endpoints.insert(id, Rc::downgrade(endpoint));
        self.active_ids.insert(id);
        self.by_id.insert(id, endpoint.clone());
    }

    fn remove(&mut self, id: &EndpointId) -> bool {
        self.endpoints.remove(id);
        self.by_id.remove(id);
        self.active_ids.remove(id)
    }

    fn tracked(&self, id: &EndpointId) -> Option<Rc<dyn Endpoint>> {
        self.endpoints.get(id).and_then(Weak::upgrade)
    }
}

impl EndpointTracker {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(TrackerState::default())),
        }
    }

    /// Starts tracking `endpoint`. Returns false, without side effects, if
    /// the endpoint is destroyed or can't be queried. Tracking an endpoint
    /// whose handle is already tracked and live is a no-op that returns true,
    /// even through a different reference to it.
    pub fn track(&self, endpoint: &Rc<dyn Endpoint>) -> bool {
        if endpoint.is_gone() {
            return false;
        }
        let Ok(id) = endpoint.id() else {
            return false;
        };

        let existing = self.inner.borrow().tracked(&id);
        if let Some(existing) = &existing {
            if same_endpoint(existing, endpoint) || !existing.is_gone() {
                return true;
            }
        }

        let hooked = self
            .inner
            .borrow()
            .hooks
            .get(&id)
            .and_then(|(_, hooked)| hooked.upgrade());
        let hook_pending = hooked.is_some_and(|hooked| same_endpoint(&hooked, endpoint));

        let generation = {
            let mut state = self.inner.borrow_mut();
            state.insert(id, endpoint);
            if hook_pending {
                return true;
            }
            // supersedes any hook left on a previous endpoint with this id
            let generation = state.next_hook;
            state.next_hook += 1;
            state
                .hooks
                .insert(id, (generation, Rc::downgrade(endpoint)));
            generation
        };

        let tracker = Rc::downgrade(&self.inner);
        let hook = Box::new(move || {
            let Some(tracker) = tracker.upgrade() else {
                return;
            };
            // removal is skipped if the tracker is mid-operation; the next
            // enumeration sweep catches the endpoint instead
            let Ok(mut state) = tracker.try_borrow_mut() else {
                return;
            };
            if state.hooks.get(&id).map(|(current, _)| *current) != Some(generation) {
                return;
            }
            state.hooks.remove(&id);
            if state.remove(&id) {
                debug!("endpoint {} destroyed, no longer tracked", id);
            }
        });

        if let Err(error) = endpoint.once(EndpointEvent::Destroyed, hook) {
            trace!("could not install destroy hook on endpoint {}: {}", id, error);
            self.inner.borrow_mut().hooks.remove(&id);
        }

        true
    }

    /// Stops tracking `endpoint`. Absent endpoints are ignored.
    pub fn untrack(&self, endpoint: &Rc<dyn Endpoint>) {
        let id = {
            let state = self.inner.borrow();
            state
                .by_id
                .iter()
                .find(|(_, tracked)| same_endpoint(tracked, endpoint))
                .map(|(id, _)| *id)
        };
        // a destroyed endpoint may no longer report its id, so identity is
        // checked first
        let id = id.or_else(|| endpoint.id().ok());
        if let Some(id) = id {
            self.untrack_by_id(&id);
        }
    }

    pub fn untrack_by_id(&self, id: &EndpointId) {
        if self.inner.borrow_mut().remove(id) {
            trace!("endpoint {} untracked", id);
        }
    }

    /// Whether `endpoint` is tracked, either as this exact reference or as
    /// another live reference with the same handle
    pub fn is_tracked(&self, endpoint: &Rc<dyn Endpoint>) -> bool {
        let id = endpoint.id().ok();
        let existing = {
            let state = self.inner.borrow();
            if state
                .by_id
                .values()
                .any(|tracked| same_endpoint(tracked, endpoint))
            {
                return true;
            }
            id.and_then(|id| state.tracked(&id))
        };
        existing.is_some_and(|existing| !existing.is_gone())
    }

    pub fn has_id(&self, id: &EndpointId) -> bool {
        self.inner.borrow().active_ids.contains(id)
    }

    /// Snapshot of the active handles, in ascending order
    pub fn active_ids(&self) -> Vec<EndpointId> {
        self.inner.borrow().active_ids.iter().copied().collect()
    }

    /// Enumerates the live endpoints, evicting any that turn out to be
    /// destroyed
    pub fn active_endpoints(&self) -> Vec<Rc<dyn Endpoint>> {
        let candidates: Vec<(EndpointId, Rc<dyn Endpoint>)> = {
            let state = self.inner.borrow();
            state
                .active_ids
                .iter()
                .filter_map(|id| state.by_id.get(id).map(|endpoint| (*id, endpoint.clone())))
                .collect()
        };

        let mut live = Vec::with_capacity(candidates.len());
        let mut dead = Vec::new();
        for (id, endpoint) in candidates {
            if endpoint.is_gone() {
                dead.push(id);
            } else {
                live.push(endpoint);
            }
        }

        if !dead.is_empty() {
            let mut state = self.inner.borrow_mut();
            for id in dead {
                state.hooks.remove(&id);
                if state.remove(&id) {
                    debug!("swept destroyed endpoint {}", id);
                }
            }
        }

        live
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().active_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().active_ids.is_empty()
    }

    /// Forgets every tracked endpoint. Destroy hooks already installed stay
    /// pending and are reused if an endpoint is tracked again.
    pub fn cleanup(&self) {
        let mut state = self.inner.borrow_mut();
        state.endpoints.clear();
        state.active_ids.clear();
        state.by_id.clear();
    }
}

impl Default for EndpointTracker {
    fn default() -> Self {
        Self::new()
    }
}
