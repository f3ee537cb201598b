use std::rc::{Rc, Weak};

use log::debug;

use zubridge_shared::{Endpoint, EndpointId};

use crate::endpoint_tracker::EndpointTracker;

/// Scoped result of [`CoreBridge::subscribe`](super::CoreBridge::subscribe).
///
/// Dropping the handle keeps the subscription alive; call
/// [`unsubscribe`](Self::unsubscribe) to remove exactly the endpoints the
/// originating call added.
pub struct SubscriptionHandle {
    tracker: EndpointTracker,
    endpoints: Vec<(EndpointId, Weak<dyn Endpoint>)>,
}

impl SubscriptionHandle {
    pub(crate) fn new(tracker: &EndpointTracker, added: Vec<(EndpointId, Rc<dyn Endpoint>)>) -> Self {
        Self {
            tracker: tracker.clone(),
            endpoints: added
                .into_iter()
                .map(|(id, endpoint)| (id, Rc::downgrade(&endpoint)))
                .collect(),
        }
    }

    pub(crate) fn empty(tracker: &EndpointTracker) -> Self {
        Self::new(tracker, Vec::new())
    }

    /// Ids of the endpoints this handle covers
    pub fn ids(&self) -> Vec<EndpointId> {
        self.endpoints.iter().map(|(id, _)| *id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn unsubscribe(self) {
        debug!("unsubscribing {} scoped endpoint(s)", self.endpoints.len());
        for (id, endpoint) in self.endpoints {
            match endpoint.upgrade() {
                Some(endpoint) => self.tracker.untrack(&endpoint),
                None => self.tracker.untrack_by_id(&id),
            }
        }
    }
}
