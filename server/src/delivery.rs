use std::rc::Rc;

use log::{debug, trace, warn};
use serde_json::Value;

use zubridge_shared::{Endpoint, EndpointEvent};

/// Sends `payload` to `endpoint` on `channel`, never failing the caller.
///
/// Returns false if the endpoint is destroyed, can't send, or the send
/// errored. If the endpoint is still loading, delivery is deferred until it
/// finishes loading and true is returned: the message was accepted, not
/// delivered. A deferred send is dropped if the endpoint is destroyed first.
pub fn safe_send(endpoint: &Rc<dyn Endpoint>, channel: &str, payload: &Value) -> bool {
    if endpoint.is_gone() {
        return false;
    }
    if !endpoint.can_send() {
        debug!("endpoint cannot send, dropping message on {:?}", channel);
        return false;
    }

    match endpoint.is_loading() {
        Ok(true) => defer_until_loaded(endpoint, channel, payload),
        Ok(false) => match endpoint.send(channel, payload) {
            Ok(()) => true,
            Err(error) => {
                warn!("failed to send message on {:?}: {}", channel, error);
                false
            }
        },
        Err(error) => {
            debug!("endpoint loading status unavailable: {}", error);
            false
        }
    }
}

fn defer_until_loaded(endpoint: &Rc<dyn Endpoint>, channel: &str, payload: &Value) -> bool {
    let target = Rc::downgrade(endpoint);
    let channel_name = channel.to_string();
    let payload = payload.clone();

    let deferred = Box::new(move || {
        let Some(endpoint) = target.upgrade() else {
            return;
        };
        if endpoint.is_gone() {
            trace!("endpoint destroyed before load finished, dropping deferred send");
            return;
        }
        if let Err(error) = endpoint.send(&channel_name, &payload) {
            debug!("deferred send on {:?} failed: {}", channel_name, error);
        }
    });

    match endpoint.once(EndpointEvent::DidFinishLoad, deferred) {
        Ok(()) => {
            trace!("endpoint still loading, deferred message on {:?}", channel);
            true
        }
        Err(error) => {
            warn!("could not defer message on {:?}: {}", channel, error);
            false
        }
    }
}
