use serde_json::Value;
use smol::channel::{self, Receiver, Sender, TryRecvError};

use zubridge_shared::EndpointId;

/// A fire-and-forget message sent by a view to the coordinator
#[derive(Clone, Debug, PartialEq)]
pub struct InboundMessage {
    pub sender: EndpointId,
    pub channel: String,
    pub payload: Value,
}

/// Unbounded, ordered queue carrying view -> coordinator messages
pub struct MessageChannel;

impl MessageChannel {
    pub fn unbounded() -> (MessageSender, MessageReceiver) {
        let (sender, receiver) = channel::unbounded();
        (MessageSender { sender }, MessageReceiver { receiver })
    }
}

#[derive(Clone)]
pub struct MessageSender {
    sender: Sender<InboundMessage>,
}

impl MessageSender {
    /// Returns false if the receiving side is gone
    pub fn send(&self, message: InboundMessage) -> bool {
        self.sender.try_send(message).is_ok()
    }
}

pub struct MessageReceiver {
    receiver: Receiver<InboundMessage>,
}

impl MessageReceiver {
    /// Takes the next queued message, if any. Messages come out in the order
    /// they were sent.
    pub fn receive(&self) -> Option<InboundMessage> {
        match self.receiver.try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}
