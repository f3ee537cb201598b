use thiserror::Error;

/// Errors raised by an endpoint when it is accessed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    /// The endpoint has been destroyed by the windowing system
    #[error("Endpoint has been destroyed. It must not be used after its destroyed event")]
    Destroyed,

    /// The endpoint does not expose a send capability
    #[error("Endpoint does not support sending on channel {channel:?}")]
    SendUnsupported { channel: String },

    /// Any other failure while reading from or writing to the endpoint
    #[error("Endpoint access failed: {reason}")]
    AccessFailed { reason: String },
}

/// Errors raised by a view-side transport
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The view is no longer connected to the coordinator
    #[error("Transport is disconnected from the coordinator. The view was destroyed or the channel closed")]
    Disconnected,

    /// No request/response handler is registered on the coordinator side
    #[error("No handler registered for channel {channel:?}. The coordinator bridge may not be created yet or was destroyed")]
    NoHandler { channel: String },

    /// The coordinator-side handler failed
    #[error("Handler for channel {channel:?} failed: {reason}")]
    HandlerFailed { channel: String, reason: String },
}
