use thiserror::Error;

/// Errors raised by the coordinator-side control channel
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IpcError {
    /// No request/response handler for the channel
    #[error("No handler registered for channel {channel:?}. Create a bridge before views request state")]
    NoHandler { channel: String },

    /// A second handler was registered for the same channel
    #[error("Attempted to register a second handler for channel {channel:?}. Remove the existing handler first")]
    HandlerAlreadyRegistered { channel: String },

    /// The registered handler failed
    #[error("Handler for channel {channel:?} failed: {reason}")]
    HandlerFailed { channel: String, reason: String },
}

/// Failures swallowed at the `process_action` / `dispatch` boundary. They are
/// only ever logged, never returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// A handler from the handler mapping failed
    #[error("Handler for action {action_type:?} failed: {reason}. State is unchanged")]
    Handler { action_type: String, reason: String },

    /// The root reducer failed
    #[error("Reducer failed for action {action_type:?}: {reason}. Previous state retained")]
    Reducer { action_type: String, reason: String },

    /// A method attached to the state failed
    #[error("State method for action {action_type:?} failed: {reason}")]
    StateMethod { action_type: String, reason: String },

    /// A thunk failed
    #[error("Thunk failed: {reason}")]
    Thunk { reason: String },

    /// The dispatch input was not an action, a type string or a thunk
    #[error("Invalid action {received}. Dispatch accepts an action object with a string type, an action type string, or a thunk")]
    InvalidRequest { received: String },
}
