use thiserror::Error;

use zubridge_shared::TransportError;

/// Errors surfaced to view code
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// A thunk was dispatched from a view
    #[error("Thunks can only run in the coordinator process. Dispatch an action or action type instead")]
    ThunkNotSupported,

    #[error(transparent)]
    Transport(#[from] TransportError),
}
