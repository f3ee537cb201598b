mod handlers;
mod options;
mod reducer_adapter;
mod store_adapter;

pub use handlers::{resolve_handler, HandlerMap, HandlerNode, HandlerTree};
pub use options::AdapterOptions;
pub use reducer_adapter::ReducerAdapter;
pub use store_adapter::{StoreAdapter, SET_STATE_ACTION};

use zubridge_shared::{Action, State};

use crate::store::{StateListener, Unsubscribe};

/// Uniform access to whichever concrete state container is in use.
///
/// `process_action` never fails: every error raised while applying an
/// action is logged and the action treated as a no-op. `subscribe` delivers
/// the post-mutation snapshot synchronously, in mutation order.
pub trait StateManager {
    fn get_state(&self) -> State;

    fn subscribe(&self, listener: StateListener) -> Unsubscribe;

    fn process_action(&self, action: &Action);
}
