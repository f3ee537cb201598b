mod container;
mod listeners;
mod observable_store;
mod reducer_store;

pub use container::Container;
pub use listeners::{StateListener, Unsubscribe};
pub(crate) use listeners::ListenerSet;
pub use observable_store::{Store, StoreApi};
pub use reducer_store::{Reducer, ReducerStore};
