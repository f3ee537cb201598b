use std::{
    any::Any,
    rc::{Rc, Weak},
};

use crate::state_manager::{AdapterOptions, ReducerAdapter, StateManager, StoreAdapter};

use super::{ReducerStore, Store};

/// A concrete state container, probed by shape: a setter-style observable
/// store or a reducer-style store with `dispatch`.
#[derive(Clone)]
pub enum Container {
    Store(Rc<Store>),
    Reducer(Rc<ReducerStore>),
}

impl Container {
    /// Builds the adapter matching this container's shape
    pub fn create_manager(&self, options: AdapterOptions) -> Rc<dyn StateManager> {
        match self {
            Container::Store(store) => Rc::new(StoreAdapter::new(store, options)),
            Container::Reducer(store) => Rc::new(ReducerAdapter::new(store, options)),
        }
    }

    /// Allocation address, used as the identity key
    pub(crate) fn identity(&self) -> usize {
        match self {
            Container::Store(store) => Rc::as_ptr(store) as *const () as usize,
            Container::Reducer(store) => Rc::as_ptr(store) as *const () as usize,
        }
    }

    pub(crate) fn downgrade(&self) -> Weak<dyn Any> {
        let any: Rc<dyn Any> = match self {
            Container::Store(store) => store.clone(),
            Container::Reducer(store) => store.clone(),
        };
        Rc::downgrade(&any)
    }
}

impl From<Rc<Store>> for Container {
    fn from(store: Rc<Store>) -> Self {
        Container::Store(store)
    }
}

impl From<&Rc<Store>> for Container {
    fn from(store: &Rc<Store>) -> Self {
        Container::Store(store.clone())
    }
}

impl From<Rc<ReducerStore>> for Container {
    fn from(store: Rc<ReducerStore>) -> Self {
        Container::Reducer(store)
    }
}

impl From<&Rc<ReducerStore>> for Container {
    fn from(store: &Rc<ReducerStore>) -> Self {
        Container::Reducer(store.clone())
    }
}
