use std::rc::Rc;

use zubridge_shared::{Action, BoxError, State};

use crate::store::Reducer;

use super::HandlerMap;

/// Per-adapter configuration: custom action handlers and/or a root reducer
#[derive(Clone, Default)]
pub struct AdapterOptions {
    /// Consulted first, by exact then case-insensitive then nested-path match
    pub handlers: HandlerMap,
    /// Consulted when no handler matches
    pub reducer: Option<Reducer>,
}

impl AdapterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handlers(mut self, handlers: HandlerMap) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn with_reducer<F>(mut self, reducer: F) -> Self
    where
        F: Fn(&State, &Action) -> Result<State, BoxError> + 'static,
    {
        self.reducer = Some(Rc::new(reducer));
        self
    }
}
