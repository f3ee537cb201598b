use std::{collections::BTreeMap, rc::Rc};

use serde_json::Value;

use zubridge_shared::{BoxError, Callable, State};

/// A tree that action types are resolved against: either a [`HandlerMap`]
/// or the state itself (whose callable members act as implicit handlers).
pub trait HandlerTree {
    /// Child by exact key, falling back to a case-insensitive match
    fn child(&self, key: &str) -> Option<&Self>;

    fn handler(&self) -> Option<&Callable>;
}

/// Resolves `action_type` to a handler. First match wins:
///
/// 1. a top-level key equal to the whole type (exact, then ignoring case)
/// 2. if the type contains `.`, a walk down the tree one segment at a time,
///    each segment matched exactly or ignoring case
pub fn resolve_handler<T: HandlerTree>(root: &T, action_type: &str) -> Option<Callable> {
    if let Some(handler) = root.child(action_type).and_then(T::handler) {
        return Some(handler.clone());
    }
    if !action_type.contains('.') {
        return None;
    }

    let mut node = root;
    for segment in action_type.split('.') {
        node = node.child(segment)?;
    }
    node.handler().cloned()
}

/// One entry of a [`HandlerMap`]
#[derive(Clone)]
pub enum HandlerNode {
    Handler(Callable),
    Group(BTreeMap<String, HandlerNode>),
}

impl HandlerTree for HandlerNode {
    fn child(&self, key: &str) -> Option<&Self> {
        let HandlerNode::Group(entries) = self else {
            return None;
        };
        if let Some(node) = entries.get(key) {
            return Some(node);
        }
        let lowered = key.to_lowercase();
        entries
            .iter()
            .find(|(name, _)| name.to_lowercase() == lowered)
            .map(|(_, node)| node)
    }

    fn handler(&self) -> Option<&Callable> {
        match self {
            HandlerNode::Handler(handler) => Some(handler),
            HandlerNode::Group(_) => None,
        }
    }
}

impl HandlerTree for State {
    fn child(&self, key: &str) -> Option<&Self> {
        self.get_ignore_case(key)
    }

    fn handler(&self) -> Option<&Callable> {
        self.as_callable()
    }
}

/// Custom per-action-type handlers, possibly nested:
///
/// ```
/// # use zubridge_server::HandlerMap;
/// let handlers = HandlerMap::new()
///     .handler("reset", |_| Ok(()))
///     .group("counter", HandlerMap::new().handler("increment", |_| Ok(())));
/// assert!(handlers.resolve("COUNTER.Increment").is_some());
/// ```
#[derive(Clone)]
pub struct HandlerMap {
    root: HandlerNode,
}

impl HandlerMap {
    pub fn new() -> Self {
        Self {
            root: HandlerNode::Group(BTreeMap::new()),
        }
    }

    pub fn handler<K, F>(mut self, key: K, handler: F) -> Self
    where
        K: Into<String>,
        F: Fn(Option<Value>) -> Result<(), BoxError> + 'static,
    {
        self.insert(key, HandlerNode::Handler(Rc::new(handler)));
        self
    }

    pub fn group<K: Into<String>>(mut self, key: K, group: HandlerMap) -> Self {
        self.insert(key, group.root);
        self
    }

    pub fn insert<K: Into<String>>(&mut self, key: K, node: HandlerNode) {
        if let HandlerNode::Group(entries) = &mut self.root {
            entries.insert(key.into(), node);
        }
    }

    pub fn is_empty(&self) -> bool {
        match &self.root {
            HandlerNode::Group(entries) => entries.is_empty(),
            HandlerNode::Handler(_) => false,
        }
    }

    pub fn resolve(&self, action_type: &str) -> Option<Callable> {
        resolve_handler(&self.root, action_type)
    }
}

impl Default for HandlerMap {
    fn default() -> Self {
        Self::new()
    }
}
