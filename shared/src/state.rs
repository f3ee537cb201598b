use std::{collections::BTreeMap, fmt, rc::Rc};

use serde_json::{Map, Number, Value};

/// Error type returned by user-supplied handlers, reducers, thunks and state
/// methods.
pub type BoxError = Box<dyn std::error::Error + 'static>;

/// A function value that can live inside a [`State`] tree (a state-attached
/// method) or inside a handler mapping. Receives the action payload.
pub type Callable = Rc<dyn Fn(Option<Value>) -> Result<(), BoxError>>;

/// The coordinator-owned state tree.
///
/// Structurally a JSON document, except that any member may also be a
/// [`Callable`]. Callables never cross a process boundary: [`State::sanitize`]
/// strips them before every send.
#[derive(Clone, Default)]
pub enum State {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<State>),
    Object(BTreeMap<String, State>),
    Callable(Callable),
}

impl State {
    /// An empty object
    pub fn object() -> Self {
        State::Object(BTreeMap::new())
    }

    pub fn callable<F>(function: F) -> Self
    where
        F: Fn(Option<Value>) -> Result<(), BoxError> + 'static,
    {
        State::Callable(Rc::new(function))
    }

    /// Inserts a member, turning a non-object state into an empty object
    /// first. Builder-style.
    pub fn with<K: Into<String>, V: Into<State>>(mut self, key: K, value: V) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert<K: Into<String>, V: Into<State>>(&mut self, key: K, value: V) -> Option<State> {
        if !matches!(self, State::Object(_)) {
            *self = State::object();
        }
        match self {
            State::Object(members) => members.insert(key.into(), value.into()),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&State> {
        match self {
            State::Object(members) => members.get(key),
            _ => None,
        }
    }

    /// Looks up a member by exact name first, then by case-insensitive name
    pub fn get_ignore_case(&self, key: &str) -> Option<&State> {
        let State::Object(members) = self else {
            return None;
        };
        if let Some(value) = members.get(key) {
            return Some(value);
        }
        let lowered = key.to_lowercase();
        members
            .iter()
            .find(|(name, _)| name.to_lowercase() == lowered)
            .map(|(_, value)| value)
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            State::Callable(callable) => Some(callable),
            _ => None,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, State::Callable(_))
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            State::Number(number) => number.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            State::Number(number) => number.as_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            State::String(value) => Some(value),
            _ => None,
        }
    }

    /// Shallow merge of `update` into `self`: when both are objects the
    /// top-level members of `update` overwrite those of `self`, otherwise
    /// `update` replaces `self` wholesale.
    pub fn merge(&mut self, update: State) {
        match (self, update) {
            (State::Object(current), State::Object(incoming)) => {
                current.extend(incoming);
            }
            (current, incoming) => *current = incoming,
        }
    }

    /// Produces the transferable form of this state: every callable member
    /// (object property or array element) is removed, recursively, and all
    /// other values pass through unchanged. A callable at the root becomes
    /// `null`.
    pub fn sanitize(&self) -> Value {
        match self {
            State::Null | State::Callable(_) => Value::Null,
            State::Bool(value) => Value::Bool(*value),
            State::Number(value) => Value::Number(value.clone()),
            State::String(value) => Value::String(value.clone()),
            State::Array(items) => Value::Array(
                items
                    .iter()
                    .filter(|item| !item.is_callable())
                    .map(State::sanitize)
                    .collect(),
            ),
            State::Object(members) => {
                let mut output = Map::new();
                for (key, value) in members {
                    if value.is_callable() {
                        continue;
                    }
                    output.insert(key.clone(), value.sanitize());
                }
                Value::Object(output)
            }
        }
    }

    /// Returns true if any member of the tree is callable
    pub fn contains_callable(&self) -> bool {
        match self {
            State::Callable(_) => true,
            State::Array(items) => items.iter().any(State::contains_callable),
            State::Object(members) => members.values().any(State::contains_callable),
            _ => false,
        }
    }
}

impl From<Value> for State {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => State::Null,
            Value::Bool(value) => State::Bool(value),
            Value::Number(value) => State::Number(value),
            Value::String(value) => State::String(value),
            Value::Array(items) => State::Array(items.into_iter().map(State::from).collect()),
            Value::Object(members) => State::Object(
                members
                    .into_iter()
                    .map(|(key, value)| (key, State::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for State {
    fn from(value: &str) -> Self {
        State::String(value.to_string())
    }
}

impl From<bool> for State {
    fn from(value: bool) -> Self {
        State::Bool(value)
    }
}

impl From<i64> for State {
    fn from(value: i64) -> Self {
        State::Number(value.into())
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (State::Null, State::Null) => true,
            (State::Bool(a), State::Bool(b)) => a == b,
            (State::Number(a), State::Number(b)) => a == b,
            (State::String(a), State::String(b)) => a == b,
            (State::Array(a), State::Array(b)) => a == b,
            (State::Object(a), State::Object(b)) => a == b,
            (State::Callable(a), State::Callable(b)) => {
                Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
            }
            _ => false,
        }
    }
}

impl PartialEq<Value> for State {
    fn eq(&self, other: &Value) -> bool {
        !self.contains_callable() && &self.sanitize() == other
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Null => write!(f, "null"),
            State::Bool(value) => write!(f, "{}", value),
            State::Number(value) => write!(f, "{}", value),
            State::String(value) => write!(f, "{:?}", value),
            State::Array(items) => f.debug_list().entries(items).finish(),
            State::Object(members) => f.debug_map().entries(members).finish(),
            State::Callable(_) => write!(f, "<callable>"),
        }
    }
}
