use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A request to mutate state. `action_type` is the only routing key; it is
/// matched case-insensitively and may use `a.b.c` paths to reach nested
/// handlers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl Action {
    pub fn new<S: Into<String>>(action_type: S) -> Self {
        Self {
            action_type: action_type.into(),
            payload: None,
        }
    }

    pub fn with_payload<S: Into<String>>(action_type: S, payload: Value) -> Self {
        Self {
            action_type: action_type.into(),
            payload: Some(payload),
        }
    }

    /// Reads an Action out of a message payload. Returns `None` unless the
    /// value is an object carrying a string `type`. A `null` payload reads
    /// as no payload.
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    pub fn to_value(&self) -> Value {
        // string keys and JSON values only, serialization can't fail
        serde_json::to_value(self).unwrap_or_default()
    }
}
