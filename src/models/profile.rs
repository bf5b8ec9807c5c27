use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The profile handed back by the identity provider at login.
///
/// Its shape is up to the provider, so it is kept as a JSON object with a
/// couple of convenience accessors.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct UserProfile(pub Map<String, Value>);

impl UserProfile {
    pub fn new(fields: Map<String, Value>) -> Self {
        UserProfile(fields)
    }

    /// Identifier of the user at the provider (`user_id`, falling back to `sub`).
    pub fn user_id(&self) -> Option<&str> {
        self.get_str("user_id").or_else(|| self.get_str("sub"))
    }

    pub fn name(&self) -> Option<&str> {
        self.get_str("name").or_else(|| self.get_str("nickname"))
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl TryFrom<Value> for UserProfile {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(UserProfile(map)),
            other => Err(format!("profile must be a JSON object, got {}", other)),
        }
    }
}
