use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Claims carried by a session token.
///
/// Only `exp` and `aud` matter to this application; everything else is kept
/// as-is so handlers can look at it.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Claims {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Either a single audience or a list, as issued by the provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Any additional claim fields we don't explicitly model.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}
