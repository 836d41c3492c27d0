//! Typed access to a tool's input value.

use serde::de::DeserializeOwned;

use crate::error::RouterError;

/// The input a planner passed to a tool: raw text or a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolArguments {
    raw: serde_json::Value,
}

impl ToolArguments {
    pub fn new(raw: serde_json::Value) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &serde_json::Value {
        &self.raw
    }

    /// Field of an object input.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.raw.get(key)
    }

    /// Required string field of an object input.
    pub fn get_str(&self, key: &str) -> Result<&str, RouterError> {
        self.raw
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| RouterError::InvalidArgument(format!("missing string argument '{key}'")))
    }

    /// The input as text: a bare string input, or the string field `key`.
    pub fn text(&self, key: &str) -> Result<String, RouterError> {
        match &self.raw {
            serde_json::Value::String(s) => Ok(s.clone()),
            _ => self.get_str(key).map(str::to_string),
        }
    }

    /// Deserialize field `key`, or `T::default()` if it is absent or null.
    pub fn field_or_default<T>(&self, key: &str) -> Result<T, RouterError>
    where
        T: DeserializeOwned + Default,
    {
        match self.raw.get(key) {
            None | Some(serde_json::Value::Null) => Ok(T::default()),
            Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
                RouterError::InvalidArgument(format!("invalid argument '{key}': {e}"))
            }),
        }
    }
}
