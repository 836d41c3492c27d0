//! Tool and turn outputs.

use serde::{Deserialize, Serialize};

/// Result of one tool call: a primary value plus summary and detail text.
///
/// The primary value is usually text; the input parser returns a JSON object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolOutput {
    pub primary: serde_json::Value,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub detail: String,
}

impl ToolOutput {
    /// Plain text result with empty summary and detail.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            primary: serde_json::Value::String(text.into()),
            summary: String::new(),
            detail: String::new(),
        }
    }

    /// Structured result with empty summary and detail.
    pub fn structured(value: serde_json::Value) -> Self {
        Self {
            primary: value,
            summary: String::new(),
            detail: String::new(),
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    /// The primary value as text. Strings are returned as-is, other JSON is serialized.
    pub fn primary_text(&self) -> String {
        match &self.primary {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// What one processed turn returns to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TurnResponse {
    pub session_id: String,
    pub response: String,
    pub summary: String,
    pub detail: String,
}

impl TurnResponse {
    pub fn from_output(session_id: impl Into<String>, output: ToolOutput) -> Self {
        Self {
            session_id: session_id.into(),
            response: output.primary_text(),
            summary: output.summary,
            detail: output.detail,
        }
    }
}
