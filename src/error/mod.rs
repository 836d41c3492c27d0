//! Error types for turn routing.

use thiserror::Error;

/// Primary error type for all routing operations.
#[derive(Error, Debug)]
pub enum RouterError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Similarity selector unavailable: {0}")]
    SelectorUnavailable(String),

    #[error("Planner for '{agent}' has no state for {steps} prior tool results")]
    PlannerStateOverflow { agent: String, steps: usize },

    #[error("Tool unavailable: {tool}: {message}")]
    ToolUnavailable { tool: String, message: String },

    #[error("Tool returned an invalid response: {tool}: {message}")]
    ToolInvalidResponse { tool: String, message: String },

    #[error("Tool '{tool}' timed out after {timeout_ms}ms")]
    ToolTimeout { tool: String, timeout_ms: u64 },

    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limited: retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Broad error category, used to pick the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Selector,
    Planner,
    Tool,
    Timeout,
    Network,
    Authentication,
    RateLimit,
    Configuration,
    Serialization,
    Api,
    Unknown,
}

impl RouterError {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a `ToolInvalidResponse` error.
    pub fn invalid_response(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolInvalidResponse {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SelectorUnavailable(_) => ErrorCategory::Selector,
            Self::PlannerStateOverflow { .. } | Self::UnknownAgent(_) => ErrorCategory::Planner,
            Self::ToolUnavailable { .. }
            | Self::ToolInvalidResponse { .. }
            | Self::InvalidArgument(_) => ErrorCategory::Tool,
            Self::ToolTimeout { .. } | Self::Timeout(_) => ErrorCategory::Timeout,
            Self::Network(_) => ErrorCategory::Network,
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::RateLimited { .. } => ErrorCategory::RateLimit,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                429 => ErrorCategory::RateLimit,
                _ => ErrorCategory::Api,
            },
            Self::Io(_) => ErrorCategory::Unknown,
        }
    }

    /// Message shown to the chat user when a turn fails.
    pub fn user_message(&self) -> String {
        match self {
            Self::ToolUnavailable { tool, .. } => {
                format!("Sorry, the '{tool}' service is unavailable right now. Please try again later.")
            }
            Self::ToolInvalidResponse { tool, .. } => {
                format!("Sorry, I could not understand the response from '{tool}'. Please rephrase and try again.")
            }
            Self::ToolTimeout { tool, .. } => {
                format!("Sorry, '{tool}' took too long to respond. Please try again.")
            }
            _ => match self.category() {
                ErrorCategory::Authentication => {
                    "Sorry, the assistant is not authorized to reach its language model.".to_string()
                }
                ErrorCategory::RateLimit => {
                    "Sorry, the assistant is busy right now. Please try again in a moment.".to_string()
                }
                ErrorCategory::Configuration => {
                    "Sorry, the assistant is misconfigured and cannot answer.".to_string()
                }
                _ => "Sorry, something went wrong while handling your message.".to_string(),
            },
        }
    }

    /// Attribute a failure raised while executing `tool` to that tool.
    ///
    /// Transport failures become `ToolUnavailable`, unusable input becomes
    /// `ToolInvalidResponse`; errors that already name a tool pass through.
    pub fn into_tool_failure(self, tool: &str) -> Self {
        match self {
            Self::ToolUnavailable { .. }
            | Self::ToolInvalidResponse { .. }
            | Self::ToolTimeout { .. } => self,
            Self::Timeout(ms) => Self::ToolTimeout {
                tool: tool.to_string(),
                timeout_ms: ms,
            },
            Self::Serialization(e) => Self::ToolInvalidResponse {
                tool: tool.to_string(),
                message: e.to_string(),
            },
            Self::InvalidArgument(message) => Self::ToolInvalidResponse {
                tool: tool.to_string(),
                message,
            },
            Self::Network(_)
            | Self::Api { .. }
            | Self::Authentication(_)
            | Self::RateLimited { .. }
            | Self::Io(_) => Self::ToolUnavailable {
                tool: tool.to_string(),
                message: self.to_string(),
            },
            other => other,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, RouterError>;
