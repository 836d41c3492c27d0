//! Agent corpus: agent kinds, their few-shot examples, and the registry.

pub mod executor;
pub mod registry;

pub use executor::AgentExecutor;
pub use registry::AgentRegistry;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identifier of an agent kind.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AgentKind {
    /// Fallback agent: forwards the turn to the general-purpose model.
    CasualChat,
    /// Parses language, words and sentence count, then asks for example sentences.
    LanguageStudy,
}

impl AgentKind {
    /// The kind bound when no task agent matches.
    pub const FALLBACK: AgentKind = AgentKind::CasualChat;

    pub fn is_fallback(self) -> bool {
        self == Self::FALLBACK
    }
}

/// One few-shot example: a user input and the structured value it should parse to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Example {
    pub input: String,
    pub output: serde_json::Value,
}

impl Example {
    pub fn new(input: impl Into<String>, output: serde_json::Value) -> Self {
        Self {
            input: input.into(),
            output,
        }
    }
}

/// A registered agent kind and its examples.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentDescriptor {
    pub kind: AgentKind,
    pub description: String,
    pub examples: Vec<Example>,
}

impl AgentDescriptor {
    /// The fallback casual-chat agent.
    pub fn casual_chat() -> Self {
        Self {
            kind: AgentKind::CasualChat,
            description: "Casual chat with the user".into(),
            examples: vec![
                Example::new("hi", serde_json::Value::Null),
                Example::new("hello", serde_json::Value::Null),
            ],
        }
    }

    /// The language-study agent.
    pub fn language_study() -> Self {
        Self {
            kind: AgentKind::LanguageStudy,
            description: "Help you learn a new language".into(),
            examples: vec![
                Example::new(
                    "To learn some new words: serendipity, discrepency. Target language is English. Need 3 sentences.",
                    serde_json::json!({
                        "lang": "Chinese",
                        "words": "serendipity, discrepency",
                        "examples_number": 3
                    }),
                ),
                Example::new(
                    "Help me create 5 examples based on the words: 天, 地. I want to study Chinese.",
                    serde_json::json!({
                        "lang": "Chinese",
                        "words": "天, 地",
                        "examples_number": 5
                    }),
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_string_forms() {
        assert_eq!(AgentKind::LanguageStudy.to_string(), "language_study");
        assert_eq!("casual_chat".parse::<AgentKind>().unwrap(), AgentKind::CasualChat);
        assert!("weather".parse::<AgentKind>().is_err());
    }

    #[test]
    fn only_casual_chat_is_fallback() {
        assert!(AgentKind::CasualChat.is_fallback());
        assert!(!AgentKind::LanguageStudy.is_fallback());
    }

    #[test]
    fn language_study_examples_are_structured() {
        let descriptor = AgentDescriptor::language_study();
        assert_eq!(descriptor.examples.len(), 2);
        for example in &descriptor.examples {
            assert!(example.output.get("lang").is_some());
            assert!(example.output.get("words").is_some());
            assert!(example.output.get("examples_number").is_some());
        }
    }
}
