//! Session contexts and the process-wide session store.

pub mod store;

pub use store::{EvictionPolicy, SessionStore};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::AgentKind;

/// One completed user/assistant exchange.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exchange {
    pub user: String,
    pub response: String,
}

/// Accumulated state of one chat session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    pub id: String,
    user_messages: Vec<String>,
    exchanges: Vec<Exchange>,
    bound_agent: Option<AgentKind>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            user_messages: Vec::new(),
            exchanges: Vec::new(),
            bound_agent: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn add_message(&mut self, message: impl Into<String>) {
        self.user_messages.push(message.into());
        self.updated_at = Utc::now();
    }

    pub fn user_messages(&self) -> &[String] {
        &self.user_messages
    }

    pub fn exchanges(&self) -> &[Exchange] {
        &self.exchanges
    }

    pub fn bound_agent(&self) -> Option<AgentKind> {
        self.bound_agent
    }

    /// Replace the bound agent. At most one agent is bound at a time.
    pub fn bind_agent(&mut self, kind: AgentKind) {
        self.bound_agent = Some(kind);
        self.updated_at = Utc::now();
    }

    /// Selection runs while no agent is bound or the fallback is bound.
    pub fn needs_selection(&self) -> bool {
        self.bound_agent.map_or(true, AgentKind::is_fallback)
    }

    /// Text the selector compares against the examples: every user message so far.
    ///
    /// Messages are space-separated so the last word of one message never
    /// fuses with the first word of the next.
    pub fn selection_query(&self) -> String {
        self.user_messages.join(" ")
    }

    /// Planner input for `message`: prior exchanges followed by the new message.
    pub fn planner_input(&self, message: &str) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(self.exchanges.len() * 2 + 1);
        for exchange in &self.exchanges {
            parts.push(&exchange.user);
            parts.push(&exchange.response);
        }
        parts.push(message);
        parts.join(" ")
    }

    pub fn record_exchange(&mut self, user: impl Into<String>, response: impl Into<String>) {
        self.exchanges.push(Exchange {
            user: user.into(),
            response: response.into(),
        });
        self.updated_at = Utc::now();
    }
}
