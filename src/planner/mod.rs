//! Per-agent planners.
//!
//! A planner maps the tool results gathered so far in the current turn to
//! the next step: call a tool, or finish with an output. Planning is pure;
//! its state is the number of prior results, made explicit by each planner's
//! state enum.

pub mod casual;
pub mod language_study;

pub use casual::{CasualChatPlanner, CasualChatState};
pub use language_study::{LanguageStudyPlanner, LanguageStudyState, RequiredField};

use serde::{Deserialize, Serialize};

use crate::agent::{AgentDescriptor, AgentKind};
use crate::error::RouterError;
use crate::types::ToolOutput;

/// A request to run one tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool: String,
    pub input: serde_json::Value,
}

impl ToolCall {
    pub fn new(tool: impl Into<String>, input: serde_json::Value) -> Self {
        Self {
            tool: tool.into(),
            input,
        }
    }
}

/// What a planner decided.
#[derive(Debug, Clone, PartialEq)]
pub enum PlannerStep {
    /// Run a tool and plan again with its result appended.
    Action(ToolCall),
    /// End the turn with this output.
    Finish(ToolOutput),
}

impl PlannerStep {
    pub fn is_finish(&self) -> bool {
        matches!(self, Self::Finish(_))
    }
}

/// Planner for one agent kind.
#[derive(Debug, Clone)]
pub enum Planner {
    CasualChat(CasualChatPlanner),
    LanguageStudy(LanguageStudyPlanner),
}

impl Planner {
    /// Build the planner for a registered agent.
    pub fn for_descriptor(descriptor: &AgentDescriptor) -> Self {
        match descriptor.kind {
            AgentKind::CasualChat => Self::CasualChat(CasualChatPlanner),
            AgentKind::LanguageStudy => {
                Self::LanguageStudy(LanguageStudyPlanner::new(descriptor.examples.clone()))
            }
        }
    }

    pub fn kind(&self) -> AgentKind {
        match self {
            Self::CasualChat(_) => AgentKind::CasualChat,
            Self::LanguageStudy(_) => AgentKind::LanguageStudy,
        }
    }

    /// Decide the next step for `input` given this turn's prior tool results.
    pub fn plan(&self, input: &str, prior: &[ToolOutput]) -> Result<PlannerStep, RouterError> {
        match self {
            Self::CasualChat(planner) => planner.plan(input, prior),
            Self::LanguageStudy(planner) => planner.plan(input, prior),
        }
    }
}

pub(crate) fn overflow(kind: AgentKind, steps: usize) -> RouterError {
    RouterError::PlannerStateOverflow {
        agent: kind.to_string(),
        steps,
    }
}
