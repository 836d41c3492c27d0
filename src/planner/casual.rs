//! Fallback planner: one call to the general-purpose model.
//!
//! | prior results | state     | step                                  |
//! |---------------|-----------|---------------------------------------|
//! | 0             | `Respond` | call `openai` with the raw input      |
//! | 1             | `Finish`  | finish with that result, unchanged    |
//! | 2+            | -         | `PlannerStateOverflow`                |

use super::{overflow, PlannerStep, ToolCall};
use crate::agent::AgentKind;
use crate::error::RouterError;
use crate::tools::builtin::OPENAI_TOOL;
use crate::types::ToolOutput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasualChatState {
    Respond,
    Finish,
}

impl CasualChatState {
    pub fn from_step_count(steps: usize) -> Option<Self> {
        match steps {
            0 => Some(Self::Respond),
            1 => Some(Self::Finish),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CasualChatPlanner;

impl CasualChatPlanner {
    pub fn plan(&self, input: &str, prior: &[ToolOutput]) -> Result<PlannerStep, RouterError> {
        let state = CasualChatState::from_step_count(prior.len())
            .ok_or_else(|| overflow(AgentKind::CasualChat, prior.len()))?;
        Ok(match state {
            CasualChatState::Respond => PlannerStep::Action(ToolCall::new(
                OPENAI_TOOL,
                serde_json::Value::String(input.to_string()),
            )),
            CasualChatState::Finish => PlannerStep::Finish(prior[0].clone()),
        })
    }
}
