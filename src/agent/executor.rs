//! Plan/act loop for one turn.

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::RouterError;
use crate::planner::{Planner, PlannerStep};
use crate::tools::{ToolExecutionContext, ToolRegistry};
use crate::types::ToolOutput;

/// Hard cap on tool calls within a single turn.
pub const MAX_TOOL_ITERATIONS: usize = 20;

/// Drives a planner against the tool registry until it finishes.
#[derive(Debug, Clone)]
pub struct AgentExecutor {
    tools: ToolRegistry,
    timeout: Duration,
}

impl AgentExecutor {
    pub fn new(tools: ToolRegistry, timeout: Duration) -> Self {
        Self { tools, timeout }
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Plan, run the requested tool, append its result, repeat.
    ///
    /// Tool results are scoped to this call. The first tool failure ends the
    /// turn.
    pub async fn run(
        &self,
        planner: &Planner,
        input: &str,
        ctx: &ToolExecutionContext,
    ) -> Result<ToolOutput, RouterError> {
        let mut prior: Vec<ToolOutput> = Vec::new();

        loop {
            match planner.plan(input, &prior)? {
                PlannerStep::Finish(output) => {
                    debug!(
                        agent = %planner.kind(),
                        tool_calls = prior.len(),
                        "planner finished"
                    );
                    return Ok(output);
                }
                PlannerStep::Action(call) => {
                    if prior.len() >= MAX_TOOL_ITERATIONS {
                        warn!(
                            agent = %planner.kind(),
                            max_iterations = MAX_TOOL_ITERATIONS,
                            "tool loop exceeded max iterations"
                        );
                        return Err(crate::planner::overflow(planner.kind(), prior.len()));
                    }
                    debug!(agent = %planner.kind(), tool = %call.tool, step = prior.len(), "planner action");
                    let output = self.tools.invoke(&call, ctx, self.timeout).await?;
                    prior.push(output);
                }
            }
        }
    }
}
