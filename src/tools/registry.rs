//! Ordered, name-indexed set of tools available to planners.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::arguments::ToolArguments;
use super::builtin;
use super::tool::{Tool, ToolExecutionContext};
use crate::error::RouterError;
use crate::planner::ToolCall;
use crate::provider::ModelProvider;
use crate::types::{GenerationSettings, ToolOutput};
use crate::util::timeout::with_timeout;

/// Name, description and parameter schema of a registered tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Tools available to planners, populated at startup.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in tool, backed by `provider`.
    pub fn builtin(provider: Arc<dyn ModelProvider>, settings: GenerationSettings) -> Self {
        Self {
            tools: builtin::all_tools(provider, settings),
        }
    }

    /// Add a tool. Names must be unique.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), RouterError> {
        if self.get(tool.name()).is_some() {
            return Err(RouterError::Configuration(format!(
                "tool '{}' is already registered",
                tool.name()
            )));
        }
        self.tools.push(tool);
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Result<Self, RouterError> {
        self.register(tool)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Tool names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters().schema.clone(),
            })
            .collect()
    }

    /// Run the tool a planner asked for, bounded by `timeout`.
    ///
    /// Failures are attributed to the tool: unknown names and transport
    /// errors are `ToolUnavailable`, deadline overruns are `ToolTimeout`.
    /// Nothing is retried.
    pub async fn invoke(
        &self,
        call: &ToolCall,
        ctx: &ToolExecutionContext,
        timeout: Duration,
    ) -> Result<ToolOutput, RouterError> {
        let tool = self.get(&call.tool).ok_or_else(|| RouterError::ToolUnavailable {
            tool: call.tool.clone(),
            message: "no tool registered under this name".into(),
        })?;

        debug!(tool = %call.tool, session_id = ?ctx.session_id, "invoking tool");
        let args = ToolArguments::new(call.input.clone());
        with_timeout(timeout, tool.execute(&args, ctx))
            .await
            .map_err(|e| {
                let err = e.into_tool_failure(&call.tool);
                warn!(tool = %call.tool, error = %err, "tool call failed");
                err
            })
    }
}
