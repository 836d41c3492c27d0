//! Convenience re-exports for common use.

pub use crate::agent::{AgentDescriptor, AgentExecutor, AgentKind, AgentRegistry, Example};
pub use crate::config::{EmbeddingBackend, RouterConfig};
pub use crate::embedding::{Embedder, LexicalEmbedder};
pub use crate::error::{ErrorCategory, Result, RouterError};
pub use crate::planner::{Planner, PlannerStep, ToolCall};
pub use crate::provider::ModelProvider;
pub use crate::router::TurnRouter;
pub use crate::selector::SimilaritySelector;
pub use crate::session::{EvictionPolicy, SessionContext, SessionStore};
pub use crate::tools::{AgentTool, AgentToolParameters, Tool, ToolArguments, ToolRegistry};
pub use crate::types::{GenerationSettings, ModelMessage, Role, ToolOutput, TurnResponse};
