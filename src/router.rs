//! Turn router: the single entry point for a chat turn.
//!
//! One turn appends the message to its session, (re)binds the agent, runs
//! the agent's planner to completion and records the exchange. Turns of the
//! same session are serialized by the session's mutex.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::agent::{AgentExecutor, AgentRegistry};
use crate::config::RouterConfig;
use crate::embedding::create_embedder;
use crate::error::RouterError;
use crate::planner::Planner;
use crate::provider::{create_provider, ModelProvider};
use crate::selector::SimilaritySelector;
use crate::session::{EvictionPolicy, SessionStore};
use crate::tools::{ToolExecutionContext, ToolRegistry};
use crate::types::{GenerationSettings, TurnResponse};

#[derive(Debug)]
pub struct TurnRouter {
    registry: AgentRegistry,
    selector: SimilaritySelector,
    executor: AgentExecutor,
    store: SessionStore,
}

impl TurnRouter {
    pub fn new(
        registry: AgentRegistry,
        selector: SimilaritySelector,
        executor: AgentExecutor,
        store: SessionStore,
    ) -> Self {
        Self {
            registry,
            selector,
            executor,
            store,
        }
    }

    /// Wire the built-in agents and tools against the configured backends.
    pub fn from_config(config: &RouterConfig) -> Result<Self, RouterError> {
        config.validate()?;

        let provider: Arc<dyn ModelProvider> = Arc::from(create_provider(config)?);
        let settings = GenerationSettings::builder()
            .temperature(config.temperature)
            .build();
        let tools = ToolRegistry::builtin(provider, settings);

        let embedder = create_embedder(config)?;
        let selector = SimilaritySelector::new(embedder, config.similarity_threshold);

        let store = SessionStore::with_policy(EvictionPolicy {
            idle_ttl: config.session_idle_ttl(),
            max_sessions: config.max_sessions,
        });

        info!(
            chat_model = %config.chat_model,
            embedding_backend = %config.resolved_embedding_backend(),
            threshold = config.similarity_threshold,
            "turn router ready"
        );

        Ok(Self::new(
            AgentRegistry::builtin(),
            selector,
            AgentExecutor::new(tools, config.tool_timeout()),
            store,
        ))
    }

    /// Process one user message.
    ///
    /// `None` (or an id never seen before) starts a new session. On failure
    /// the message stays in the session history but no exchange is recorded.
    pub async fn process_turn(
        &self,
        session_id: Option<&str>,
        message: &str,
    ) -> Result<TurnResponse, RouterError> {
        let (session_id, context) = self.store.get_or_create(session_id);
        let mut session = context.lock().await;

        session.add_message(message);
        let binding = self.selector.bind(&mut session, &self.registry).await;
        debug!(session_id = %session_id, agent = %binding.agent, selected = binding.selected, "processing turn");

        let descriptor = self.registry.descriptor(binding.agent)?;
        let planner = Planner::for_descriptor(descriptor);
        let input = session.planner_input(message);
        let ctx = ToolExecutionContext::for_session(session_id.clone());

        let output = match self.executor.run(&planner, &input, &ctx).await {
            Ok(output) => output,
            Err(err) => {
                warn!(session_id = %session_id, agent = %binding.agent, error = %err, "turn failed");
                return Err(err);
            }
        };

        let response = TurnResponse::from_output(session_id, output);
        session.record_exchange(message, response.response.clone());
        Ok(response)
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    pub fn selector(&self) -> &SimilaritySelector {
        &self.selector
    }

    pub fn tools(&self) -> &ToolRegistry {
        self.executor.tools()
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }
}
