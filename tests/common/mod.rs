//! Shared test helpers: a scripted provider, counting embedders and router wiring.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use fewshot_router::agent::{AgentExecutor, AgentRegistry};
use fewshot_router::embedding::{Embedder, LexicalEmbedder};
use fewshot_router::error::RouterError;
use fewshot_router::provider::{ModelProvider, ProviderRequest, ProviderResponse};
use fewshot_router::router::TurnRouter;
use fewshot_router::selector::SimilaritySelector;
use fewshot_router::session::SessionStore;
use fewshot_router::tools::ToolRegistry;
use fewshot_router::types::*;

/// A mock provider that returns canned responses in order and records every request.
pub struct MockProvider {
    responses: Mutex<VecDeque<Result<String, RouterError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
    delay: Option<Duration>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Sleep this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a text response.
    pub fn queue_response(&self, text: &str) {
        self.responses.lock().unwrap().push_back(Ok(text.to_string()));
    }

    /// Queue a failure.
    pub fn queue_error(&self, error: RouterError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_id(&self) -> &str {
        "mock-model"
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, RouterError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.responses.lock().unwrap().pop_front();
        let text = match next {
            Some(result) => result?,
            None => "Mock response".to_string(),
        };
        Ok(ProviderResponse {
            text,
            finish_reason: Some(FinishReason::Stop),
        })
    }
}

/// Lexical embedder that counts how many times it was asked to embed.
#[derive(Default)]
pub struct CountingEmbedder {
    inner: LexicalEmbedder,
    calls: AtomicUsize,
}

impl CountingEmbedder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for CountingEmbedder {
    fn name(&self) -> &str {
        "counting"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RouterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.embed(texts).await
    }
}

/// Embedder whose backend is always down.
pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    fn name(&self) -> &str {
        "failing"
    }

    async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, RouterError> {
        Err(RouterError::api(503, "embedding service unavailable"))
    }
}

/// Router over the built-in agents and tools, backed by the given doubles.
pub fn router_with(
    provider: Arc<MockProvider>,
    embedder: Arc<dyn Embedder>,
    timeout: Duration,
) -> TurnRouter {
    let tools = ToolRegistry::builtin(provider, GenerationSettings::default());
    TurnRouter::new(
        AgentRegistry::builtin(),
        SimilaritySelector::new(embedder, 0.1),
        AgentExecutor::new(tools, timeout),
        SessionStore::new(),
    )
}

/// Text of the last user message in a recorded request.
pub fn last_user_text(request: &ProviderRequest) -> &str {
    request
        .messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .unwrap_or_default()
}
