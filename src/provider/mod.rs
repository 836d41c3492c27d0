//! Chat model provider trait and the OpenAI implementation.

pub mod http;
pub mod openai;

use async_trait::async_trait;

use crate::config::RouterConfig;
use crate::error::RouterError;
use crate::types::{FinishReason, GenerationSettings, ModelMessage};

/// A request sent to a model provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub messages: Vec<ModelMessage>,
    pub settings: GenerationSettings,
}

/// Response from a provider.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub text: String,
    pub finish_reason: Option<FinishReason>,
}

/// Core trait implemented by chat model providers.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g., "openai").
    fn provider_name(&self) -> &str;

    /// The model ID this provider instance serves.
    fn model_id(&self) -> &str;

    /// Generate text (non-streaming).
    async fn generate_text(&self, request: &ProviderRequest)
        -> Result<ProviderResponse, RouterError>;
}

/// Create the chat provider described by `config`.
pub fn create_provider(config: &RouterConfig) -> Result<Box<dyn ModelProvider>, RouterError> {
    let api_key = config
        .api_key
        .clone()
        .ok_or_else(|| RouterError::Authentication("Missing OPENAI_API_KEY".into()))?;
    Ok(Box::new(openai::OpenAiProvider::new(
        config.chat_model.clone(),
        api_key,
        config.base_url.clone(),
    )))
}
