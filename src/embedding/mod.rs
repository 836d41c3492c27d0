//! Text embedding backends used by the similarity selector.

pub mod lexical;
pub mod openai;

pub use lexical::LexicalEmbedder;
pub use openai::OpenAiEmbedder;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{EmbeddingBackend, RouterConfig};
use crate::error::RouterError;

/// Turns texts into vectors comparable by cosine similarity.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Backend name, for logs.
    fn name(&self) -> &str;

    /// Embed every text, returning one vector per input in input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RouterError>;
}

/// Cosine similarity of two vectors. Mismatched lengths and zero vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Create the embedder selected by [`RouterConfig::resolved_embedding_backend`].
pub fn create_embedder(config: &RouterConfig) -> Result<Arc<dyn Embedder>, RouterError> {
    match config.resolved_embedding_backend() {
        EmbeddingBackend::Lexical => Ok(Arc::new(LexicalEmbedder::new())),
        EmbeddingBackend::OpenAi => {
            let api_key = config
                .api_key
                .clone()
                .ok_or_else(|| RouterError::Authentication("Missing OPENAI_API_KEY".into()))?;
            Ok(Arc::new(OpenAiEmbedder::new(
                config.embedding_model.clone(),
                api_key,
                config.base_url.clone(),
            )))
        }
    }
}
