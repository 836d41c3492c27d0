//! Searchable index over every selectable example input.

use crate::agent::{AgentKind, AgentRegistry};
use crate::embedding::{cosine_similarity, Embedder};
use crate::error::RouterError;

/// An example input and its vector, tagged with the owning agent.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub agent: AgentKind,
    pub input: String,
    pub vector: Vec<f32>,
}

/// An example that scored at or above the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredExample {
    pub agent: AgentKind,
    pub input: String,
    pub score: f32,
}

/// Index plus the embedded query it was built with.
#[derive(Debug, Clone)]
pub struct ExampleIndex {
    entries: Vec<IndexEntry>,
    query: Vec<f32>,
}

impl ExampleIndex {
    /// Embed every registered example together with `query` in one batch.
    ///
    /// Any embedder failure, or a batch of the wrong size, is
    /// `SelectorUnavailable`.
    pub async fn build(
        embedder: &dyn Embedder,
        registry: &AgentRegistry,
        query: &str,
    ) -> Result<Self, RouterError> {
        let examples: Vec<(AgentKind, String)> = registry
            .selectable_examples()
            .map(|(kind, ex)| (kind, ex.input.clone()))
            .collect();

        let mut texts: Vec<String> = examples.iter().map(|(_, input)| input.clone()).collect();
        texts.push(query.to_string());

        let mut vectors = embedder.embed(&texts).await.map_err(|e| {
            RouterError::SelectorUnavailable(format!("{} embedder failed: {e}", embedder.name()))
        })?;
        if vectors.len() != texts.len() {
            return Err(RouterError::SelectorUnavailable(format!(
                "{} embedder returned {} vectors for {} texts",
                embedder.name(),
                vectors.len(),
                texts.len()
            )));
        }

        let query = vectors.pop().unwrap_or_default();
        let entries = examples
            .into_iter()
            .zip(vectors)
            .map(|((agent, input), vector)| IndexEntry {
                agent,
                input,
                vector,
            })
            .collect();
        Ok(Self { entries, query })
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Examples scoring at or above `threshold`, best first. Ties keep registry order.
    pub fn search(&self, threshold: f32) -> Vec<ScoredExample> {
        let mut hits: Vec<ScoredExample> = self
            .entries
            .iter()
            .map(|entry| ScoredExample {
                agent: entry.agent,
                input: entry.input.clone(),
                score: cosine_similarity(&self.query, &entry.vector),
            })
            .filter(|hit| hit.score >= threshold)
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits
    }
}
