//! Similarity selector: binds a session to the agent whose examples are
//! closest to the conversation so far.
//!
//! The index is rebuilt from the registry on every selection; nothing is
//! cached between calls.

pub mod index;

pub use index::{ExampleIndex, IndexEntry, ScoredExample};

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::agent::{AgentKind, AgentRegistry};
use crate::embedding::Embedder;
use crate::error::RouterError;
use crate::session::SessionContext;

/// Result of one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub agent: AgentKind,
    /// Best example above the threshold; `None` when the fallback was chosen.
    pub matched: Option<ScoredExample>,
}

/// What [`SimilaritySelector::bind`] did to a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub agent: AgentKind,
    /// Whether selection ran (false when a task agent was already bound).
    pub selected: bool,
    /// Whether the selector failed and the fallback was bound instead.
    pub degraded: bool,
    pub score: Option<f32>,
}

pub struct SimilaritySelector {
    embedder: Arc<dyn Embedder>,
    threshold: f32,
}

impl std::fmt::Debug for SimilaritySelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimilaritySelector")
            .field("embedder", &self.embedder.name())
            .field("threshold", &self.threshold)
            .finish()
    }
}

impl SimilaritySelector {
    pub fn new(embedder: Arc<dyn Embedder>, threshold: f32) -> Self {
        Self {
            embedder,
            threshold,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Every example at or above the threshold for `query`, best first.
    pub async fn rank(
        &self,
        query: &str,
        registry: &AgentRegistry,
    ) -> Result<Vec<ScoredExample>, RouterError> {
        let index = ExampleIndex::build(self.embedder.as_ref(), registry, query).await?;
        Ok(index.search(self.threshold))
    }

    /// The best-matching agent for `query`, or the fallback if nothing clears the threshold.
    pub async fn select(
        &self,
        query: &str,
        registry: &AgentRegistry,
    ) -> Result<Selection, RouterError> {
        let best = self.rank(query, registry).await?.into_iter().next();
        Ok(match best {
            Some(hit) => Selection {
                agent: hit.agent,
                matched: Some(hit),
            },
            None => Selection {
                agent: registry.fallback().kind,
                matched: None,
            },
        })
    }

    /// (Re)bind the session's agent if none is bound or the fallback is bound.
    ///
    /// A selector failure binds the fallback agent instead of failing the turn.
    pub async fn bind(&self, session: &mut SessionContext, registry: &AgentRegistry) -> Binding {
        if !session.needs_selection() {
            if let Some(agent) = session.bound_agent() {
                debug!(session_id = %session.id, agent = %agent, "keeping bound agent");
                return Binding {
                    agent,
                    selected: false,
                    degraded: false,
                    score: None,
                };
            }
        }

        let query = session.selection_query();
        match self.select(&query, registry).await {
            Ok(selection) => {
                let score = selection.matched.as_ref().map(|hit| hit.score);
                info!(
                    session_id = %session.id,
                    agent = %selection.agent,
                    score = ?score,
                    "bound agent"
                );
                session.bind_agent(selection.agent);
                Binding {
                    agent: selection.agent,
                    selected: true,
                    degraded: false,
                    score,
                }
            }
            Err(err) => {
                let fallback = registry.fallback().kind;
                warn!(
                    session_id = %session.id,
                    error = %err,
                    "selector unavailable, binding fallback agent"
                );
                session.bind_agent(fallback);
                Binding {
                    agent: fallback,
                    selected: true,
                    degraded: true,
                    score: None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::LexicalEmbedder;
    use async_trait::async_trait;

    struct BrokenEmbedder;

    #[async_trait]
    impl Embedder for BrokenEmbedder {
        fn name(&self) -> &str {
            "broken"
        }

        async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, RouterError> {
            Err(RouterError::api(503, "embedding backend down"))
        }
    }

    struct ShortEmbedder;

    #[async_trait]
    impl Embedder for ShortEmbedder {
        fn name(&self) -> &str {
            "short"
        }

        async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, RouterError> {
            Ok(vec![vec![1.0]])
        }
    }

    fn lexical() -> SimilaritySelector {
        SimilaritySelector::new(Arc::new(LexicalEmbedder::new()), 0.1)
    }

    #[tokio::test]
    async fn greeting_selects_fallback() {
        let selection = lexical().select("hi", &AgentRegistry::builtin()).await.unwrap();
        assert_eq!(selection.agent, AgentKind::CasualChat);
        assert!(selection.matched.is_none());
    }

    #[tokio::test]
    async fn study_request_matches_second_example() {
        let query = "Help me create 5 examples based on the words: 天, 地. I want to study Chinese.";
        let selection = lexical().select(query, &AgentRegistry::builtin()).await.unwrap();
        assert_eq!(selection.agent, AgentKind::LanguageStudy);
        let hit = selection.matched.unwrap();
        assert_eq!(hit.input, query);
        assert!((hit.score - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn rank_orders_best_first() {
        let query = "Help me create 5 examples based on the words: 天, 地. I want to study Chinese.";
        let hits = lexical().rank(query, &AgentRegistry::builtin()).await.unwrap();
        assert!(!hits.is_empty());
        assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[tokio::test]
    async fn empty_registry_selects_fallback() {
        let selection = lexical().select("anything", &AgentRegistry::new()).await.unwrap();
        assert_eq!(selection.agent, AgentKind::CasualChat);
    }

    #[tokio::test]
    async fn embedder_failure_is_selector_unavailable() {
        let selector = SimilaritySelector::new(Arc::new(BrokenEmbedder), 0.1);
        let err = selector.select("hi", &AgentRegistry::builtin()).await.unwrap_err();
        assert!(matches!(err, RouterError::SelectorUnavailable(_)));
    }

    #[tokio::test]
    async fn short_batch_is_selector_unavailable() {
        let selector = SimilaritySelector::new(Arc::new(ShortEmbedder), 0.1);
        let err = selector.select("hi", &AgentRegistry::builtin()).await.unwrap_err();
        assert!(matches!(err, RouterError::SelectorUnavailable(ref msg) if msg.contains("1 vectors for 3 texts")));
    }

    #[tokio::test]
    async fn bind_degrades_to_fallback_on_failure() {
        let selector = SimilaritySelector::new(Arc::new(BrokenEmbedder), 0.1);
        let mut session = SessionContext::new("s");
        session.add_message("Help me create 5 examples based on the words: 天, 地.");
        let binding = selector.bind(&mut session, &AgentRegistry::builtin()).await;
        assert!(binding.degraded);
        assert_eq!(binding.agent, AgentKind::CasualChat);
        assert_eq!(session.bound_agent(), Some(AgentKind::CasualChat));
    }

    #[tokio::test]
    async fn bind_keeps_task_agent() {
        let selector = SimilaritySelector::new(Arc::new(BrokenEmbedder), 0.1);
        let mut session = SessionContext::new("s");
        session.bind_agent(AgentKind::LanguageStudy);
        session.add_message("hi");
        let binding = selector.bind(&mut session, &AgentRegistry::builtin()).await;
        assert!(!binding.selected);
        assert_eq!(session.bound_agent(), Some(AgentKind::LanguageStudy));
    }

    #[tokio::test]
    async fn greeting_then_study_request_rebinds_to_language_study() {
        let mut session = SessionContext::new("s");
        session.add_message("hi");
        let first = lexical().bind(&mut session, &AgentRegistry::builtin()).await;
        assert_eq!(first.agent, AgentKind::CasualChat);

        session.add_message(
            "Help me create 5 examples based on the words: 天, 地. I want to study Chinese.",
        );
        assert!(session.selection_query().starts_with("hi Help me"));
        let second = lexical().bind(&mut session, &AgentRegistry::builtin()).await;
        assert!(second.selected);
        assert_eq!(second.agent, AgentKind::LanguageStudy);
    }
}
