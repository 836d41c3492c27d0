//! Local embedder: hashed bag of tokens.
//!
//! Text is lower-cased and split into word tokens, with every Han character
//! treated as its own token. Common English function words are dropped. Each
//! remaining token increments one of [`DIMENSIONS`] buckets chosen by FNV-1a,
//! and the vector is L2-normalized. Identical token bags give similarity 1;
//! texts sharing no tokens give 0 (barring bucket collisions).

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;

use super::Embedder;
use crate::error::RouterError;

pub const DIMENSIONS: usize = 4096;

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "do", "for", "from", "i", "in", "is", "it",
    "me", "my", "of", "on", "or", "so", "some", "that", "the", "this", "to", "was", "we", "with",
];

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\p{Han}|[\w&&[^\p{Han}]]+").expect("token pattern must compile")
    })
}

/// Split text into the tokens the embedder counts.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    token_pattern()
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}

fn fnv1a(token: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in token.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

/// Deterministic, network-free [`Embedder`].
#[derive(Debug, Clone, Default)]
pub struct LexicalEmbedder;

impl LexicalEmbedder {
    pub fn new() -> Self {
        Self
    }

    /// Embed a single text.
    pub fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; DIMENSIONS];
        for token in tokenize(text) {
            let bucket = (fnv1a(&token) % DIMENSIONS as u64) as usize;
            vector[bucket] += 1.0;
        }
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl Embedder for LexicalEmbedder {
    fn name(&self) -> &str {
        "lexical"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RouterError> {
        Ok(texts.iter().map(|text| self.embed_one(text)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::cosine_similarity;
    use pretty_assertions::assert_eq;

    #[test]
    fn han_characters_are_separate_tokens() {
        assert_eq!(
            tokenize("Words: 天地, study Chinese"),
            vec!["words", "天", "地", "study", "chinese"]
        );
    }

    #[test]
    fn stop_words_are_dropped() {
        assert_eq!(tokenize("What is the weather"), vec!["what", "weather"]);
    }

    #[test]
    fn identical_texts_score_one() {
        let embedder = LexicalEmbedder::new();
        let a = embedder.embed_one("Help me create 5 examples based on the words: 天, 地.");
        let b = embedder.embed_one("help me create 5 examples based on the words 天 地");
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn unrelated_texts_score_zero() {
        let embedder = LexicalEmbedder::new();
        let a = embedder.embed_one("hi");
        let b = embedder.embed_one("To learn some new words: serendipity, discrepency.");
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn empty_text_is_zero_vector() {
        let embedder = LexicalEmbedder::new();
        assert!(embedder.embed_one("  ").iter().all(|v| *v == 0.0));
    }

    #[tokio::test]
    async fn embed_preserves_input_order() {
        let embedder = LexicalEmbedder::new();
        let texts = vec!["alpha".to_string(), "beta".to_string()];
        let vectors = embedder.embed(&texts).await.unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0], embedder.embed_one("alpha"));
        assert_eq!(vectors[1], embedder.embed_one("beta"));
    }
}
