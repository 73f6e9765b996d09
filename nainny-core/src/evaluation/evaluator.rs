use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::embeddings::{EmbeddingProvider, cosine_similarity};

pub const SEMANTIC_WEIGHT: f64 = 0.7;
pub const SIMPLICITY_WEIGHT: f64 = 0.2;
/// Added when the target culture is named in the adapted text.
pub const CULTURE_BOOST: f64 = 0.1;

static WORD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("word pattern is valid"));

/// Component and composite scores for one adaptation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoryScores {
    pub semantic: f64,
    pub simplicity: f64,
    pub culture_present: bool,
    pub composite: f64,
}

/// Scores how well an adaptation preserves meaning while reading simply.
pub struct StoryEvaluator {
    embedder: Option<Arc<dyn EmbeddingProvider>>,
}

impl StoryEvaluator {
    pub fn new(embedder: Option<Arc<dyn EmbeddingProvider>>) -> Self {
        Self { embedder }
    }

    /// Word-overlap scoring only.
    pub fn lexical() -> Self {
        Self::new(None)
    }

    /// Meaning preserved from `original` in `adapted`.
    ///
    /// Uses embedding cosine similarity when an embedder is configured and
    /// falls back to word overlap if embedding fails.
    pub async fn semantic_score(&self, original: &str, adapted: &str) -> f64 {
        if let Some(embedder) = &self.embedder {
            match embedder.embed_batch(&[original, adapted]).await {
                Ok(vectors) if vectors.len() == 2 => {
                    return cosine_similarity(&vectors[0], &vectors[1]).clamp(0.0, 1.0);
                }
                Ok(vectors) => {
                    tracing::warn!(count = vectors.len(), "Unexpected embedding count, using word overlap");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Embedding failed, using word overlap");
                }
            }
        }
        word_overlap(original, adapted)
    }

    /// Readability proxy: shorter sentences score higher.
    pub fn simplicity_score(&self, text: &str) -> f64 {
        let lengths: Vec<usize> = text
            .split(['.', '!', '?'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.split_whitespace().count())
            .collect();

        if lengths.is_empty() {
            return 0.0;
        }

        let avg = lengths.iter().sum::<usize>() as f64 / lengths.len() as f64;
        (2.0 / (avg + 1e-5)).clamp(0.0, 1.0)
    }

    pub async fn evaluate(&self, original: &str, adapted: &str, target_culture: &str) -> StoryScores {
        let semantic = self.semantic_score(original, adapted).await;
        let simplicity = self.simplicity_score(adapted);
        let culture_present = adapted
            .to_lowercase()
            .contains(&target_culture.to_lowercase());

        let boost = if culture_present { CULTURE_BOOST } else { 0.0 };
        StoryScores {
            semantic,
            simplicity,
            culture_present,
            composite: SEMANTIC_WEIGHT * semantic + SIMPLICITY_WEIGHT * simplicity + boost,
        }
    }

    /// Weighted composite of semantic, simplicity and culture presence.
    pub async fn composite_score(&self, original: &str, adapted: &str, target_culture: &str) -> f64 {
        self.evaluate(original, adapted, target_culture).await.composite
    }
}

impl Default for StoryEvaluator {
    fn default() -> Self {
        Self::lexical()
    }
}

fn word_set(text: &str) -> HashSet<String> {
    WORD_REGEX
        .find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}

fn word_overlap(original: &str, adapted: &str) -> f64 {
    let original = word_set(original);
    if original.is_empty() {
        return 0.0;
    }
    let adapted = word_set(adapted);
    original.intersection(&adapted).count() as f64 / original.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NainnyError, Result};
    use async_trait::async_trait;

    struct FixedEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FixedEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(if text.contains("lamp") {
                vec![1.0, 0.0]
            } else if text.contains("darkness") {
                vec![-1.0, 0.0]
            } else {
                vec![0.6, 0.8]
            })
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(NainnyError::ModelUnavailable("no model".into()))
        }

        fn dimension(&self) -> usize {
            0
        }
    }

    #[tokio::test]
    async fn test_word_overlap() {
        let evaluator = StoryEvaluator::lexical();
        let score = evaluator
            .semantic_score("The cat sat on the mat", "A cat sat")
            .await;
        // {the, cat, sat, on, mat} against {a, cat, sat}
        assert!((score - 0.4).abs() < 1e-9);
        assert_eq!(evaluator.semantic_score("", "anything").await, 0.0);
        assert_eq!(evaluator.semantic_score("Same words", "same WORDS").await, 1.0);
    }

    #[tokio::test]
    async fn test_embedding_similarity() {
        let evaluator = StoryEvaluator::new(Some(Arc::new(FixedEmbedder)));
        let score = evaluator.semantic_score("a lamp", "a candle").await;
        assert!((score - 0.6).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_opposed_embeddings_score_zero() {
        let evaluator = StoryEvaluator::new(Some(Arc::new(FixedEmbedder)));
        assert_eq!(evaluator.semantic_score("a lamp", "only darkness").await, 0.0);
    }

    #[tokio::test]
    async fn test_embedding_failure_falls_back() {
        let evaluator = StoryEvaluator::new(Some(Arc::new(FailingEmbedder)));
        assert_eq!(evaluator.semantic_score("one two", "one").await, 0.5);
    }

    #[test]
    fn test_simplicity() {
        let evaluator = StoryEvaluator::default();
        let short = evaluator.simplicity_score("A short story. It is nice.");
        assert!((short - 2.0 / 3.0).abs() < 1e-4);

        let long = vec!["word"; 40].join(" ") + ".";
        let long_score = evaluator.simplicity_score(&long);
        assert!(long_score < 0.06);
        assert!(short > long_score * 10.0);

        assert_eq!(evaluator.simplicity_score("Go."), 1.0);
        assert_eq!(evaluator.simplicity_score("...!?"), 0.0);
    }

    #[tokio::test]
    async fn test_composite_with_culture_boost() {
        let evaluator = StoryEvaluator::default();
        let original = "Ravi lit a lamp.";
        let adapted = "Ravi lit a lamp in Indian style.";

        let scores = evaluator.evaluate(original, adapted, "indian").await;
        assert!(scores.culture_present);
        assert_eq!(scores.semantic, 1.0);
        let expected = 0.7 + 0.2 * scores.simplicity + 0.1;
        assert!((scores.composite - expected).abs() < 1e-9);

        let without = evaluator.composite_score(original, adapted, "japanese").await;
        assert!((scores.composite - without - 0.1).abs() < 1e-9);
    }
}
