use serde::{Deserialize, Serialize};

/// Configuration for concept extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptExtractionConfig {
    /// Concepts kept after ranking
    pub max_concepts: usize,

    /// Longest noun chunk (in words) considered a concept
    pub max_chunk_words: usize,

    /// Multiplier applied to the raw frequency
    pub frequency_weight: f64,

    /// Bonus for concepts mentioned in the first sentence
    pub first_sentence_boost: f64,
}

impl ConceptExtractionConfig {
    pub fn new() -> Self {
        Self {
            max_concepts: 20,
            max_chunk_words: 3,
            frequency_weight: 10.0,
            first_sentence_boost: 0.2,
        }
    }

    pub fn with_max_concepts(mut self, max: usize) -> Self {
        self.max_concepts = max;
        self
    }

    pub fn with_max_chunk_words(mut self, words: usize) -> Self {
        self.max_chunk_words = words.max(1);
        self
    }
}

impl Default for ConceptExtractionConfig {
    fn default() -> Self {
        Self::new()
    }
}
