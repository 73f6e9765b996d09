use std::collections::HashSet;

use crate::text::{ParsedDocument, PartOfSpeech};

use super::config::ConceptExtractionConfig;
use super::traits::ConceptExtractor;
use super::types::{Concept, ConceptType};

/// Label given to concepts that come from noun chunks.
pub const NOUN_CHUNK_LABEL: &str = "NOUN_CHUNK";

/// Concept extractor over named entities and noun chunks.
///
/// Entities are taken first, then short noun chunks headed by a content noun.
/// Concepts are deduplicated on lowercase text and ranked by importance.
pub struct BasicConceptExtractor {
    config: ConceptExtractionConfig,
}

impl BasicConceptExtractor {
    pub fn new(config: ConceptExtractionConfig) -> Self {
        Self { config }
    }

    /// Score a concept by frequency and first-sentence position.
    ///
    /// Frequency counts tokens whose lowercase text contains the concept's
    /// lowercase text, normalised by the number of non-punctuation tokens.
    pub fn importance(&self, text: &str, doc: &ParsedDocument) -> f64 {
        let text_lower = text.to_lowercase();

        let count = doc
            .tokens
            .iter()
            .filter(|t| t.lower().contains(&text_lower))
            .count();
        let frequency = count as f64 / doc.non_punct_len().max(1) as f64;

        let boost = if doc.first_sentence_lower().contains(&text_lower) {
            self.config.first_sentence_boost
        } else {
            0.0
        };

        let importance = (frequency * self.config.frequency_weight + boost).clamp(0.0, 1.0);
        (importance * 1000.0).round() / 1000.0
    }
}

impl Default for BasicConceptExtractor {
    fn default() -> Self {
        Self::new(ConceptExtractionConfig::default())
    }
}

impl ConceptExtractor for BasicConceptExtractor {
    fn extract(&self, doc: &ParsedDocument) -> Vec<Concept> {
        let mut concepts = Vec::new();
        let mut seen = HashSet::new();

        for entity in &doc.entities {
            if !seen.insert(entity.text.to_lowercase()) {
                continue;
            }
            concepts.push(Concept::new(
                entity.text.clone(),
                ConceptType::from_entity_label(&entity.label),
                entity.label.as_str(),
                self.importance(&entity.text, doc),
            ));
        }

        for chunk in &doc.noun_chunks {
            let chunk_lower = chunk.text.to_lowercase();
            if seen.contains(&chunk_lower)
                || chunk.text.split_whitespace().count() > self.config.max_chunk_words
            {
                continue;
            }

            let Some(root) = doc.root_of(chunk) else {
                continue;
            };
            if root.pos != PartOfSpeech::Noun || root.is_stop {
                continue;
            }

            concepts.push(Concept::new(
                chunk.text.clone(),
                ConceptType::Concept,
                NOUN_CHUNK_LABEL,
                self.importance(&chunk.text, doc),
            ));
            seen.insert(chunk_lower);
        }

        // Stable sort keeps entities ahead of chunks on ties.
        concepts.sort_by(|a, b| {
            b.importance
                .partial_cmp(&a.importance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        concepts.truncate(self.config.max_concepts);

        tracing::debug!(count = concepts.len(), "Extracted concepts");
        concepts
    }
}
