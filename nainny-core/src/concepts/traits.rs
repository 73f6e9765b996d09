use crate::text::ParsedDocument;

use super::types::Concept;

/// Core trait for concept extraction implementations.
///
/// Extraction is a pure function of the parsed document.
pub trait ConceptExtractor: Send + Sync {
    /// Extract concepts from the given document.
    ///
    /// # Returns
    ///
    /// A vector of extracted concepts, sorted by importance (highest first)
    fn extract(&self, doc: &ParsedDocument) -> Vec<Concept>;
}
