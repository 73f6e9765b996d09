//! Concept extraction from parsed stories.
//!
//! Concepts are the named entities and short noun phrases a story is built
//! around. Each one carries an importance score so callers can keep only the
//! most salient ones.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nainny_core::concepts::prelude::*;
//! use nainny_core::text::LanguageModel;
//!
//! fn main() -> nainny_core::error::Result<()> {
//!     let model = LanguageModel::load();
//!     let doc = model.parse("Meena lit a diya for Diwali.")?;
//!
//!     let extractor = BasicConceptExtractor::default();
//!     for concept in extractor.extract(&doc) {
//!         println!("{} ({}): {}", concept.text, concept.concept_type, concept.importance);
//!     }
//!     Ok(())
//! }
//! ```

pub mod basic_extractor;
pub mod config;
pub mod traits;
pub mod types;

pub use basic_extractor::{BasicConceptExtractor, NOUN_CHUNK_LABEL};
pub use config::ConceptExtractionConfig;
pub use traits::ConceptExtractor;
pub use types::{Concept, ConceptType, Relations};

/// Extract concepts with the default configuration.
pub fn extract_concepts(doc: &crate::text::ParsedDocument) -> Vec<Concept> {
    BasicConceptExtractor::default().extract(doc)
}

pub mod prelude {
    pub use crate::concepts::{
        BasicConceptExtractor, Concept, ConceptExtractionConfig, ConceptExtractor, ConceptType,
        Relations,
    };
}
