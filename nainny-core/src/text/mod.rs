//! Text parsing: sentence segmentation, tokenization, tagging, entities and
//! noun chunks.

pub mod document;
mod lexicon;
pub mod model;
pub mod rule_based;
pub mod traits;

pub use document::{EntityLabel, EntitySpan, NounChunk, ParsedDocument, PartOfSpeech, Sentence, Token};
pub use model::LanguageModel;
pub use rule_based::RuleBasedParser;
pub use traits::TextParser;
