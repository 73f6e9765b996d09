use crate::error::Result;

use super::document::ParsedDocument;

/// Core trait for text parser implementations.
///
/// A parser segments sentences, tokenizes, tags parts of speech and stop
/// words, and finds named entities and noun chunks.
pub trait TextParser: Send + Sync {
    /// Parse the given text.
    ///
    /// # Errors
    ///
    /// Returns an error if the parser fails unexpectedly. Callers wrap it with
    /// story context.
    fn parse(&self, text: &str) -> Result<ParsedDocument>;

    /// Short identifier of the underlying model
    fn name(&self) -> &str;
}
