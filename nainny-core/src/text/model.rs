//! Explicitly owned language model handle.

use std::sync::{Arc, RwLock};

use crate::error::{NainnyError, Result};

use super::document::ParsedDocument;
use super::rule_based::RuleBasedParser;
use super::traits::TextParser;

/// Owns the text parser used by analysis components.
///
/// Components receive a `LanguageModel` at construction instead of reaching
/// for process-wide state. The parser can be swapped with [`reload`](Self::reload)
/// when configuration changes.
#[derive(Clone)]
pub struct LanguageModel {
    parser: Arc<RwLock<Option<Arc<dyn TextParser>>>>,
}

impl LanguageModel {
    /// Load the built-in rule-based English parser.
    pub fn load() -> Self {
        Self::with_parser(Arc::new(RuleBasedParser::new()))
    }

    /// Wrap a custom parser.
    pub fn with_parser(parser: Arc<dyn TextParser>) -> Self {
        Self {
            parser: Arc::new(RwLock::new(Some(parser))),
        }
    }

    /// A handle with no parser loaded.
    pub fn unloaded() -> Self {
        Self {
            parser: Arc::new(RwLock::new(None)),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.parser.read().map(|p| p.is_some()).unwrap_or(false)
    }

    /// Parse a short probe sentence to check the parser works.
    ///
    /// # Errors
    ///
    /// Returns `ModelUnavailable` if no parser is loaded or the probe fails.
    pub fn health_check(&self) -> Result<()> {
        let doc = self.parse("The cat sat.")?;
        if doc.tokens.is_empty() || doc.sentences.is_empty() {
            return Err(NainnyError::ModelUnavailable(
                "language model returned an empty parse".to_string(),
            ));
        }
        Ok(())
    }

    /// Replace the loaded parser.
    pub fn reload(&self, parser: Arc<dyn TextParser>) -> Result<()> {
        let mut slot = self.parser.write().map_err(|e| {
            NainnyError::ModelUnavailable(format!("Failed to lock language model: {}", e))
        })?;
        tracing::info!(model = parser.name(), "Language model reloaded");
        *slot = Some(parser);
        Ok(())
    }

    /// Get the loaded parser.
    ///
    /// # Errors
    ///
    /// Returns `ModelUnavailable` if no parser is loaded.
    pub fn parser(&self) -> Result<Arc<dyn TextParser>> {
        let slot = self.parser.read().map_err(|e| {
            NainnyError::ModelUnavailable(format!("Failed to lock language model: {}", e))
        })?;
        (*slot)
            .clone()
            .ok_or_else(|| NainnyError::ModelUnavailable("language model not loaded".to_string()))
    }

    pub fn parse(&self, text: &str) -> Result<ParsedDocument> {
        self.parser()?.parse(text)
    }
}

impl std::fmt::Debug for LanguageModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageModel")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_loaded_model_passes_health_check() {
        let model = LanguageModel::load();
        assert!(model.is_loaded());
        assert!(model.health_check().is_ok());
    }

    #[test]
    fn test_unloaded_model_reports_unavailable() {
        let model = LanguageModel::unloaded();
        assert!(!model.is_loaded());
        let err = model.parse("Hello there.").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ModelUnavailable);
    }

    #[test]
    fn test_reload_is_visible_to_clones() {
        let model = LanguageModel::unloaded();
        let shared = model.clone();
        model.reload(Arc::new(RuleBasedParser::new())).unwrap();
        assert!(shared.is_loaded());
        assert!(shared.health_check().is_ok());
    }
}
