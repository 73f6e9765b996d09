//! Factory for creating LLM providers from configuration

use crate::config::{LLMProvider as LLMProviderType, LLMProviderConfig};
use crate::error::Result;
use crate::llm::LLMProvider;
use std::sync::Arc;

#[cfg(feature = "llm-ollama")]
use crate::llm::providers::ollama::OllamaProvider;

/// Factory for creating LLM providers
pub struct LLMProviderFactory;

impl LLMProviderFactory {
    /// Create an LLM provider from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the provider's feature is not compiled in.
    pub fn create(config: &LLMProviderConfig) -> Result<Arc<dyn LLMProvider>> {
        match config.provider {
            #[cfg(feature = "llm-ollama")]
            LLMProviderType::Ollama => {
                let model = (!config.model.is_empty()).then(|| config.model.clone());

                let provider = match &config.base_url {
                    Some(url) => OllamaProvider::new(
                        model.unwrap_or_else(|| OllamaProvider::DEFAULT_MODEL.to_string()),
                        Some(url.clone()),
                    ),
                    None => OllamaProvider::from_env(model),
                };
                tracing::info!(model = provider.model(), "Using Ollama for story adaptation");

                Ok(Arc::new(provider))
            }

            #[cfg(not(feature = "llm-ollama"))]
            LLMProviderType::Ollama => Err(crate::error::NainnyError::ModelUnavailable(
                "Ollama provider requires 'llm-ollama' feature".to_string(),
            )),
        }
    }

    /// Create a provider when one is configured
    pub fn from_config(config: Option<&LLMProviderConfig>) -> Result<Option<Arc<dyn LLMProvider>>> {
        config.map(Self::create).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_config_no_provider() {
        assert!(LLMProviderFactory::from_config(None).unwrap().is_none());
    }

    #[cfg(not(feature = "llm-ollama"))]
    #[test]
    fn test_missing_feature_is_model_unavailable() {
        let config = LLMProviderConfig {
            provider: LLMProviderType::Ollama,
            model: "llama3.2".into(),
            base_url: None,
            max_new_tokens: 256,
        };
        let err = LLMProviderFactory::create(&config).err().unwrap();
        assert_eq!(err.kind(), crate::error::ErrorKind::ModelUnavailable);
    }

    #[cfg(feature = "llm-ollama")]
    #[test]
    fn test_ollama_from_config() {
        let config = LLMProviderConfig {
            provider: LLMProviderType::Ollama,
            model: "llama3.2".into(),
            base_url: Some("http://localhost:11434".into()),
            max_new_tokens: 256,
        };
        let provider = LLMProviderFactory::create(&config).unwrap();
        assert_eq!(provider.model_info().model_name, "llama3.2");
    }
}
