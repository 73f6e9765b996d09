//! Factory for creating embedding providers from configuration

use crate::config::{EmbeddingProvider as EmbeddingProviderType, EmbeddingsConfig};
use crate::embeddings::providers::EmbeddingProvider;
use crate::error::Result;
use std::sync::Arc;

#[cfg(feature = "embeddings-local")]
use crate::embeddings::providers::local::LocalEmbeddings;

/// Factory for creating embedding providers
pub struct EmbeddingProviderFactory;

impl EmbeddingProviderFactory {
    /// Create an embedding provider from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be created
    pub fn create(config: &EmbeddingsConfig) -> Result<Arc<dyn EmbeddingProvider>> {
        match config.provider {
            #[cfg(feature = "embeddings-local")]
            EmbeddingProviderType::Local => Ok(Arc::new(LocalEmbeddings::new(&config.model)?)),

            #[cfg(not(feature = "embeddings-local"))]
            EmbeddingProviderType::Local => Err(crate::error::NainnyError::ModelUnavailable(
                "Local embeddings require 'embeddings-local' feature".to_string(),
            )),
        }
    }

    /// Create a provider when one is configured
    pub fn from_config(
        config: Option<&EmbeddingsConfig>,
    ) -> Result<Option<Arc<dyn EmbeddingProvider>>> {
        config.map(Self::create).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_config_no_provider() {
        assert!(EmbeddingProviderFactory::from_config(None).unwrap().is_none());
    }

    #[cfg(not(feature = "embeddings-local"))]
    #[test]
    fn test_missing_feature() {
        let config = EmbeddingsConfig {
            provider: EmbeddingProviderType::Local,
            model: "all-MiniLM-L6-v2".into(),
        };
        assert!(EmbeddingProviderFactory::create(&config).is_err());
    }
}
