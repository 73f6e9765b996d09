//! Local sentence embeddings using fastembed

use std::sync::Mutex;

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use super::EmbeddingProvider;
use crate::error::{NainnyError, Result};

/// Sentence embedding model run in-process.
pub struct LocalEmbeddings {
    model: Mutex<TextEmbedding>,
    dimension: usize,
}

/// Resolve a model name such as "all-MiniLM-L6-v2" and its output dimension.
fn resolve_model(name: &str) -> Result<(EmbeddingModel, usize)> {
    let normalized: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();

    let resolved = match normalized.as_str() {
        "allminilml6v2" | "sentencetransformersallminilml6v2" => (EmbeddingModel::AllMiniLML6V2, 384),
        "allminilml12v2" => (EmbeddingModel::AllMiniLML12V2, 384),
        "bgesmallenv15" => (EmbeddingModel::BGESmallENV15, 384),
        "bgebaseenv15" => (EmbeddingModel::BGEBaseENV15, 768),
        "multilinguale5small" => (EmbeddingModel::MultilingualE5Small, 384),
        _ => {
            return Err(NainnyError::ModelUnavailable(format!(
                "Unsupported embedding model '{}'",
                name
            )));
        }
    };
    Ok(resolved)
}

impl LocalEmbeddings {
    /// Load the named model, downloading it on first use.
    ///
    /// # Errors
    ///
    /// Returns `ModelUnavailable` if the name is unknown or the model fails to load.
    pub fn new(model_name: &str) -> Result<Self> {
        let (embedding_model, dimension) = resolve_model(model_name)?;

        let mut init_options = InitOptions::default();
        init_options.model_name = embedding_model;

        let model = TextEmbedding::try_new(init_options).map_err(|e| {
            NainnyError::ModelUnavailable(format!(
                "Failed to load embedding model '{}': {}",
                model_name, e
            ))
        })?;

        tracing::info!(model = model_name, dimension, "Loaded sentence embedding model");
        Ok(Self {
            model: Mutex::new(model),
            dimension,
        })
    }

    fn run(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let mut model = self
            .model
            .lock()
            .map_err(|e| NainnyError::Other(format!("Embedding model lock poisoned: {}", e)))?;
        model
            .embed(texts, None)
            .map_err(|e| NainnyError::Other(format!("Failed to generate embedding: {}", e)))
    }
}

#[async_trait]
impl EmbeddingProvider for LocalEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.run(vec![text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| NainnyError::Other("Embedding model returned no vectors".to_string()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.run(texts.iter().map(|s| s.to_string()).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_name_normalization() {
        let (_, dim) = resolve_model("all-MiniLM-L6-v2").unwrap();
        assert_eq!(dim, 384);
        let (_, dim) = resolve_model("sentence-transformers/all-MiniLM-L6-v2").unwrap();
        assert_eq!(dim, 384);
        let (_, dim) = resolve_model("bge-base-en-v1.5").unwrap();
        assert_eq!(dim, 768);
    }

    #[test]
    fn test_unknown_model() {
        assert!(matches!(
            resolve_model("no-such-model"),
            Err(NainnyError::ModelUnavailable(_))
        ));
    }
}
