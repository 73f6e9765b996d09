//! Embedding provider implementations

use crate::error::Result;
use async_trait::async_trait;

/// Produces fixed-size vector embeddings for text.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed several texts. The default embeds them one at a time.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }

    fn dimension(&self) -> usize;
}

#[cfg(feature = "embeddings-local")]
pub mod local;

#[cfg(feature = "embeddings-local")]
pub use local::LocalEmbeddings;
