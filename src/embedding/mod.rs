//! Text-to-vector embedding seam.
//!
//! Provides the [`EmbeddingProvider`] trait and a deterministic feature-hashing
//! implementation. Production deployments are expected to plug a real sentence
//! embedding model in behind the same trait; the query layer never calls the
//! provider — it only consumes vectors already stored at write time.

pub mod hashed;

use anyhow::Result;

/// Number of dimensions in the embedding vectors.
pub const EMBEDDING_DIM: usize = 384;

/// Trait for embedding text into vectors.
///
/// Implementations produce L2-normalized vectors of exactly [`EMBEDDING_DIM`]
/// dimensions.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text string into a vector.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of text strings. Implementations may override for batched inference.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Return the number of dimensions this provider produces.
    fn dimensions(&self) -> usize {
        EMBEDDING_DIM
    }
}

/// Create an embedding provider from config.
///
/// Currently only `"hashed"` is supported (deterministic bag-of-hashed-tokens).
pub fn create_provider(
    config: &crate::config::EmbeddingConfig,
) -> Result<Box<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "hashed" => Ok(Box::new(hashed::HashedEmbeddingProvider::new())),
        other => anyhow::bail!("unknown embedding provider: {other}. Supported: hashed"),
    }
}
