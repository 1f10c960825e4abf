use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Embedding count mismatch: sent {expected} texts, got {actual} vectors")]
    CountMismatch { expected: usize, actual: usize },

    #[error("embedding provider not configured: {0}")]
    NotConfigured(String),
}

impl From<reqwest::Error> for EmbeddingError {
    fn from(e: reqwest::Error) -> Self {
        // Request URLs can carry credentials.
        Self::Http(e.without_url())
    }
}

/// Trait for embedding backends (Gemini, OpenAI, ...).
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of documents, returning one vector per input text (in order).
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Embed a search query. Backends that distinguish query and document
    /// embeddings override this.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vectors = self.embed_batch(&[text]).await?;
        if vectors.len() != 1 {
            return Err(EmbeddingError::CountMismatch {
                expected: 1,
                actual: vectors.len(),
            });
        }
        Ok(vectors.remove(0))
    }

    /// The dimensionality of the output vectors.
    fn dimensions(&self) -> usize;

    /// Model identifier, recorded alongside persisted vectors.
    fn model_name(&self) -> &str;
}
