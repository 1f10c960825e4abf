use chrono::{DateTime, Utc};
use pdfchat_ingest::embedding::Embedder;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::IndexError;

/// Version of the persisted layout. Bumped whenever `VectorIndex` changes shape.
pub const FORMAT_VERSION: u32 = 1;

/// One chunk with its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub text: String,
    pub embedding: Vec<f32>,
}

/// A retrieved chunk with its cosine similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub text: String,
    pub score: f32,
}

/// In-memory similarity index over chunk embeddings (exact cosine search).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex {
    pub version: u32,
    pub embedding_model: String,
    pub dimensions: usize,
    pub created_at: DateTime<Utc>,
    pub entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Pair chunks with their embeddings. Every vector must have `dimensions`
    /// components and there must be exactly one per chunk.
    pub fn build(
        embedding_model: &str,
        dimensions: usize,
        chunks: Vec<String>,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<Self, IndexError> {
        if chunks.len() != embeddings.len() {
            return Err(IndexError::Invalid(format!(
                "{} chunks but {} embeddings",
                chunks.len(),
                embeddings.len()
            )));
        }
        if let Some((i, v)) = embeddings.iter().enumerate().find(|(_, v)| v.len() != dimensions) {
            return Err(IndexError::Invalid(format!(
                "embedding {} has {} dimensions, expected {}",
                i,
                v.len(),
                dimensions
            )));
        }

        let entries = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(text, embedding)| IndexEntry { text, embedding })
            .collect();

        Ok(Self {
            version: FORMAT_VERSION,
            embedding_model: embedding_model.to_string(),
            dimensions,
            created_at: Utc::now(),
            entries,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fails with [`IndexError::Incompatible`] when the index was written
    /// by a different format version or embedding model.
    pub fn check_compatible(
        &self,
        embedding_model: &str,
        dimensions: usize,
    ) -> Result<(), IndexError> {
        if self.version != FORMAT_VERSION {
            return Err(IndexError::Incompatible(format!(
                "format version {} (expected {})",
                self.version, FORMAT_VERSION
            )));
        }
        if self.embedding_model != embedding_model || self.dimensions != dimensions {
            return Err(IndexError::Incompatible(format!(
                "built with {} ({} dims), current embedder is {} ({} dims)",
                self.embedding_model, self.dimensions, embedding_model, dimensions
            )));
        }
        Ok(())
    }

    /// Top-`k` entries by descending cosine similarity. Ties keep insertion
    /// order.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<SearchHit> {
        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (i, cosine_similarity(query, &e.embedding)))
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored
            .into_iter()
            .take(k)
            .map(|(i, score)| SearchHit {
                text: self.entries[i].text.clone(),
                score,
            })
            .collect()
    }

    /// Embed `question` with `embedder` and return the `k` closest chunks.
    pub async fn query(
        &self,
        embedder: &dyn Embedder,
        question: &str,
        k: usize,
    ) -> Result<Vec<SearchHit>, IndexError> {
        self.check_compatible(embedder.model_name(), embedder.dimensions())?;
        let query = embedder.embed_query(question).await?;
        if query.len() != self.dimensions {
            return Err(IndexError::Incompatible(format!(
                "query vector has {} dimensions, index has {}",
                query.len(),
                self.dimensions
            )));
        }
        let hits = self.search(&query, k);
        debug!(entries = self.entries.len(), hits = hits.len(), "Index query");
        Ok(hits)
    }
}

/// Cosine similarity; zero when either vector has zero norm.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
