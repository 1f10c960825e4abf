use tracing::debug;

use super::traits::{Embedder, EmbeddingError};

/// Embed `texts` in batches of at most `batch_size`, returning one vector
/// per text in input order.
///
/// Any batch whose response length differs from its request length fails
/// the whole call with [`EmbeddingError::CountMismatch`].
pub async fn embed_in_batches(
    embedder: &dyn Embedder,
    texts: &[&str],
    batch_size: usize,
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let batch_size = batch_size.max(1);
    let mut vectors = Vec::with_capacity(texts.len());

    for (i, batch) in texts.chunks(batch_size).enumerate() {
        debug!("Embedding batch {} ({} texts)", i + 1, batch.len());
        let embeddings = embedder.embed_batch(batch).await?;
        if embeddings.len() != batch.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: batch.len(),
                actual: embeddings.len(),
            });
        }
        vectors.extend(embeddings);
    }

    Ok(vectors)
}
