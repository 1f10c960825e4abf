pub mod batcher;
pub mod gemini;
pub mod openai;
pub mod traits;

use std::sync::Arc;

use pdfchat_core::config::{EmbeddingConfig, LlmConfig};

pub use batcher::embed_in_batches;
pub use gemini::GeminiEmbedder;
pub use openai::OpenAiEmbedder;
pub use traits::{Embedder, EmbeddingError};

/// Create the embedding backend selected by config. API keys are shared
/// with the LLM section.
pub fn create_embedder(
    embedding: &EmbeddingConfig,
    llm: &LlmConfig,
) -> Result<Arc<dyn Embedder>, EmbeddingError> {
    match embedding.provider.as_str() {
        "gemini" | "google" => {
            let api_key = llm
                .google_api_key
                .as_ref()
                .ok_or_else(|| EmbeddingError::NotConfigured("GOOGLE_API_KEY not set".into()))?;
            Ok(Arc::new(GeminiEmbedder::new(
                api_key.clone(),
                embedding.model.clone(),
                llm.gemini_base_url.clone(),
                embedding.dimensions,
            )))
        }
        "openai" => {
            let api_key = llm
                .openai_api_key
                .as_ref()
                .ok_or_else(|| EmbeddingError::NotConfigured("OPENAI_API_KEY not set".into()))?;
            Ok(Arc::new(OpenAiEmbedder::new(
                api_key.clone(),
                embedding.model.clone(),
                llm.openai_base_url.clone(),
                embedding.dimensions,
            )))
        }
        other => Err(EmbeddingError::NotConfigured(format!(
            "unknown embedding provider: '{}'",
            other
        ))),
    }
}
