use std::path::PathBuf;
use std::sync::Arc;

use pdfchat_core::config::RetrievalConfig;
use pdfchat_core::Config;
use pdfchat_ingest::document::chunker::ChunkConfig;
use pdfchat_ingest::embedding::{self, Embedder};
use pdfchat_llm::AnswerGenerator;
use pdfchat_storage::IndexStore;

const DEFAULT_MAX_UPLOAD_MB: usize = 64;
const DEFAULT_EMBED_BATCH_SIZE: usize = 64;

pub struct AppState {
    pub index_store: IndexStore,
    pub embedder: Arc<dyn Embedder>,
    pub generator: AnswerGenerator,
    pub chunk_config: ChunkConfig,
    pub top_k: usize,
    pub embed_batch_size: usize,
    pub max_upload_bytes: usize,
    /// `*` allows any origin.
    pub cors_origin: String,
    /// Parent of the per-request upload directories.
    pub staging_dir: PathBuf,
}

impl AppState {
    /// State with default retrieval settings and limits.
    pub fn new(
        index_path: impl Into<PathBuf>,
        embedder: Arc<dyn Embedder>,
        generator: AnswerGenerator,
    ) -> Self {
        let retrieval = RetrievalConfig::default();
        Self {
            index_store: IndexStore::new(index_path),
            embedder,
            generator,
            chunk_config: ChunkConfig::with_sizes(retrieval.chunk_size, retrieval.chunk_overlap),
            top_k: retrieval.top_k,
            embed_batch_size: DEFAULT_EMBED_BATCH_SIZE,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
            cors_origin: "*".to_string(),
            staging_dir: std::env::temp_dir(),
        }
    }

    /// Build the state from config, creating the configured embedding and
    /// chat backends.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let embedder = embedding::create_embedder(&config.embedding, &config.llm)?;
        let generator = AnswerGenerator::new(pdfchat_llm::create_provider(&config.llm)?)
            .with_max_tokens(config.llm.max_tokens);

        let mut state = Self::new(config.storage.index_path.clone(), embedder, generator);
        state.chunk_config = ChunkConfig::with_sizes(
            config.retrieval.chunk_size,
            config.retrieval.chunk_overlap,
        );
        state.top_k = config.retrieval.top_k;
        state.embed_batch_size = config.embedding.batch_size;
        state.max_upload_bytes = config.server.max_upload_mb * 1024 * 1024;
        state.cors_origin = config.server.cors_origin.clone();
        Ok(state)
    }
}
