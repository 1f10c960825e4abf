//! The two request pipelines, independent of HTTP.
//!
//! Ingest: extract → chunk → embed → build → save.
//! Ask: load → query → generate.

use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use pdfchat_ingest::document::{self, chunker};
use pdfchat_ingest::embedding::embed_in_batches;
use pdfchat_storage::VectorIndex;

use crate::error::ApiError;
use crate::state::AppState;

/// Counts from a completed ingest, for logs and the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub files: usize,
    pub pages: usize,
    pub chars: usize,
    pub chunks: usize,
}

/// Replace the index with the contents of `paths` (PDF files, in order).
pub async fn ingest_files(state: &AppState, paths: Vec<PathBuf>) -> Result<IngestReport, ApiError> {
    if paths.is_empty() {
        return Err(ApiError::NoFilesProvided);
    }

    let extracted = tokio::task::spawn_blocking(move || document::extract_files(&paths))
        .await
        .map_err(|e| ApiError::Internal(format!("extraction task failed: {e}")))??;

    if extracted.is_empty() {
        return Err(ApiError::EmptyExtractedText);
    }

    let chunks = chunker::split_text(&extracted.text, &state.chunk_config);
    if chunks.is_empty() {
        return Err(ApiError::EmptyExtractedText);
    }

    let texts: Vec<&str> = chunks.iter().map(String::as_str).collect();
    let embeddings =
        embed_in_batches(state.embedder.as_ref(), &texts, state.embed_batch_size).await?;

    let report = IngestReport {
        files: extracted.file_count,
        pages: extracted.page_count,
        chars: extracted.text.chars().count(),
        chunks: chunks.len(),
    };

    let index = VectorIndex::build(
        state.embedder.model_name(),
        state.embedder.dimensions(),
        chunks,
        embeddings,
    )?;
    state.index_store.save(&index).await?;

    info!(
        files = report.files,
        pages = report.pages,
        chars = report.chars,
        chunks = report.chunks,
        "Index rebuilt"
    );
    Ok(report)
}

/// Answer `question` from the persisted index.
pub async fn answer_question(state: &AppState, question: &str) -> Result<String, ApiError> {
    let index = state.index_store.load().await?;
    let hits = index
        .query(state.embedder.as_ref(), question, state.top_k)
        .await?;

    info!(
        question_chars = question.chars().count(),
        retrieved = hits.len(),
        "Retrieved context"
    );

    let context: Vec<&str> = hits.iter().map(|h| h.text.as_str()).collect();
    let answer = state.generator.answer(&context, question).await?;
    Ok(answer)
}
