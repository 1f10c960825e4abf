use std::path::PathBuf;

use pdfchat_ingest::embedding::EmbeddingError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Index not found at {}; upload PDF files first", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to load index {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("Incompatible index: {0}")]
    Incompatible(String),

    #[error("Invalid index data: {0}")]
    Invalid(String),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode index: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
}

impl IndexError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
