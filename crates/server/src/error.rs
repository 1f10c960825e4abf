//! Request failures and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::warn;

use pdfchat_ingest::document::ExtractionError;
use pdfchat_ingest::embedding::EmbeddingError;
use pdfchat_llm::LlmError;
use pdfchat_storage::IndexError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No files provided")]
    NoFilesProvided,

    #[error("Error processing file {path}: {cause}")]
    UnreadablePdf { path: String, cause: String },

    #[error("No text extracted from PDF files")]
    EmptyExtractedText,

    #[error("Index not found. Process PDFs first.")]
    IndexNotFound,

    #[error("Error loading index: {0}")]
    IndexLoadFailure(String),

    #[error("Embedding service error: {0}")]
    EmbeddingServiceFailure(String),

    #[error("Error generating response: {0}")]
    GenerationFailure(String),

    #[error("No question provided")]
    MissingQuestionField,

    #[error("Invalid JSON")]
    MalformedRequestBody,

    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NoFilesProvided
            | Self::EmptyExtractedText
            | Self::MissingQuestionField
            | Self::MalformedRequestBody => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(status = status.as_u16(), "Request failed: {}", self);
        }
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

impl From<ExtractionError> for ApiError {
    fn from(e: ExtractionError) -> Self {
        match e {
            ExtractionError::UnreadablePdf { path, cause } => Self::UnreadablePdf { path, cause },
            ExtractionError::Io { path, source } => Self::UnreadablePdf {
                path,
                cause: source.to_string(),
            },
        }
    }
}

impl From<EmbeddingError> for ApiError {
    fn from(e: EmbeddingError) -> Self {
        Self::EmbeddingServiceFailure(e.to_string())
    }
}

impl From<IndexError> for ApiError {
    fn from(e: IndexError) -> Self {
        match e {
            IndexError::NotFound(_) => Self::IndexNotFound,
            IndexError::Malformed { .. } | IndexError::Incompatible(_) => {
                Self::IndexLoadFailure(e.to_string())
            }
            IndexError::Embedding(inner) => inner.into(),
            IndexError::Invalid(reason) => Self::EmbeddingServiceFailure(reason),
            IndexError::Io { .. } | IndexError::Encode(_) => Self::Internal(e.to_string()),
        }
    }
}

impl From<LlmError> for ApiError {
    fn from(e: LlmError) -> Self {
        Self::GenerationFailure(e.to_string())
    }
}
