use std::sync::Arc;

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{debug, info, warn};

use pdfchat_ingest::document::is_pdf_filename;

use crate::error::{ApiError, ErrorResponse};
use crate::pipeline;
use crate::state::AppState;

#[derive(Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
}

/// `POST /upload`: multipart `files` / `files[]` fields, PDFs only.
///
/// Files are staged in a temporary directory that is removed when the
/// handler returns, whatever the outcome.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, Response> {
    let Ok(mut multipart) = multipart else {
        return Err(ApiError::NoFilesProvided.into_response());
    };

    let staging = tempfile::Builder::new()
        .prefix("pdfchat-upload-")
        .tempdir_in(&state.staging_dir)
        .map_err(|e| {
            ApiError::Internal(format!("Failed to create temp dir: {e}")).into_response()
        })?;

    let mut paths = Vec::new();
    let mut received = 0usize;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if !matches!(field.name(), Some("files") | Some("files[]")) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        received += 1;

        if !is_pdf_filename(&filename) {
            debug!("Skipping non-PDF upload '{}'", filename);
            continue;
        }

        let bytes = field.bytes().await.map_err(multipart_error)?;
        let path = staging
            .path()
            .join(format!("{:03}-{}", paths.len(), sanitize_filename(&filename)));
        tokio::fs::write(&path, &bytes).await.map_err(|e| {
            ApiError::Internal(format!("Failed to stage '{filename}': {e}")).into_response()
        })?;
        paths.push(path);
    }

    info!(received, pdfs = paths.len(), "Upload received");

    pipeline::ingest_files(&state, paths)
        .await
        .map_err(IntoResponse::into_response)?;

    Ok(Json(UploadResponse {
        message: "Files processed successfully",
    }))
}

fn multipart_error(e: MultipartError) -> Response {
    let status = e.status();
    warn!(status = status.as_u16(), "Multipart error: {}", e.body_text());
    (status, Json(ErrorResponse { error: e.body_text() })).into_response()
}

/// Last path component with anything outside `[A-Za-z0-9._-]` replaced.
fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches('.').is_empty() {
        "upload.pdf".to_string()
    } else {
        cleaned
    }
}
