//! HTTP router construction.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::api;
use crate::state::AppState;

/// Build the application router. Each route accepts only its own method;
/// anything else gets 405.
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.max_upload_bytes;
    let cors = cors_layer(&state.cors_origin);

    Router::new()
        .route("/upload", post(api::upload))
        .route("/ask", post(api::ask))
        .route("/health", get(api::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    if origin == "*" {
        return CorsLayer::permissive();
    }
    match origin.parse::<HeaderValue>() {
        Ok(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any),
        Err(_) => {
            warn!("Invalid CORS_ORIGIN '{}'; cross-origin requests will be refused", origin);
            CorsLayer::new()
        }
    }
}
