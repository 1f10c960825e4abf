//! HTTP service for asking questions about uploaded PDF documents.

pub mod api;
pub mod cli;
pub mod error;
pub mod pipeline;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
