//! HTTP handlers. Each sub-module owns one endpoint.

mod ask;
mod health;
mod upload;

pub use ask::{ask, AskResponse};
pub use health::{health, HealthResponse};
pub use upload::{upload, UploadResponse};
