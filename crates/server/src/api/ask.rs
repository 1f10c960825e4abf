use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::pipeline;
use crate::state::AppState;

#[derive(Serialize)]
pub struct AskResponse {
    pub answer: String,
}

/// `POST /ask` with `{"question": "..."}`. The body is parsed as JSON
/// whatever its content type.
pub async fn ask(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AskResponse>, ApiError> {
    let question = parse_question(&body)?;
    let answer = pipeline::answer_question(&state, &question).await?;
    Ok(Json(AskResponse { answer }))
}

fn parse_question(body: &[u8]) -> Result<String, ApiError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| ApiError::MalformedRequestBody)?;
    value
        .get("question")
        .and_then(Value::as_str)
        .filter(|q| !q.trim().is_empty())
        .map(str::to_string)
        .ok_or(ApiError::MissingQuestionField)
}
