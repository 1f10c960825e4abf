use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::provider::{LlmError, LlmProvider, Message, Role};

pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        let model = model.strip_prefix("models/").unwrap_or(&model).to_string();
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build the request body for the Gemini generateContent API.
    fn build_request_body(
        messages: &[Message],
        temperature: f32,
        max_tokens: u32,
    ) -> serde_json::Value {
        // Gemini takes the system prompt as a separate system_instruction field
        let system_msg = messages
            .iter()
            .find(|m| m.role == Role::System)
            .map(|m| m.content.clone());

        let contents: Vec<serde_json::Value> = messages
            .iter()
            .filter_map(|m| {
                let role = match m.role {
                    Role::User => "user",
                    Role::Assistant => "model",
                    Role::System => return None,
                };
                Some(json!({
                    "role": role,
                    "parts": [{ "text": m.content }],
                }))
            })
            .collect();

        let mut body = json!({
            "contents": contents,
            "generationConfig": {
                "temperature": temperature,
                "maxOutputTokens": max_tokens,
            },
        });

        if let Some(system) = system_msg {
            body["system_instruction"] = json!({
                "parts": [{ "text": system }],
            });
        }

        body
    }

    /// Concatenate the text parts of the first candidate.
    fn parse_response(resp: &serde_json::Value) -> Result<String, LlmError> {
        if let Some(reason) = resp["promptFeedback"]["blockReason"].as_str() {
            return Err(LlmError::ParseError(format!("prompt blocked: {reason}")));
        }

        let parts = resp["candidates"][0]["content"]["parts"]
            .as_array()
            .ok_or_else(|| LlmError::ParseError("missing candidates[0].content.parts".into()))?;

        let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
        if text.is_empty() {
            let finish = resp["candidates"][0]["finishReason"].as_str().unwrap_or("unknown");
            return Err(LlmError::ParseError(format!(
                "empty response (finishReason: {finish})"
            )));
        }
        Ok(text)
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn complete(
        &self,
        messages: Vec<Message>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);

        let body = Self::build_request_body(&messages, temperature, max_tokens);

        debug!("Gemini request to model={}", self.model);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, body });
        }

        let resp: serde_json::Value = response.json().await?;
        Self::parse_response(&resp)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
