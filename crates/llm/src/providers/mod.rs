pub mod gemini;
pub mod openai;

use std::sync::Arc;

use pdfchat_core::config::LlmConfig;

use crate::provider::{LlmError, LlmProvider};

/// Create the appropriate LLM provider based on config.
pub fn create_provider(llm_config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    match llm_config.provider.as_str() {
        "gemini" | "google" => {
            let api_key = llm_config
                .google_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("GOOGLE_API_KEY not set".into()))?;
            Ok(Arc::new(gemini::GeminiProvider::new(
                api_key.clone(),
                llm_config.gemini_model.clone(),
                llm_config.gemini_base_url.clone(),
            )))
        }
        "openai" => {
            let api_key = llm_config
                .openai_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("OPENAI_API_KEY not set".into()))?;
            let base_url = llm_config
                .openai_base_url
                .as_deref()
                .unwrap_or("https://api.openai.com");
            Ok(Arc::new(openai::OpenAiProvider::new(
                api_key.clone(),
                llm_config.openai_model.clone(),
                base_url.to_string(),
            )))
        }
        other => Err(LlmError::NotConfigured(format!(
            "unknown LLM provider: '{}'",
            other
        ))),
    }
}
