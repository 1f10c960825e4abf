use std::sync::Arc;

use tracing::{debug, info};

use crate::provider::{LlmError, LlmProvider, Message};

/// Sampling temperature for answers.
pub const ANSWER_TEMPERATURE: f32 = 0.3;

const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Answers a question from retrieved context with a single model call.
pub struct AnswerGenerator {
    provider: Arc<dyn LlmProvider>,
    temperature: f32,
    max_tokens: u32,
}

impl AnswerGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            temperature: ANSWER_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Build the prompt, call the model once and return its text unchanged.
    pub async fn answer<S: AsRef<str>>(
        &self,
        context: &[S],
        question: &str,
    ) -> Result<String, LlmError> {
        let prompt = build_prompt(context, question);
        info!(
            model = self.provider.model_name(),
            context_chunks = context.len(),
            prompt_chars = prompt.chars().count(),
            "Generating answer"
        );

        let answer = self
            .provider
            .complete(vec![Message::user(prompt)], self.temperature, self.max_tokens)
            .await?;

        debug!(answer_chars = answer.chars().count(), "Answer received");
        Ok(answer)
    }
}

/// The fixed question-answering prompt. Chunks are joined with blank lines.
pub fn build_prompt<S: AsRef<str>>(context: &[S], question: &str) -> String {
    let context = context
        .iter()
        .map(|c| c.as_ref())
        .collect::<Vec<_>>()
        .join("\n\n");
    format!(
        "Answer the question based on the context provided:\n\
         Context: {context}\n\
         Question: {question}\n\
         Answer:"
    )
}
