//! Single completion call per question.

use physrag_core::{AppError, AppResult};
use physrag_llm::{LlmClient, LlmRequest};
use physrag_prompt::BuiltPrompt;
use std::sync::Arc;

/// Default completion model.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Sampling temperature for every completion.
pub const COMPLETION_TEMPERATURE: f32 = 0.0;

/// Output token cap for every completion.
pub const COMPLETION_MAX_TOKENS: u32 = 400;

/// Sends composed prompts to the completion collaborator.
///
/// Temperature zero asks for deterministic output, but the remote model may
/// still vary between calls. Failures are not retried.
#[derive(Clone)]
pub struct CompletionInvoker {
    client: Arc<dyn LlmClient>,
    model: String,
}

impl CompletionInvoker {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Return the trimmed completion text for `prompt`.
    pub async fn invoke(&self, prompt: &BuiltPrompt) -> AppResult<String> {
        let request = LlmRequest::new(prompt.user.clone(), &self.model)
            .with_system(prompt.system.clone())
            .with_temperature(COMPLETION_TEMPERATURE)
            .with_max_tokens(COMPLETION_MAX_TOKENS);

        let response = self.client.complete(&request).await.map_err(|e| match e {
            AppError::Completion(_) => e,
            other => AppError::Completion(other.to_string()),
        })?;

        tracing::debug!(
            "Token usage - Prompt: {}, Completion: {}, Total: {}",
            response.usage.prompt_tokens,
            response.usage.completion_tokens,
            response.usage.total_tokens
        );

        Ok(response.content.trim().to_string())
    }
}
