use std::sync::Arc;
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::{PlannerError, Result};
use crate::models::{ChatMessage, ChatRequest};
use crate::transport::Transport;

/// How the model is asked to shape its reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyFormat {
    /// Provider-enforced JSON object
    JsonObject,
    /// Free text; the caller parses it
    Text,
}

/// Sends one prompt to the LLM and returns its raw text.
///
/// Both failure modes are fatal for the caller: the call failing or timing
/// out, and a reply with no usable text.
pub struct CompletionClient {
    tx: Arc<dyn Transport>,
    model: String,
    temperature: f32,
    max_tokens: i32,
    timeout: Duration,
}

impl CompletionClient {
    pub fn new(tx: Arc<dyn Transport>, cfg: &LlmConfig) -> Self {
        Self {
            tx,
            model: cfg.model.clone(),
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
            timeout: cfg.timeout(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn complete(&self, system: &str, prompt: &str, format: ReplyFormat) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(prompt)],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            response_format: match format {
                ReplyFormat::JsonObject => Some(serde_json::json!({"type": "json_object"})),
                ReplyFormat::Text => None,
            },
        };

        tracing::debug!(
            model = %self.model,
            prompt_chars = prompt.len(),
            "Sending completion request"
        );

        let response = tokio::time::timeout(self.timeout, self.tx.chat(&request))
            .await
            .map_err(|_| PlannerError::CompletionTimeout(self.timeout))??;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(PlannerError::EmptyCompletion)?;

        tracing::debug!(reply_chars = text.len(), "Received completion");
        Ok(text)
    }
}
