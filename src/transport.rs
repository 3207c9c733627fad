use async_trait::async_trait;
use reqwest::Client;
use tokio::time::sleep;

use crate::config::LlmConfig;
use crate::error::{PlannerError, Result};
use crate::models::{ChatRequest, ChatResponse};
use crate::retry::{RetryPolicy, is_retryable_status};

#[async_trait]
pub trait Transport: Send + Sync {
    async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse>;
}

/// Transport for any OpenAI-compatible `/chat/completions` endpoint
pub struct ChatCompletionsTransport {
    client: Client,
    endpoint: String,
    api_key: String,
    retry: RetryPolicy,
}

impl ChatCompletionsTransport {
    pub fn new(cfg: &LlmConfig, retry: RetryPolicy) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| PlannerError::Config(format!("Failed to build LLM HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", cfg.base_url.trim_end_matches('/')),
            api_key: cfg.api_key.clone(),
            retry,
        })
    }
}

#[async_trait]
impl Transport for ChatCompletionsTransport {
    async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse> {
        let mut attempts = 0;

        loop {
            attempts += 1;

            let failure = match self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(req)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.json().await.map_err(|e| {
                            PlannerError::Completion(format!(
                                "Failed to parse completion response: {e}"
                            ))
                        });
                    }

                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    if !is_retryable_status(status) {
                        return Err(PlannerError::Completion(format!(
                            "Completion API returned {status}: {body}"
                        )));
                    }
                    format!("status {status}: {body}")
                }
                Err(e) => format!("network error: {e}"),
            };

            if !self.retry.should_retry(attempts) {
                return Err(PlannerError::Completion(format!(
                    "Completion API failed after {attempts} attempts ({failure})"
                )));
            }

            let delay = self.retry.delay_for(attempts);
            tracing::warn!(
                attempt = attempts,
                delay_ms = delay.as_millis() as u64,
                "Completion call failed, retrying: {}",
                failure
            );
            sleep(delay).await;
        }
    }
}
