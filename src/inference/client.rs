//! OpenAI-compatible chat-completion client for hosted inference.
//!
//! # Responsibilities
//! - Send the conversation context with the configured model and sampling parameters
//! - Enforce a per-call timeout
//! - Map transport, status and body problems to `InferenceError`

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ChatConfig;
use crate::inference::provider::InferenceProvider;
use crate::inference::types::{ChatMessage, InferenceError};
use crate::observability::metrics;

/// Longest provider error body kept in an error message.
const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for a hosted chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct HostedClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl HostedClient {
    /// Create a client for `config.api_base` authenticated with `token`.
    pub fn new(config: &ChatConfig, token: &str) -> Result<Self, InferenceError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", config.api_base.trim_end_matches('/')),
            token: token.to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// Full URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn complete(&self, context: &[ChatMessage]) -> Result<String, InferenceError> {
        let request = CompletionRequest {
            model: &self.model,
            messages: context,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let completion: CompletionResponse = response.json().await?;
        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| InferenceError::Malformed("no choices in completion".to_string()))?;

        match choice.message.content {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(InferenceError::EmptyCompletion),
        }
    }
}

#[async_trait]
impl InferenceProvider for HostedClient {
    async fn generate(&self, context: &[ChatMessage]) -> Result<String, InferenceError> {
        let start = Instant::now();
        tracing::info!(model = %self.model, messages = context.len(), "Sending request to inference provider");
        if let Some(latest) = context.last() {
            tracing::debug!(content = %latest.content, "Latest message");
        }

        let result = self.complete(context).await;
        match &result {
            Ok(text) => {
                let preview: String = text.chars().take(100).collect();
                tracing::info!(elapsed_ms = start.elapsed().as_millis() as u64, preview = %preview, "Received completion");
                metrics::record_inference("ok", start);
            }
            Err(e) => {
                tracing::debug!(error = %e, model = %self.model, "Inference request failed");
                metrics::record_inference(e.kind(), start);
            }
        }
        result
    }

    fn model(&self) -> &str {
        &self.model
    }
}
