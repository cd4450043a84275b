//! Chat message and error types shared by providers and the relay.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Author of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One role-tagged entry, serialized in chat-completion wire form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Errors a provider can report for one generation.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// No API credential was configured.
    #[error("Inference client not initialized. Check your HUGGINGFACE_API_TOKEN.")]
    NotConfigured,

    /// Transport failure, including timeouts.
    #[error("Request failed: {0}")]
    Transport(String),

    /// The provider answered with a non-success status.
    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The completion carried no text.
    #[error("Received empty response from the model")]
    EmptyCompletion,

    /// The response body did not have the expected shape.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl InferenceError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            InferenceError::NotConfigured => "not_configured",
            InferenceError::Transport(_) => "transport",
            InferenceError::Status { .. } => "status",
            InferenceError::EmptyCompletion => "empty",
            InferenceError::Malformed(_) => "malformed",
        }
    }
}

impl From<reqwest::Error> for InferenceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            InferenceError::Malformed(e.to_string())
        } else if e.is_timeout() {
            InferenceError::Transport(format!("timed out: {}", e))
        } else {
            InferenceError::Transport(e.to_string())
        }
    }
}
