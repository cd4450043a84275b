//! The provider trait and provider selection.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ChatConfig;
use crate::inference::client::HostedClient;
use crate::inference::types::{ChatMessage, InferenceError};

/// Something that turns a conversation context into a reply.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Generate the assistant reply for `context`, whose last entry is the
    /// user message being answered.
    async fn generate(&self, context: &[ChatMessage]) -> Result<String, InferenceError>;

    /// Model identifier shown to users and logged with each call.
    fn model(&self) -> &str;
}

/// Provider used when no API credential is configured.
#[derive(Debug, Clone)]
pub struct Unconfigured {
    model: String,
}

impl Unconfigured {
    pub fn new(model: impl Into<String>) -> Self {
        Self { model: model.into() }
    }
}

#[async_trait]
impl InferenceProvider for Unconfigured {
    async fn generate(&self, _context: &[ChatMessage]) -> Result<String, InferenceError> {
        Err(InferenceError::NotConfigured)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Build the provider described by `config`.
///
/// A missing credential is logged and yields [`Unconfigured`].
pub fn from_config(config: &ChatConfig) -> Result<Arc<dyn InferenceProvider>, InferenceError> {
    match config.api_token.as_deref() {
        Some(token) => {
            let client = HostedClient::new(config, token)?;
            tracing::info!(model = %config.model, api_base = %config.api_base, "Initialized inference client");
            Ok(Arc::new(client))
        }
        None => {
            tracing::error!("HUGGINGFACE_API_TOKEN not found in environment; chat replies will be errors");
            Ok(Arc::new(Unconfigured::new(config.model.clone())))
        }
    }
}
