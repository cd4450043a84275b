//! Chat session state machine.
//!
//! # States
//! - Connecting: created, not yet registered
//! - Open: registered, waiting for the next user message
//! - AwaitingReply: user message recorded, provider call pending
//! - Closed: deregistered, transcript discarded
//!
//! # State Transitions
//! ```text
//! Connecting → Open: open()
//! Open → AwaitingReply: begin_turn()
//! AwaitingReply → Open: finish_turn() (success or failure)
//! any → Closed: close() or drop
//! ```

use std::sync::Arc;

use crate::config::{ChatConfig, ContextPolicy};
use crate::inference::{InferenceError, InferenceProvider};
use crate::relay::registry::{ConnectionRegistry, SessionGuard, SessionId};
use crate::relay::transcript::Transcript;

/// Relay behavior shared by every session of a service.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub context_policy: ContextPolicy,
    pub history_limit: usize,
    pub status_message: String,
    pub fallback_reply: String,
}

impl From<&ChatConfig> for RelaySettings {
    fn from(config: &ChatConfig) -> Self {
        Self {
            context_policy: config.context_policy,
            history_limit: config.history_limit,
            status_message: config.status_message.clone(),
            fallback_reply: config.fallback_reply.clone(),
        }
    }
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self::from(&ChatConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Open,
    AwaitingReply,
    Closed,
}

/// One client's conversation with the provider.
pub struct ChatSession {
    state: SessionState,
    guard: Option<SessionGuard>,
    transcript: Transcript,
    provider: Arc<dyn InferenceProvider>,
    settings: Arc<RelaySettings>,
}

impl ChatSession {
    pub fn new(provider: Arc<dyn InferenceProvider>, settings: Arc<RelaySettings>) -> Self {
        Self {
            state: SessionState::Connecting,
            guard: None,
            transcript: Transcript::new(),
            provider,
            settings,
        }
    }

    /// Register with `registry` and start accepting messages.
    pub fn open(&mut self, registry: &ConnectionRegistry) -> SessionId {
        let guard = registry.register();
        let id = guard.id();
        self.guard = Some(guard);
        self.state = SessionState::Open;
        tracing::info!(
            session_id = %id,
            model = %self.provider.model(),
            active = registry.active_count(),
            "Chat session opened"
        );
        id
    }

    /// Record a user message and return the status text to send before the reply.
    pub fn begin_turn(&mut self, text: &str) -> &str {
        let content = text.trim();
        tracing::debug!(session_id = ?self.id(), chars = content.len(), "User message received");
        self.transcript.push_user(content);
        self.state = SessionState::AwaitingReply;
        &self.settings.status_message
    }

    /// Ask the provider for a reply to the pending turn and return the text to send.
    ///
    /// Failures produce `Error: ...` or the fallback text; only successful
    /// replies are added to the transcript.
    pub async fn finish_turn(&mut self) -> String {
        let context = self
            .transcript
            .context(self.settings.context_policy, self.settings.history_limit);
        let result = self.provider.generate(context).await;

        self.state = SessionState::Open;
        match result {
            Ok(text) if !text.trim().is_empty() => {
                let reply = text.trim().to_string();
                self.transcript.push_assistant(reply.clone());
                reply
            }
            Ok(_) => self.failed_reply(&InferenceError::EmptyCompletion),
            Err(e) => self.failed_reply(&e),
        }
    }

    fn failed_reply(&self, error: &InferenceError) -> String {
        tracing::error!(session_id = ?self.id(), error = %error, "Error from inference provider");
        match error {
            InferenceError::Malformed(_) => self.settings.fallback_reply.clone(),
            other => format!("Error: {}", other),
        }
    }

    /// Deregister and discard the transcript.
    pub fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        if let Some(guard) = self.guard.take() {
            tracing::info!(session_id = %guard.id(), turns = self.transcript.len(), "Chat session closed");
        }
        self.transcript.clear();
        self.state = SessionState::Closed;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Registry ID while the session is registered.
    pub fn id(&self) -> Option<SessionId> {
        self.guard.as_ref().map(SessionGuard::id)
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }
}
