//! Per-connection conversation transcript.

use crate::config::ContextPolicy;
use crate::inference::ChatMessage;

/// Append-only list of role-tagged entries for one connection.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.entries.push(ChatMessage::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.entries.push(ChatMessage::assistant(content));
    }

    pub fn entries(&self) -> &[ChatMessage] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sent to the provider under `policy`.
    ///
    /// `history_limit` caps `FullTranscript` to the most recent entries; 0 means no cap.
    pub fn context(&self, policy: ContextPolicy, history_limit: usize) -> &[ChatMessage] {
        let len = self.entries.len();
        let keep = match policy {
            ContextPolicy::LatestMessage => 1,
            ContextPolicy::FullTranscript if history_limit == 0 => len,
            ContextPolicy::FullTranscript => history_limit,
        };
        &self.entries[len.saturating_sub(keep)..]
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
