//! Registry of open chat sessions.
//!
//! # Responsibilities
//! - Generate unique session IDs for tracing
//! - Track which sessions are open and since when
//! - Remove a session automatically when its guard is dropped

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::observability::metrics;

/// Unique identifier for a chat session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "chat-{}", self.0)
    }
}

/// Bookkeeping kept per open session.
#[derive(Debug, Clone, Copy)]
pub struct SessionInfo {
    pub connected_at: DateTime<Utc>,
}

/// Set of currently open sessions.
#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    sessions: Arc<DashMap<SessionId, SessionInfo>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly opened session. The returned guard removes it on drop.
    pub fn register(&self) -> SessionGuard {
        let id = SessionId::new();
        self.sessions.insert(
            id,
            SessionInfo {
                connected_at: Utc::now(),
            },
        );
        metrics::set_active_sessions(self.sessions.len());
        tracing::debug!(session_id = %id, active = self.sessions.len(), "Session registered");

        SessionGuard {
            id,
            sessions: Arc::clone(&self.sessions),
        }
    }

    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.contains_key(&id)
    }

    pub fn info(&self, id: SessionId) -> Option<SessionInfo> {
        self.sessions.get(&id).map(|r| *r.value())
    }
}

/// Guard that tracks a session's lifetime.
/// Deregisters the session when dropped.
#[derive(Debug)]
pub struct SessionGuard {
    id: SessionId,
    sessions: Arc<DashMap<SessionId, SessionInfo>>,
}

impl SessionGuard {
    /// Get this session's ID.
    pub fn id(&self) -> SessionId {
        self.id
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let removed = self.sessions.remove(&self.id);
        metrics::set_active_sessions(self.sessions.len());
        if let Some((_, info)) = removed {
            let connected_secs = (Utc::now() - info.connected_at).num_seconds();
            tracing::debug!(session_id = %self.id, connected_secs, "Session deregistered");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_unique() {
        let id1 = SessionId::new();
        let id2 = SessionId::new();
        assert_ne!(id1, id2);
        assert!(id1.to_string().starts_with("chat-"));
    }

    #[test]
    fn registry_counts() {
        let registry = ConnectionRegistry::new();
        assert_eq!(registry.active_count(), 0);

        let guard1 = registry.register();
        assert_eq!(registry.active_count(), 1);
        assert!(registry.contains(guard1.id()));

        let guard2 = registry.register();
        assert_eq!(registry.active_count(), 2);

        let id1 = guard1.id();
        drop(guard1);
        assert_eq!(registry.active_count(), 1);
        assert!(!registry.contains(id1));
        assert!(registry.info(guard2.id()).is_some());

        drop(guard2);
        assert_eq!(registry.active_count(), 0);
    }

    #[test]
    fn clones_share_sessions() {
        let registry = ConnectionRegistry::new();
        let other = registry.clone();
        let _guard = other.register();
        assert_eq!(registry.active_count(), 1);
    }
}
