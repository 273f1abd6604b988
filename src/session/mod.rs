//! In-memory chat sessions.
//!
//! Each session owns an append-only message list whose first entry is the
//! system prompt. Sessions live for the process lifetime; nothing is
//! persisted.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use ulid::Ulid;

use crate::llm::Message;

/// A single chat session.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Full prompt history, system message first.
    pub messages: Vec<Message>,
}

impl Session {
    /// User and assistant turns, with the leading system message elided.
    pub fn visible_messages(&self) -> &[Message] {
        &self.messages[1..]
    }

    /// Number of completed user/assistant exchanges.
    pub fn turns(&self) -> usize {
        (self.messages.len() - 1) / 2
    }
}

/// Concurrent map of sessions, keyed by session id.
///
/// Turn mutations are committed as a whole pair so a failed upstream call
/// never leaves a dangling user message in the history.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<DashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session seeded with the system prompt.
    pub fn create(&self, system_prompt: &str) -> Session {
        let now = Utc::now();
        let session = Session {
            id: format!("sess_{}", Ulid::new().to_string().to_lowercase()),
            created_at: now,
            updated_at: now,
            messages: vec![Message::system(system_prompt)],
        };
        self.inner.insert(session.id.clone(), session.clone());
        session
    }

    /// Snapshot of a session.
    pub fn get(&self, id: &str) -> Option<Session> {
        self.inner.get(id).map(|s| s.value().clone())
    }

    /// Snapshot of a session's full message history.
    pub fn messages(&self, id: &str) -> Option<Vec<Message>> {
        self.inner.get(id).map(|s| s.value().messages.clone())
    }

    /// The prompt for the next turn: stored history plus the new user
    /// message. Does not mutate the session.
    pub fn history_with(&self, id: &str, user_content: &str) -> Option<Vec<Message>> {
        self.inner.get(id).map(|s| {
            let mut messages = s.messages.clone();
            messages.push(Message::user(user_content));
            messages
        })
    }

    /// Append a completed user/assistant pair. Called only after the
    /// upstream request succeeded.
    pub fn commit_turn(&self, id: &str, user: Message, assistant: Message) -> Option<()> {
        let mut session = self.inner.get_mut(id)?;
        session.messages.push(user);
        session.messages.push(assistant);
        session.updated_at = Utc::now();
        Some(())
    }

    /// Drop everything but the system prompt.
    pub fn reset(&self, id: &str) -> Option<()> {
        let mut session = self.inner.get_mut(id)?;
        session.messages.truncate(1);
        session.updated_at = Utc::now();
        Some(())
    }
}
