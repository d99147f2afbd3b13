use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::types::{Message, Role};

/// Storage contract for conversations. The shipped backend is in-memory;
/// a durable backend only has to honor the same operations. Evicting a
/// conversation drops its messages with it.
pub trait ConversationStore: Send + Sync {
    /// Resolve a session id. A known id is returned untouched; anything
    /// else creates a fresh conversation seeded with exactly one assistant
    /// welcome turn and returns its generated token.
    fn start(&mut self, session_id: Option<&str>, welcome: &str) -> String;

    /// Append a turn stamped with the current time. An unknown session id
    /// is a calling-convention bug (`start` comes first) and fails loudly
    /// instead of creating a phantom conversation.
    fn append(&mut self, session_id: &str, role: Role, content: &str) -> Result<(), StoreError>;

    /// Whether the session currently exists.
    fn contains(&self, session_id: &str) -> bool;

    /// All turns in insertion order. Empty for unknown session ids.
    fn history(&self, session_id: &str) -> Vec<Message>;

    /// Topics discussed so far in this conversation.
    fn topics(&self, session_id: &str) -> Vec<String>;

    /// Union new topics into the conversation's topic set. No-op for
    /// unknown session ids.
    fn add_topics(&mut self, session_id: &str, topics: &[String]);

    /// Drop every conversation whose last update is older than
    /// `now - timeout`. Returns the number removed.
    fn evict_stale(&mut self, now: DateTime<Utc>, timeout: Duration) -> usize;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unknown session id: {0}")]
    NotFound(String),
}

/// One visitor conversation. Messages are append-only and never reordered;
/// timestamps are non-decreasing under the monotonic-clock assumption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub messages: Vec<Message>,
    pub topics: Vec<String>,
}

/// In-memory conversation store keyed by session token.
#[derive(Default)]
pub struct MemoryStore {
    conversations: HashMap<String, Conversation>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            conversations: HashMap::new(),
        }
    }

    pub fn count(&self) -> usize {
        self.conversations.len()
    }

    pub fn get(&self, session_id: &str) -> Option<&Conversation> {
        self.conversations.get(session_id)
    }
}

impl ConversationStore for MemoryStore {
    fn start(&mut self, session_id: Option<&str>, welcome: &str) -> String {
        if let Some(id) = session_id {
            if self.conversations.contains_key(id) {
                return id.to_string();
            }
        }

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        self.conversations.insert(
            id.clone(),
            Conversation {
                session_id: id.clone(),
                created_at: now,
                last_updated: now,
                messages: vec![Message::new(Role::Assistant, welcome)],
                topics: Vec::new(),
            },
        );
        id
    }

    fn append(&mut self, session_id: &str, role: Role, content: &str) -> Result<(), StoreError> {
        let conversation = self
            .conversations
            .get_mut(session_id)
            .ok_or_else(|| StoreError::NotFound(session_id.to_string()))?;

        let message = Message::new(role, content);
        conversation.last_updated = message.timestamp;
        conversation.messages.push(message);
        Ok(())
    }

    fn contains(&self, session_id: &str) -> bool {
        self.conversations.contains_key(session_id)
    }

    fn history(&self, session_id: &str) -> Vec<Message> {
        self.conversations
            .get(session_id)
            .map(|c| c.messages.clone())
            .unwrap_or_default()
    }

    fn topics(&self, session_id: &str) -> Vec<String> {
        self.conversations
            .get(session_id)
            .map(|c| c.topics.clone())
            .unwrap_or_default()
    }

    fn add_topics(&mut self, session_id: &str, topics: &[String]) {
        if let Some(conversation) = self.conversations.get_mut(session_id) {
            for topic in topics {
                if !conversation.topics.contains(topic) {
                    conversation.topics.push(topic.clone());
                }
            }
        }
    }

    fn evict_stale(&mut self, now: DateTime<Utc>, timeout: Duration) -> usize {
        let cutoff = now - timeout;
        let before = self.conversations.len();
        self.conversations.retain(|_, c| c.last_updated >= cutoff);
        before - self.conversations.len()
    }
}
