use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::chat::{NEW_CHAT_TITLE, TITLE_MAX_CHARS};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single chat entry. Messages are never edited once appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
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

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: NEW_CHAT_TITLE.to_string(),
            messages: Vec::new(),
        }
    }

    /// Append a message, deriving the title when the first message is from the user.
    pub(crate) fn push(&mut self, message: Message) {
        if self.messages.is_empty() && message.is_user() {
            self.title = title_from(&message.content);
        }
        self.messages.push(message);
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Creation time, recovered from the timestamp-based id.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let millis: i64 = self.id.parse().ok()?;
        DateTime::<Utc>::from_timestamp_millis(millis)
    }
}

fn title_from(content: &str) -> String {
    content.chars().take(TITLE_MAX_CHARS).collect()
}

/// All conversations, newest first, plus the active pointer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationSet {
    pub(crate) conversations: Vec<Conversation>,
    pub(crate) active_id: Option<String>,
}

impl ConversationSet {
    /// Build a set from restored data, repairing a missing or stale active id.
    ///
    /// Later entries that repeat an earlier id are dropped.
    pub fn from_parts(mut conversations: Vec<Conversation>, active_id: Option<String>) -> Self {
        let mut seen = HashSet::new();
        conversations.retain(|c| {
            let first = seen.insert(c.id.clone());
            if !first {
                tracing::warn!(id = %c.id, "dropping conversation with duplicate id");
            }
            first
        });

        let active_id = active_id
            .filter(|id| conversations.iter().any(|c| &c.id == id))
            .or_else(|| conversations.first().map(|c| c.id.clone()));
        Self {
            conversations,
            active_id,
        }
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn active(&self) -> Option<&Conversation> {
        self.active_id.as_deref().and_then(|id| self.get(id))
    }

    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Conversation> {
        self.conversations.iter_mut().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}
