use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::conversation::{Conversation, ConversationSet, Message};
use crate::error::Result;
use crate::storage::ConversationRepository;

/// Owns the conversation set and the active pointer.
///
/// Every mutation swaps in a new snapshot: an `Arc<ConversationSet>` handed
/// out by [`ConversationStore::snapshot`] never changes underneath its holder.
/// Callers persist after each mutation with [`ConversationStore::persist`].
pub struct ConversationStore {
    set: Arc<ConversationSet>,
    repository: Box<dyn ConversationRepository>,
}

impl ConversationStore {
    /// Start from an empty set without reading the repository.
    pub fn new(repository: Box<dyn ConversationRepository>) -> Self {
        Self {
            set: Arc::new(ConversationSet::default()),
            repository,
        }
    }

    /// Load the saved set. Absent or corrupt data yields an empty set.
    pub fn restore(repository: Box<dyn ConversationRepository>) -> Self {
        let set = repository.load();
        Self {
            set: Arc::new(set),
            repository,
        }
    }

    pub fn persist(&self) -> Result<()> {
        self.repository.save(&self.set)
    }

    pub fn snapshot(&self) -> Arc<ConversationSet> {
        Arc::clone(&self.set)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.set.active_id()
    }

    pub fn active_conversation(&self) -> Option<&Conversation> {
        self.set.active()
    }

    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.set.get(id)
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Insert a fresh conversation at the front and make it active.
    pub fn create_conversation(&mut self) -> Conversation {
        let id = self.next_id();
        let conversation = Conversation::new(id);

        let set = Arc::make_mut(&mut self.set);
        set.conversations.insert(0, conversation.clone());
        set.active_id = Some(conversation.id.clone());

        tracing::debug!(id = %conversation.id, "created conversation");
        conversation
    }

    /// Returns `false` and leaves the selection alone if `id` is unknown.
    pub fn select_conversation(&mut self, id: &str) -> bool {
        if !self.set.contains(id) {
            tracing::debug!(id, "ignoring selection of unknown conversation");
            return false;
        }
        if self.set.active_id() != Some(id) {
            Arc::make_mut(&mut self.set).active_id = Some(id.to_string());
        }
        true
    }

    /// Remove a conversation. Deleting the active one selects the new first entry.
    pub fn delete_conversation(&mut self, id: &str) -> bool {
        if !self.set.contains(id) {
            return false;
        }

        let set = Arc::make_mut(&mut self.set);
        set.conversations.retain(|c| c.id != id);
        if set.active_id.as_deref() == Some(id) {
            set.active_id = set.conversations.first().map(|c| c.id.clone());
        }

        tracing::debug!(id, remaining = set.conversations.len(), "deleted conversation");
        true
    }

    /// Append to the given conversation; unknown ids are ignored.
    pub fn append_message(&mut self, conversation_id: &str, message: Message) -> bool {
        if !self.set.contains(conversation_id) {
            tracing::debug!(conversation_id, "dropping message for unknown conversation");
            return false;
        }

        let set = Arc::make_mut(&mut self.set);
        if let Some(conversation) = set.get_mut(conversation_id) {
            conversation.push(message);
        }
        true
    }

    /// Millisecond timestamp, bumped past any existing numeric id.
    fn next_id(&self) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        let newest = self
            .set
            .conversations
            .iter()
            .filter_map(|c| c.id.parse::<u64>().ok())
            .max();

        let mut candidate = match newest {
            Some(max) if max >= now => max.checked_add(1).unwrap_or_else(|| {
                tracing::warn!(max, "stored conversation id out of range, using clock");
                now
            }),
            _ => now,
        };
        while self.set.contains(&candidate.to_string()) {
            candidate = candidate.wrapping_add(1);
        }
        candidate.to_string()
    }
}
