use crate::constants::keys;
use crate::conversation::{Conversation, ConversationSet};
use crate::error::Result;
use crate::storage::KeyValueStore;

/// Loads and saves the whole conversation set.
pub trait ConversationRepository: Send + Sync {
    /// Never fails: unreadable or corrupt data is treated as a first run.
    fn load(&self) -> ConversationSet;
    fn save(&self, set: &ConversationSet) -> Result<()>;
}

/// Keeps the conversation list under `chats` and the active id under `activeChatId`.
pub struct KvConversationRepository<S> {
    store: S,
}

impl<S: KeyValueStore> KvConversationRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn load_conversations(&self) -> Vec<Conversation> {
        let raw = match self.store.get(keys::CHATS) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Could not read saved conversations, starting empty: {e}");
                return Vec::new();
            }
        };

        if raw.trim().is_empty() {
            return Vec::new();
        }

        // The web client wrote `null` when nothing was saved.
        match serde_json::from_str::<Option<Vec<Conversation>>>(&raw) {
            Ok(conversations) => conversations.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Saved conversations are corrupt, starting empty: {e}");
                Vec::new()
            }
        }
    }

    fn load_active_id(&self) -> Option<String> {
        let raw = self.store.get(keys::ACTIVE_CHAT_ID).ok().flatten()?;
        serde_json::from_str::<Option<String>>(&raw).ok().flatten()
    }
}

impl<S: KeyValueStore> ConversationRepository for KvConversationRepository<S> {
    fn load(&self) -> ConversationSet {
        let conversations = self.load_conversations();
        let active_id = self.load_active_id();
        let set = ConversationSet::from_parts(conversations, active_id);
        tracing::debug!(count = set.len(), active = ?set.active_id(), "restored conversations");
        set
    }

    fn save(&self, set: &ConversationSet) -> Result<()> {
        let chats = serde_json::to_string(set.conversations())?;
        self.store.set(keys::CHATS, &chats)?;

        match set.active_id() {
            Some(id) => self
                .store
                .set(keys::ACTIVE_CHAT_ID, &serde_json::to_string(id)?)?,
            None => self.store.remove(keys::ACTIVE_CHAT_ID)?,
        }

        Ok(())
    }
}
