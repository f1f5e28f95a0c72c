use std::sync::Arc;

use crate::answer::{AnswerClient, HttpAnswerClient};
use crate::config::Settings;
use crate::controller::{ChatController, SubmitOutcome};
use crate::conversation::{Conversation, ConversationSet, ConversationStore};
use crate::error::Result;
use crate::storage::{
    FileKeyValueStore, KeyValueStore, KvConversationRepository, MemoryKeyValueStore,
};
use crate::theme::{ThemeName, ThemeState};

/// Read-only picture of the app handed to the presentation layer.
#[derive(Debug, Clone)]
pub struct ChatView {
    pub conversations: Arc<ConversationSet>,
    pub active_id: Option<String>,
    pub busy: bool,
    pub theme: ThemeName,
}

impl ChatView {
    pub fn active(&self) -> Option<&Conversation> {
        self.active_id
            .as_deref()
            .and_then(|id| self.conversations.get(id))
    }
}

/// Root application state: the chat controller plus the theme.
///
/// Front ends hold one `ChatApp` and go through it for every change.
pub struct ChatApp {
    controller: ChatController,
    theme: ThemeState,
}

impl ChatApp {
    pub fn new(controller: ChatController, theme: ThemeState) -> Self {
        Self { controller, theme }
    }

    /// Restore conversations and theme from `store` and wire up `client`.
    pub fn open(
        store: Arc<dyn KeyValueStore>,
        client: Arc<dyn AnswerClient>,
        theme_preference: Option<ThemeName>,
    ) -> Self {
        let repository = KvConversationRepository::new(Arc::clone(&store));
        let conversations = ConversationStore::restore(Box::new(repository));
        let theme = ThemeState::load(store, theme_preference);
        Self::new(ChatController::new(conversations, client), theme)
    }

    /// Storage and the HTTP answer client, as configured.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = if settings.storage.ephemeral {
            tracing::debug!("using in-memory storage");
            Arc::new(MemoryKeyValueStore::new())
        } else {
            let store = match settings.storage.data_dir {
                Some(ref dir) => FileKeyValueStore::with_dir(dir)?,
                None => FileKeyValueStore::new()?,
            };
            tracing::debug!(data_dir = %store.base_dir().display(), "using file storage");
            Arc::new(store)
        };
        let client = HttpAnswerClient::new(&settings.api.base_url);
        tracing::debug!(api = client.base_url(), "opening chat app");

        let preference = settings.ui.theme.or_else(|| {
            std::env::var("COLORFGBG")
                .ok()
                .and_then(|hint| ThemeName::from_terminal_hint(&hint))
        });

        Ok(Self::open(store, Arc::new(client), preference))
    }

    pub fn view(&self) -> ChatView {
        let conversations = self.controller.snapshot();
        ChatView {
            active_id: conversations.active_id().map(str::to_owned),
            conversations,
            busy: self.controller.is_busy(),
            theme: self.theme.get(),
        }
    }

    pub fn controller(&self) -> &ChatController {
        &self.controller
    }

    pub fn is_busy(&self) -> bool {
        self.controller.is_busy()
    }

    pub fn create_conversation(&self) -> Conversation {
        self.controller.create_conversation()
    }

    pub fn select_conversation(&self, id: &str) -> bool {
        self.controller.select_conversation(id)
    }

    pub fn delete_conversation(&self, id: &str) -> bool {
        self.controller.delete_conversation(id)
    }

    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        self.controller.submit(text).await
    }

    pub fn theme(&self) -> ThemeName {
        self.theme.get()
    }

    pub fn set_theme(&self, theme: ThemeName) -> Result<()> {
        self.theme.set(theme)
    }

    pub fn themes(&self) -> &'static [ThemeName] {
        &ThemeName::ALL
    }
}
