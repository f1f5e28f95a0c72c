pub mod answer;
pub mod app;
pub mod config;
pub mod constants;
pub mod controller;
pub mod conversation;
pub mod error;
pub mod storage;
pub mod theme;

// Re-export key types
pub use answer::{AnswerClient, AnswerError, HttpAnswerClient};
pub use app::{ChatApp, ChatView};
pub use config::Settings;
pub use controller::{ChatController, IgnoreReason, SubmitOutcome};
pub use conversation::{Conversation, ConversationSet, ConversationStore, Message, Role};
pub use error::VaranexError;
pub use storage::{
    ConversationRepository, FileKeyValueStore, KeyValueStore, KvConversationRepository,
    MemoryKeyValueStore,
};
pub use theme::{ThemeName, ThemeState};
