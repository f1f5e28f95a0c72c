mod kv;
mod repository;

pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use repository::{ConversationRepository, KvConversationRepository};
