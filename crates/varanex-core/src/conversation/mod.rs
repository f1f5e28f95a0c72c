mod model;
mod store;

pub use model::{Conversation, ConversationSet, Message, Role};
pub use store::ConversationStore;
