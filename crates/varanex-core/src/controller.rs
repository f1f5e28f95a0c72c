use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::answer::AnswerClient;
use crate::constants::chat::ERROR_REPLY;
use crate::conversation::{Conversation, ConversationSet, ConversationStore, Message};

/// Result of a single `submit` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The service answered and the reply was recorded.
    Answered,
    /// The service failed and the error reply was recorded.
    Failed,
    /// Nothing was sent and nothing was recorded.
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    EmptyInput,
    NoActiveConversation,
    Busy,
}

/// Drives one send at a time: `Idle -> Sending -> (Answered | Failed) -> Idle`.
///
/// The store mutex is never held across an `.await`, and the busy flag is
/// claimed with compare-and-swap so overlapping submits cannot both send.
pub struct ChatController {
    store: Mutex<ConversationStore>,
    client: Arc<dyn AnswerClient>,
    busy: AtomicBool,
    draft: Mutex<String>,
}

/// Releases the busy flag when the send finishes, however it finishes.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ChatController {
    pub fn new(store: ConversationStore, client: Arc<dyn AnswerClient>) -> Self {
        Self {
            store: Mutex::new(store),
            client,
            busy: AtomicBool::new(false),
            draft: Mutex::new(String::new()),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> Arc<ConversationSet> {
        self.lock_store().snapshot()
    }

    pub fn active_id(&self) -> Option<String> {
        self.lock_store().active_id().map(str::to_owned)
    }

    pub fn create_conversation(&self) -> Conversation {
        let mut store = self.lock_store();
        let conversation = store.create_conversation();
        persist(&store);
        conversation
    }

    pub fn select_conversation(&self, id: &str) -> bool {
        let mut store = self.lock_store();
        let selected = store.select_conversation(id);
        if selected {
            persist(&store);
        }
        selected
    }

    pub fn delete_conversation(&self, id: &str) -> bool {
        let mut store = self.lock_store();
        let deleted = store.delete_conversation(id);
        if deleted {
            persist(&store);
        }
        deleted
    }

    pub fn draft(&self) -> String {
        self.lock_draft().clone()
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        *self.lock_draft() = text.into();
    }

    /// Submit whatever is in the draft buffer.
    pub async fn submit_draft(&self) -> SubmitOutcome {
        let text = self.draft();
        self.submit(&text).await
    }

    /// Record the user's message, ask the service, and record the reply.
    ///
    /// The reply goes to the conversation that was active at submit time,
    /// even if another one is selected while the request is outstanding.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let question = text.trim();
        if question.is_empty() {
            return SubmitOutcome::Ignored(IgnoreReason::EmptyInput);
        }

        let Some(_busy) = BusyGuard::acquire(&self.busy) else {
            tracing::debug!("submit ignored: a request is already outstanding");
            return SubmitOutcome::Ignored(IgnoreReason::Busy);
        };

        let conversation_id = {
            let mut store = self.lock_store();
            let Some(id) = store.active_id().map(str::to_owned) else {
                return SubmitOutcome::Ignored(IgnoreReason::NoActiveConversation);
            };
            store.append_message(&id, Message::user(question));
            persist(&store);
            id
        };
        self.lock_draft().clear();

        tracing::info!(conversation = %conversation_id, "sending question");

        let (reply, outcome) = match self.client.ask(question).await {
            Ok(answer) => (answer, SubmitOutcome::Answered),
            Err(e) => {
                tracing::warn!(conversation = %conversation_id, "answer request failed: {e}");
                (ERROR_REPLY.to_string(), SubmitOutcome::Failed)
            }
        };

        let mut store = self.lock_store();
        if !store.append_message(&conversation_id, Message::assistant(reply)) {
            tracing::warn!(
                conversation = %conversation_id,
                "conversation was deleted while waiting; reply dropped"
            );
        }
        persist(&store);

        outcome
    }

    fn lock_store(&self) -> MutexGuard<'_, ConversationStore> {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_draft(&self) -> MutexGuard<'_, String> {
        self.draft.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn persist(store: &ConversationStore) {
    if let Err(e) = store.persist() {
        tracing::warn!("Failed to persist conversations: {e}");
    }
}
