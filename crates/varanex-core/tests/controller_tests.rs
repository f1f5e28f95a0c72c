use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;
use varanex_core::constants::chat::ERROR_REPLY;
use varanex_core::*;

/// Mock answer service with canned replies, recording every question.
struct MockAnswers {
    reply: Result<String, String>,
    questions: Mutex<Vec<String>>,
    gate: Option<Arc<Notify>>,
}

impl MockAnswers {
    fn ok(answer: &str) -> Self {
        Self {
            reply: Ok(answer.to_string()),
            questions: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    fn failing() -> Self {
        Self {
            reply: Err("connection refused".to_string()),
            questions: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Holds every request until `gate` is notified.
    fn gated(answer: &str, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::ok(answer)
        }
    }

    fn calls(&self) -> usize {
        self.questions.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl AnswerClient for MockAnswers {
    async fn ask(&self, question: &str) -> Result<String, AnswerError> {
        self.questions.lock().unwrap().push(question.to_string());
        if let Some(ref gate) = self.gate {
            gate.notified().await;
        }
        self.reply.clone().map_err(AnswerError::Malformed)
    }
}

/// Counts how many times the store was written.
#[derive(Default)]
struct CountingStore {
    inner: MemoryKeyValueStore,
    writes: AtomicUsize,
}

impl KeyValueStore for CountingStore {
    fn get(&self, key: &str) -> varanex_core::error::Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> varanex_core::error::Result<()> {
        if key == varanex_core::constants::keys::CHATS {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> varanex_core::error::Result<()> {
        self.inner.remove(key)
    }
}

fn controller(client: Arc<MockAnswers>) -> ChatController {
    let store = ConversationStore::new(Box::new(KvConversationRepository::new(
        MemoryKeyValueStore::new(),
    )));
    ChatController::new(store, client)
}

fn active_messages(controller: &ChatController) -> Vec<Message> {
    controller
        .snapshot()
        .active()
        .map(|c| c.messages.clone())
        .unwrap_or_default()
}

// ========================================================================
// Successful and failed sends
// ========================================================================

#[tokio::test]
async fn test_submit_records_question_and_answer() {
    let client = Arc::new(MockAnswers::ok("42"));
    let controller = controller(client.clone());
    controller.create_conversation();

    let outcome = controller.submit("meaning of life").await;

    assert_eq!(outcome, SubmitOutcome::Answered);
    assert_eq!(
        active_messages(&controller),
        vec![Message::user("meaning of life"), Message::assistant("42")]
    );
    assert!(!controller.is_busy());
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_failed_send_records_error_reply() {
    let client = Arc::new(MockAnswers::failing());
    let controller = controller(client);
    controller.create_conversation();

    let outcome = controller.submit("anything").await;

    assert_eq!(outcome, SubmitOutcome::Failed);
    let messages = active_messages(&controller);
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0], Message::user("anything"));
    assert_eq!(messages[1], Message::assistant(ERROR_REPLY));
    assert!(!controller.is_busy());
}

#[tokio::test]
async fn test_input_is_trimmed_before_sending() {
    let client = Arc::new(MockAnswers::ok("ok"));
    let controller = controller(client.clone());
    controller.create_conversation();

    controller.submit("  padded question \n").await;

    assert_eq!(client.questions.lock().unwrap()[0], "padded question");
    assert_eq!(active_messages(&controller)[0], Message::user("padded question"));
    assert_eq!(controller.snapshot().active().unwrap().title, "padded question");
}

// ========================================================================
// No-op submits
// ========================================================================

#[tokio::test]
async fn test_blank_input_is_ignored() {
    let client = Arc::new(MockAnswers::ok("never"));
    let controller = controller(client.clone());
    controller.create_conversation();

    for input in ["", "   ", "\n\t"] {
        assert_eq!(
            controller.submit(input).await,
            SubmitOutcome::Ignored(IgnoreReason::EmptyInput)
        );
    }
    assert!(active_messages(&controller).is_empty());
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_submit_without_active_conversation_is_ignored() {
    let client = Arc::new(MockAnswers::ok("never"));
    let controller = controller(client.clone());

    assert_eq!(
        controller.submit("hello").await,
        SubmitOutcome::Ignored(IgnoreReason::NoActiveConversation)
    );
    assert!(controller.snapshot().is_empty());
    assert_eq!(client.calls(), 0);
    assert!(!controller.is_busy());
}

#[tokio::test]
async fn test_second_submit_while_busy_is_ignored() {
    let gate = Arc::new(Notify::new());
    let client = Arc::new(MockAnswers::gated("first answer", gate.clone()));
    let controller = controller(client.clone());
    controller.create_conversation();

    let first = controller.submit("first");
    let second = async {
        assert!(controller.is_busy());
        let outcome = controller.submit("second").await;
        gate.notify_one();
        outcome
    };

    let (first, second) = tokio::join!(first, second);

    assert_eq!(first, SubmitOutcome::Answered);
    assert_eq!(second, SubmitOutcome::Ignored(IgnoreReason::Busy));
    assert_eq!(client.calls(), 1);
    assert_eq!(
        active_messages(&controller),
        vec![Message::user("first"), Message::assistant("first answer")]
    );
    assert!(!controller.is_busy());
}

// ========================================================================
// Draft buffer, reply routing, persistence
// ========================================================================

#[tokio::test]
async fn test_submit_draft_clears_draft() {
    let client = Arc::new(MockAnswers::ok("done"));
    let controller = controller(client);
    controller.create_conversation();

    controller.set_draft("from the input box");
    assert_eq!(controller.submit_draft().await, SubmitOutcome::Answered);
    assert_eq!(controller.draft(), "");
}

#[tokio::test]
async fn test_ignored_submit_keeps_draft() {
    let client = Arc::new(MockAnswers::ok("done"));
    let controller = controller(client);

    controller.set_draft("no conversation yet");
    controller.submit_draft().await;
    assert_eq!(controller.draft(), "no conversation yet");
}

#[tokio::test]
async fn test_reply_goes_to_conversation_that_asked() {
    let gate = Arc::new(Notify::new());
    let client = Arc::new(MockAnswers::gated("late answer", gate.clone()));
    let controller = controller(client);
    let asking = controller.create_conversation();

    let send = controller.submit("question");
    let switch = async {
        let other = controller.create_conversation();
        gate.notify_one();
        other
    };
    let (_, other) = tokio::join!(send, switch);

    let snap = controller.snapshot();
    assert_eq!(snap.active_id(), Some(other.id.as_str()));
    assert!(snap.get(&other.id).unwrap().messages.is_empty());
    assert_eq!(
        snap.get(&asking.id).unwrap().messages,
        vec![Message::user("question"), Message::assistant("late answer")]
    );
}

#[tokio::test]
async fn test_every_mutation_is_persisted() {
    let kv = Arc::new(CountingStore::default());
    let store = ConversationStore::restore(Box::new(KvConversationRepository::new(kv.clone())));
    let controller = ChatController::new(store, Arc::new(MockAnswers::ok("42")));

    let conv = controller.create_conversation();
    assert_eq!(kv.writes.load(Ordering::SeqCst), 1);

    controller.submit("meaning of life").await;
    // One write for the question, one for the answer.
    assert_eq!(kv.writes.load(Ordering::SeqCst), 3);

    controller.delete_conversation(&conv.id);
    assert_eq!(kv.writes.load(Ordering::SeqCst), 4);

    // Unknown ids change nothing and write nothing.
    controller.select_conversation("missing");
    controller.delete_conversation("missing");
    assert_eq!(kv.writes.load(Ordering::SeqCst), 4);

    let reloaded = KvConversationRepository::new(kv).load();
    assert!(reloaded.is_empty());
}
