mod http;

pub use http::HttpAnswerClient;

use thiserror::Error;

/// Why a question went unanswered. Callers decide what to show; nothing is retried.
#[derive(Error, Debug)]
pub enum AnswerError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("answer service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed answer: {0}")]
    Malformed(String),
}

/// Sends one question to the answer service and waits for the full reply.
#[async_trait::async_trait]
pub trait AnswerClient: Send + Sync {
    async fn ask(&self, question: &str) -> Result<String, AnswerError>;
}
