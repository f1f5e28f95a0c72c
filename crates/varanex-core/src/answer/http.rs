use serde::{Deserialize, Serialize};

use crate::answer::{AnswerClient, AnswerError};
use crate::constants::endpoints;

/// Talks to `POST {base_url}/ask`.
pub struct HttpAnswerClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAnswerClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn ask_url(&self) -> String {
        format!("{}{}", self.base_url, endpoints::ASK_PATH)
    }
}

impl Default for HttpAnswerClient {
    fn default() -> Self {
        Self::new(endpoints::DEFAULT_API_URL)
    }
}

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    question: &'a str,
}

#[derive(Debug, Deserialize)]
struct AskResponse {
    answer: String,
}

#[async_trait::async_trait]
impl AnswerClient for HttpAnswerClient {
    async fn ask(&self, question: &str) -> Result<String, AnswerError> {
        let url = self.ask_url();
        tracing::debug!(%url, chars = question.chars().count(), "asking answer service");

        let response = self
            .client
            .post(&url)
            .json(&AskRequest { question })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AnswerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: AskResponse = serde_json::from_str(&body)
            .map_err(|e| AnswerError::Malformed(format!("{e}: {body}")))?;

        Ok(parsed.answer)
    }
}
