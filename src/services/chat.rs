use reqwest::{Client, Response};
use serde::Serialize;
use thiserror::Error;
use validator::Validate;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Bot API returned error: HTTP {status}")]
    Status { status: u16 },
}

/// Body of a chat request. The reply is a raw text byte stream, not JSON.
#[derive(Debug, Serialize, Validate)]
pub struct ChatPayload {
    #[validate(length(min = 1, message = "No query provided."))]
    pub query: String,
    pub session_id: String,
    pub source_lang: String,
    pub target_lang: String,
    pub user_id: String,
}

#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    url: String,
}

impl ChatClient {
    pub fn new(client: Client, url: String) -> Self {
        Self { client, url }
    }

    /// Sends the query and hands back the response with its body still unread.
    pub async fn open_stream(&self, payload: &ChatPayload) -> Result<Response, ChatError> {
        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ChatError::Status {
                status: response.status().as_u16(),
            });
        }

        Ok(response)
    }
}
