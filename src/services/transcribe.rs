use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranscribeError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("API error: HTTP {status}: {body}")]
    ApiError { status: u16, body: String },
    #[error("Transcription rejected: {0}")]
    Rejected(String),
    #[error("Could not transcribe audio (no text returned).")]
    EmptyTranscript,
}

#[derive(Debug, Serialize)]
struct TranscribeRequest<'a> {
    audio_content: &'a str,
    session_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranscribeResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Clone)]
pub struct TranscribeClient {
    client: Client,
    url: String,
}

impl TranscribeClient {
    pub fn new(client: Client, url: String) -> Self {
        Self { client, url }
    }

    /// Turns a base64 audio payload into text. Never returns an empty transcript.
    pub async fn transcribe(
        &self,
        audio_content: &str,
        session_id: &str,
    ) -> Result<String, TranscribeError> {
        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(&TranscribeRequest {
                audio_content,
                session_id,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(TranscribeError::ApiError { status, body });
        }

        let data: TranscribeResponse = response.json().await?;
        Self::interpret(data)
    }

    fn interpret(data: TranscribeResponse) -> Result<String, TranscribeError> {
        if data.status.as_deref() == Some("error") {
            return Err(TranscribeError::Rejected(
                data.message
                    .unwrap_or_else(|| "Transcription failed".to_string()),
            ));
        }

        match data.text {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(TranscribeError::EmptyTranscript),
        }
    }
}
