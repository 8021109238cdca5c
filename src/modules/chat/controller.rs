use chrono::Utc;
use reqwest::Client;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use validator::{Validate, ValidationErrors};

use crate::config::EndpointConfig;
use crate::modules::chat::model::{ChatView, Message};
use crate::modules::chat::normalize::normalize_response;
use crate::modules::chat::stream::{read_stream, StreamError};
use crate::services::chat::{ChatClient, ChatError, ChatPayload};
use crate::services::transcribe::{TranscribeClient, TranscribeError};

/// The only failure text users see; the cause goes to the log.
pub const GENERIC_ERROR: &str = "An error occurred. Please try again later.";
pub const EMPTY_RESPONSE: &str = "Sorry, I received an empty response.";
pub const TYPING_DOTS: &str = "...";

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Failed to transcribe audio: {0}")]
    Transcription(#[from] TranscribeError),
    #[error("Audio supplied but no transcription endpoint is configured")]
    TranscriptionUnavailable,
    #[error("Invalid query: {0}")]
    Invalid(#[from] ValidationErrors),
    #[error(transparent)]
    Chat(#[from] ChatError),
    #[error(transparent)]
    Stream(#[from] StreamError),
}

#[derive(Debug, Clone, Default)]
pub struct BotQuery {
    pub text: String,
    pub language: String,
    /// Base64 audio; when present it is transcribed and replaces `text`.
    pub audio: Option<String>,
}

impl BotQuery {
    pub fn text(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: language.into(),
            audio: None,
        }
    }

    pub fn voice(audio: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            language: language.into(),
            audio: Some(audio.into()),
        }
    }
}

fn session_id() -> String {
    format!("session_{}", Utc::now().timestamp_millis())
}

#[derive(Clone)]
pub struct QueryOrchestrator {
    chat: ChatClient,
    transcriber: Option<TranscribeClient>,
    user_id: String,
}

impl QueryOrchestrator {
    pub fn new(config: &EndpointConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &EndpointConfig) -> Self {
        Self {
            chat: ChatClient::new(client.clone(), config.chat_url.clone()),
            transcriber: config
                .transcribe_url
                .clone()
                .map(|url| TranscribeClient::new(client, url)),
            user_id: config.user_id.clone(),
        }
    }

    pub async fn send_query<V: ChatView>(
        &self,
        query: &BotQuery,
        view: &mut V,
    ) -> Result<String, QueryError> {
        self.send_query_with_cancel(query, view, &CancellationToken::new())
            .await
    }

    /// Runs one query end to end, keeping `view` updated as text arrives.
    ///
    /// On failure the placeholder becomes [`GENERIC_ERROR`] and the error is
    /// returned as well. Loading is cleared either way, including when the
    /// returned future is dropped before it completes.
    pub async fn send_query_with_cancel<V: ChatView>(
        &self,
        query: &BotQuery,
        view: &mut V,
        cancel: &CancellationToken,
    ) -> Result<String, QueryError> {
        view.set_loading(true);
        show_placeholder(view);

        let mut pending = PendingQuery {
            view,
            settled: false,
        };
        let result = self.run(query, &mut *pending.view, cancel).await;

        match &result {
            Ok(text) => pending.settle(Message::bot(text.clone())),
            Err(err) => {
                tracing::error!(error = %err, details = ?err, "Bot query failed");
                pending.settle(Message::bot(GENERIC_ERROR));
            }
        }

        result
    }

    async fn run<V: ChatView>(
        &self,
        query: &BotQuery,
        view: &mut V,
        cancel: &CancellationToken,
    ) -> Result<String, QueryError> {
        let session_id = session_id();

        let text = match &query.audio {
            Some(audio) => {
                let transcriber = self
                    .transcriber
                    .as_ref()
                    .ok_or(QueryError::TranscriptionUnavailable)?;
                let text = transcriber.transcribe(audio, &session_id).await?;
                tracing::info!(session_id = %session_id, chars = text.len(), "Transcribed voice query");
                text
            }
            None => query.text.clone(),
        };

        let payload = ChatPayload {
            query: text,
            session_id,
            source_lang: query.language.clone(),
            target_lang: query.language.clone(),
            user_id: self.user_id.clone(),
        };
        payload.validate()?;

        let response = self.chat.open_stream(&payload).await?;

        let raw = read_stream(response.bytes_stream(), cancel, |current| {
            view.messages_mut()
                .replace_last(Message::is_streaming, Message::streaming(normalize_response(current)));
            view.refresh();
        })
        .await?;

        let raw = if raw.is_empty() { EMPTY_RESPONSE } else { raw.as_str() };
        Ok(normalize_response(raw))
    }
}

/// Owns the view while a query is in flight and finalises it on drop if the
/// query never settled.
struct PendingQuery<'a, V: ChatView> {
    view: &'a mut V,
    settled: bool,
}

impl<V: ChatView> PendingQuery<'_, V> {
    fn settle(&mut self, message: Message) {
        finish(self.view, message);
        self.view.set_loading(false);
        self.settled = true;
    }
}

impl<V: ChatView> Drop for PendingQuery<'_, V> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!("Bot query dropped before completion");
            self.settle(Message::bot(GENERIC_ERROR));
        }
    }
}

fn show_placeholder<V: ChatView>(view: &mut V) {
    let messages = view.messages_mut();
    if messages.last().is_some_and(Message::is_typing_placeholder) {
        return;
    }
    messages.push(Message::typing(TYPING_DOTS));
    view.refresh();
}

fn finish<V: ChatView>(view: &mut V, message: Message) {
    let messages = view.messages_mut();
    if !messages.replace_last(Message::is_streaming, message.clone()) {
        messages.push(message);
    }
    view.refresh();
}
