use std::error::Error as StdError;
use std::pin::pin;

use encoding_rs::{CoderResult, Decoder, UTF_8};
use futures::{Stream, StreamExt};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Stream read failed: {0}")]
    Read(#[source] Box<dyn StdError + Send + Sync>),
    #[error("Stream cancelled")]
    Cancelled,
}

/// Appends `chunk` to `text`. Incomplete trailing sequences stay buffered in
/// `decoder` until the next call; invalid bytes decode to U+FFFD.
fn decode_into(decoder: &mut Decoder, chunk: &[u8], text: &mut String, last: bool) {
    let mut src = chunk;
    loop {
        text.reserve(
            decoder
                .max_utf8_buffer_length(src.len())
                .unwrap_or(src.len() * 3 + 4),
        );
        let (result, read, _) = decoder.decode_to_string(src, text, last);
        src = &src[read..];
        if let CoderResult::InputEmpty = result {
            break;
        }
    }
}

/// Drains `stream`, calling `on_update` with the whole decoded text after
/// every chunk, and returns the final text.
///
/// The callback runs inline, so a slow callback slows consumption. Bytes of a
/// character cut off by the end of the stream are dropped, which keeps the
/// returned text equal to the last callback argument.
pub async fn read_stream<S, B, E, F>(
    stream: S,
    cancel: &CancellationToken,
    mut on_update: F,
) -> Result<String, StreamError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<Box<dyn StdError + Send + Sync>>,
    F: FnMut(&str),
{
    let mut stream = pin!(stream);
    let mut decoder = UTF_8.new_decoder_without_bom_handling();
    let mut text = String::new();
    let mut chunks = 0usize;

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(StreamError::Cancelled),
            next = stream.next() => next,
        };

        let Some(chunk) = next else {
            break;
        };
        let chunk = chunk.map_err(|e| StreamError::Read(e.into()))?;

        decode_into(&mut decoder, chunk.as_ref(), &mut text, false);
        chunks += 1;
        on_update(&text);
    }

    // flushing reports a cut-off character as U+FFFD, which is discarded
    let mut dangling = String::new();
    decode_into(&mut decoder, &[], &mut dangling, true);
    if !dangling.is_empty() {
        tracing::warn!("Stream ended inside a multi-byte character");
    }
    tracing::debug!(chunks, len = text.len(), "Stream finished");

    Ok(text)
}
