//! Run with: cargo run --bin stream_probe -- "your question"

use std::time::Instant;

use chrono::Utc;
use oan_seeker::config::EndpointConfig;
use oan_seeker::modules::chat::normalize::normalize_response;
use oan_seeker::modules::chat::stream::read_stream;
use oan_seeker::services::chat::{ChatClient, ChatPayload};
use reqwest::Client;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = EndpointConfig::from_env()?;
    let question = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "When should I sow wheat in Maharashtra?".to_string());

    println!("\nProbing chat stream at {}\n", config.chat_url);
    println!("Question: \"{}\"\n", question);

    let chat = ChatClient::new(Client::new(), config.chat_url.clone());
    let payload = ChatPayload {
        query: question,
        session_id: format!("session_{}", Utc::now().timestamp_millis()),
        source_lang: "en".to_string(),
        target_lang: "en".to_string(),
        user_id: config.user_id.clone(),
    };

    let start = Instant::now();
    let response = chat.open_stream(&payload).await?;
    let headers_ms = start.elapsed().as_millis();

    let mut first_chunk_ms = None;
    let mut chunks = 0;
    let raw = read_stream(response.bytes_stream(), &CancellationToken::new(), |_| {
        chunks += 1;
        first_chunk_ms.get_or_insert(start.elapsed().as_millis());
    })
    .await?;
    let total_ms = start.elapsed().as_millis();

    println!("Headers after:     {}ms", headers_ms);
    match first_chunk_ms {
        Some(ms) => println!("First chunk after: {}ms", ms),
        None => println!("First chunk after: (empty body)"),
    }
    println!("Complete after:    {}ms ({} chunks, {} bytes)\n", total_ms, chunks, raw.len());
    println!("Response:\n{}\n", normalize_response(&raw));
    println!("{:-<60}", "");

    if first_chunk_ms.is_some_and(|ms| ms < 1500) {
        println!("Streaming starts fast enough for interactive use.");
    } else {
        println!("First text arrives slowly; users will stare at the typing indicator.");
    }

    Ok(())
}
