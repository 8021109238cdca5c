use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::BecknIdentity;

#[derive(Error, Debug)]
pub enum BecknError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("API error: HTTP {status}: {body}")]
    ApiError { status: u16, body: String },
}

#[derive(Debug, Serialize)]
pub struct SearchRequest {
    pub context: Context,
    pub message: RequestMessage,
}

#[derive(Debug, Serialize)]
pub struct Context {
    pub domain: String,
    pub action: String,
    pub version: String,
    pub bap_id: String,
    pub bap_uri: String,
    pub message_id: String,
    pub transaction_id: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct RequestMessage {
    pub intent: Value,
}

impl SearchRequest {
    pub fn search(domain: &str, identity: &BecknIdentity, intent: Value) -> Self {
        let now = Utc::now();
        let millis = now.timestamp_millis();

        Self {
            context: Context {
                domain: domain.to_string(),
                action: "search".to_string(),
                version: "1.0.0".to_string(),
                bap_id: identity.bap_id.clone(),
                bap_uri: identity.bap_uri.clone(),
                message_id: format!("msg_{}", millis),
                transaction_id: format!("txn_{}", millis),
                timestamp: now.to_rfc3339(),
            },
            message: RequestMessage { intent },
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct SearchResponse {
    #[serde(default)]
    pub responses: Vec<OnSearch>,
}

#[derive(Debug, Deserialize, Default)]
pub struct OnSearch {
    #[serde(default)]
    pub message: Option<OnSearchMessage>,
}

#[derive(Debug, Deserialize, Default)]
pub struct OnSearchMessage {
    #[serde(default)]
    pub catalog: Option<Catalog>,
}

#[derive(Debug, Deserialize, Default)]
pub struct Catalog {
    #[serde(default)]
    pub providers: Vec<Provider>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Provider {
    #[serde(default)]
    pub descriptor: Option<Descriptor>,
    #[serde(default)]
    pub items: Vec<Item>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Item {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub descriptor: Option<Descriptor>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Item {
    pub fn name(&self) -> &str {
        self.descriptor
            .as_ref()
            .and_then(|d| d.name.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Descriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_desc: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Value>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Tag {
    #[serde(default)]
    pub descriptor: Option<Descriptor>,
    #[serde(default)]
    pub list: Vec<TagEntry>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct TagEntry {
    #[serde(default)]
    pub descriptor: Option<Descriptor>,
    #[serde(default)]
    pub value: Option<String>,
}

impl SearchResponse {
    /// The first provider of the first response, where every backend puts its catalog.
    pub fn into_first_provider(self) -> Option<Provider> {
        self.responses
            .into_iter()
            .next()?
            .message?
            .catalog?
            .providers
            .into_iter()
            .next()
    }
}

pub async fn search(
    client: &Client,
    url: &str,
    request: &SearchRequest,
) -> Result<SearchResponse, BecknError> {
    tracing::debug!(
        domain = %request.context.domain,
        message_id = %request.context.message_id,
        "Sending Beckn search"
    );

    let response = client
        .post(url)
        .header("Content-Type", "application/json")
        .json(request)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(BecknError::ApiError { status, body });
    }

    Ok(response.json().await?)
}
