use reqwest::Client;
use serde_json::json;

use crate::config::BecknIdentity;
use crate::modules::schemes::model::Scheme;
use crate::services::beckn::{self, BecknError, SearchRequest};

#[derive(Clone)]
pub struct SchemeClient {
    client: Client,
    url: String,
    identity: BecknIdentity,
}

impl SchemeClient {
    pub fn new(client: Client, url: String, identity: BecknIdentity) -> Self {
        Self {
            client,
            url,
            identity,
        }
    }

    pub async fn fetch(&self) -> Result<Vec<Scheme>, BecknError> {
        let request = SearchRequest::search("schemes", &self.identity, json!({}));
        let response = beckn::search(&self.client, &self.url, &request).await?;

        let schemes = response
            .into_first_provider()
            .map(Scheme::from_provider)
            .unwrap_or_default();

        tracing::debug!(count = schemes.len(), "Fetched schemes");
        Ok(schemes)
    }
}
