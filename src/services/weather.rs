use reqwest::Client;
use serde_json::json;

use crate::config::BecknIdentity;
use crate::modules::weather::model::WeatherItem;
use crate::services::beckn::{self, BecknError, SearchRequest};

#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    url: String,
    identity: BecknIdentity,
}

impl WeatherClient {
    pub fn new(client: Client, url: String, identity: BecknIdentity) -> Self {
        Self {
            client,
            url,
            identity,
        }
    }

    /// Current conditions first (when present), then every forecast slot in catalog order.
    pub async fn fetch(&self, district: &str) -> Result<Vec<WeatherItem>, BecknError> {
        if district.trim().is_empty() {
            tracing::warn!("No location selected for weather fetch");
            return Ok(Vec::new());
        }

        let request = SearchRequest::search(
            "weather",
            &self.identity,
            json!({ "item": { "descriptor": { "name": district } } }),
        );

        let response = beckn::search(&self.client, &self.url, &request).await?;
        let items: Vec<WeatherItem> = response
            .into_first_provider()
            .map(|p| p.items)
            .unwrap_or_default()
            .into_iter()
            .map(WeatherItem)
            .collect();

        let sorted = current_then_forecasts(items);
        tracing::debug!(district, count = sorted.len(), "Fetched weather");
        Ok(sorted)
    }
}

fn current_then_forecasts(items: Vec<WeatherItem>) -> Vec<WeatherItem> {
    let current = items.iter().position(|i| !i.is_forecast_entry());

    let mut sorted = Vec::with_capacity(items.len());
    if let Some(idx) = current {
        sorted.push(items[idx].clone());
    }
    sorted.extend(items.into_iter().filter(|i| i.is_forecast_entry()));
    sorted
}
