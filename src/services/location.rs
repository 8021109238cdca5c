use reqwest::Client;
use thiserror::Error;

use crate::modules::location::model::{District, DistrictList, LocationId, State, StateList};

#[derive(Error, Debug)]
pub enum LocationError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("API error: HTTP {status}: {body}")]
    ApiError { status: u16, body: String },
}

/// Reads the state and district lists used to pick a weather location.
#[derive(Clone)]
pub struct LocationClient {
    client: Client,
    states_url: String,
    districts_url: String,
}

impl LocationClient {
    pub fn new(client: Client, states_url: String, districts_url: String) -> Self {
        Self {
            client,
            states_url,
            districts_url,
        }
    }

    pub async fn states(&self, lang: &str, loc: &str) -> Result<Vec<State>, LocationError> {
        let list: StateList = self.get(&self.states_url, lang, loc).await?;
        tracing::debug!(count = list.states.len(), "Fetched states");
        Ok(list.states)
    }

    pub async fn districts(
        &self,
        state_id: &LocationId,
        lang: &str,
        loc: &str,
    ) -> Result<Vec<District>, LocationError> {
        let url = format!("{}/{}", self.districts_url.trim_end_matches('/'), state_id);
        let list: DistrictList = self.get(&url, lang, loc).await?;
        tracing::debug!(state = %state_id, count = list.districts.len(), "Fetched districts");
        Ok(list.districts)
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        lang: &str,
        loc: &str,
    ) -> Result<T, LocationError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .query(&[("lang", lang), ("loc", loc)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LocationError::ApiError { status, body });
        }

        Ok(response.json().await?)
    }
}
