use reqwest::Client;

pub mod config;
pub mod modules;
pub mod services;

use crate::config::EndpointConfig;
use crate::modules::chat::controller::QueryOrchestrator;
use crate::services::location::LocationClient;
use crate::services::schemes::SchemeClient;
use crate::services::weather::WeatherClient;

/// Everything a front end needs to talk to the advisory backends.
#[derive(Clone)]
pub struct AppState {
    pub config: EndpointConfig,
    pub orchestrator: QueryOrchestrator,
    pub weather: Option<WeatherClient>,
    pub schemes: Option<SchemeClient>,
    /// Present only when both the state and district lists are configured.
    pub locations: Option<LocationClient>,
}

impl AppState {
    pub fn new(config: EndpointConfig) -> Self {
        let http = Client::new();

        let weather = config
            .weather_url
            .clone()
            .map(|url| WeatherClient::new(http.clone(), url, config.identity.clone()));
        let schemes = config
            .search_url
            .clone()
            .map(|url| SchemeClient::new(http.clone(), url, config.identity.clone()));
        let locations = config
            .states_url
            .clone()
            .zip(config.districts_url.clone())
            .map(|(states, districts)| LocationClient::new(http.clone(), states, districts));

        Self {
            orchestrator: QueryOrchestrator::with_client(http, &config),
            weather,
            schemes,
            locations,
            config,
        }
    }
}
