use std::env;
use thiserror::Error;

const BASE_URL_KEY: &str = "API_BASE_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing endpoint: set {key} or API_BASE_URL")]
    Missing { key: &'static str },
}

/// One remote capability and where its URL comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Weather,
    Chat,
    Search,
    Transcribe,
    Tts,
    States,
    Districts,
}

impl Capability {
    pub fn env_key(&self) -> &'static str {
        match self {
            Capability::Weather => "WEATHER_API_URL",
            Capability::Chat => "AIBOT_API_URL",
            Capability::Search => "SEARCH_API_URL",
            Capability::Transcribe => "TRANSCRIBE_API_URL",
            Capability::Tts => "TTS_API_URL",
            Capability::States => "STATES_API_URL",
            Capability::Districts => "DISTRICTS_API_URL",
        }
    }

    /// Path segment used by the local-development fallback `{base}/api/{segment}/`.
    pub fn path_segment(&self) -> &'static str {
        match self {
            Capability::Weather => "weather",
            Capability::Chat => "chat",
            Capability::Search => "search",
            Capability::Transcribe => "transcribe",
            Capability::Tts => "tts",
            Capability::States => "states",
            Capability::Districts => "districts",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Capability::Chat)
    }
}

/// Caller identity stamped into every Beckn context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BecknIdentity {
    pub bap_id: String,
    pub bap_uri: String,
}

impl Default for BecknIdentity {
    fn default() -> Self {
        Self {
            bap_id: "oan-seeker-ui".to_string(),
            bap_uri: "https://oan-seeker-ui.azurecontainer.io".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub weather_url: Option<String>,
    pub chat_url: String,
    pub search_url: Option<String>,
    pub transcribe_url: Option<String>,
    pub tts_url: Option<String>,
    pub states_url: Option<String>,
    /// District lists live at `{districts_url}/{state_id}`.
    pub districts_url: Option<String>,
    pub identity: BecknIdentity,
    pub user_id: String,
}

impl EndpointConfig {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let base_url = read(BASE_URL_KEY);

        let resolve = |capability: Capability| -> Result<Option<String>, ConfigError> {
            let url = read(capability.env_key()).or_else(|| {
                base_url.as_ref().map(|base| {
                    format!(
                        "{}/api/{}/",
                        base.trim_end_matches('/'),
                        capability.path_segment()
                    )
                })
            });

            match url {
                None if capability.is_required() => Err(ConfigError::Missing {
                    key: capability.env_key(),
                }),
                url => Ok(url),
            }
        };

        let chat_url = resolve(Capability::Chat)?.ok_or(ConfigError::Missing {
            key: Capability::Chat.env_key(),
        })?;

        let defaults = BecknIdentity::default();
        let identity = BecknIdentity {
            bap_id: read("BAP_ID").unwrap_or(defaults.bap_id),
            bap_uri: read("BAP_URI").unwrap_or(defaults.bap_uri),
        };

        Ok(Self {
            weather_url: resolve(Capability::Weather)?,
            chat_url,
            search_url: resolve(Capability::Search)?,
            transcribe_url: resolve(Capability::Transcribe)?,
            tts_url: resolve(Capability::Tts)?,
            states_url: resolve(Capability::States)?,
            districts_url: resolve(Capability::Districts)?,
            identity,
            user_id: read("CHAT_USER_ID").unwrap_or_else(|| "anonymous".to_string()),
        })
    }

    /// Config pointing every capability at one host, as a local dev backend exposes them.
    pub fn for_base_url(base: &str) -> Self {
        let url = |capability: Capability| {
            format!(
                "{}/api/{}/",
                base.trim_end_matches('/'),
                capability.path_segment()
            )
        };

        Self {
            weather_url: Some(url(Capability::Weather)),
            chat_url: url(Capability::Chat),
            search_url: Some(url(Capability::Search)),
            transcribe_url: Some(url(Capability::Transcribe)),
            tts_url: Some(url(Capability::Tts)),
            states_url: Some(url(Capability::States)),
            districts_url: Some(url(Capability::Districts)),
            identity: BecknIdentity::default(),
            user_id: "anonymous".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn explicit_urls_win_over_base() {
        let config = EndpointConfig::from_lookup(lookup(&[
            ("AIBOT_API_URL", "https://bot.example/chat"),
            ("API_BASE_URL", "http://localhost:8000/"),
        ]))
        .unwrap();

        assert_eq!(config.chat_url, "https://bot.example/chat");
        assert_eq!(
            config.weather_url.as_deref(),
            Some("http://localhost:8000/api/weather/")
        );
        assert_eq!(
            config.transcribe_url.as_deref(),
            Some("http://localhost:8000/api/transcribe/")
        );
    }

    #[test]
    fn chat_is_required() {
        let err = EndpointConfig::from_lookup(lookup(&[(
            "WEATHER_API_URL",
            "https://weather.example",
        )]))
        .unwrap_err();

        assert!(matches!(err, ConfigError::Missing { key: "AIBOT_API_URL" }));
    }

    #[test]
    fn optional_endpoints_stay_unset_without_base() {
        let config =
            EndpointConfig::from_lookup(lookup(&[("AIBOT_API_URL", "https://bot.example")]))
                .unwrap();

        assert!(config.weather_url.is_none());
        assert!(config.search_url.is_none());
        assert!(config.tts_url.is_none());
        assert!(config.states_url.is_none());
        assert!(config.districts_url.is_none());
        assert_eq!(config.user_id, "anonymous");
        assert_eq!(config.identity, BecknIdentity::default());
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = EndpointConfig::from_lookup(lookup(&[
            ("AIBOT_API_URL", "https://bot.example"),
            ("SEARCH_API_URL", "  "),
        ]))
        .unwrap();

        assert!(config.search_url.is_none());
    }

    #[test]
    fn base_url_alone_resolves_everything() {
        let config = EndpointConfig::from_lookup(lookup(&[("API_BASE_URL", "http://127.0.0.1:9000")]))
            .unwrap();

        assert_eq!(config.chat_url, "http://127.0.0.1:9000/api/chat/");
        assert_eq!(config.tts_url.as_deref(), Some("http://127.0.0.1:9000/api/tts/"));
        assert_eq!(
            config.districts_url.as_deref(),
            Some("http://127.0.0.1:9000/api/districts/")
        );
    }
}
