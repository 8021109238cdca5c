use serde::{Deserialize, Serialize};

use crate::services::beckn::Item;

const FORECAST_MARKER: &str = "Forecast for ";

/// One weather catalog entry: either current conditions or a forecast slot
/// named like `Forecast for 2024-06-02 12:00:00`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherItem(pub Item);

/// Date and hour parsed out of a forecast entry name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastSlot<'a> {
    pub date: &'a str,
    pub hour: u32,
}

impl WeatherItem {
    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub fn is_forecast_entry(&self) -> bool {
        self.name().contains(FORECAST_MARKER)
    }

    pub fn forecast_slot(&self) -> Option<ForecastSlot<'_>> {
        let name = self.name();
        if !name.starts_with("Forecast") {
            return None;
        }

        let parts: Vec<&str> = name.split(' ').collect();
        if parts.len() < 4 {
            return None;
        }

        let hour = parts[3]
            .split(':')
            .next()
            .and_then(|h| h.parse().ok())
            .unwrap_or(0);

        Some(ForecastSlot {
            date: parts[2],
            hour,
        })
    }

    /// Date code carried on the first tag of a current-conditions entry.
    pub fn observed_date(&self) -> Option<&str> {
        self.0.tags.first()?.descriptor.as_ref()?.code.as_deref()
    }

    pub fn temperature(&self) -> Option<f64> {
        self.0
            .tags
            .first()?
            .list
            .iter()
            .find(|entry| {
                entry.descriptor.as_ref().and_then(|d| d.code.as_deref()) == Some("Temperature")
            })?
            .value
            .as_deref()?
            .trim()
            .parse()
            .ok()
    }

    pub fn short_desc(&self) -> Option<&str> {
        self.0.descriptor.as_ref()?.short_desc.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherIcon {
    Rainy,
    Clear,
    Sunny,
}

impl WeatherIcon {
    pub fn classify(description: &str, temperature: Option<f64>) -> Self {
        let description = description.to_lowercase();
        let has = |needle: &str| description.contains(needle);

        if has("rain") || has("shower") || has("thunderstorm") {
            WeatherIcon::Rainy
        } else if has("cloud") || has("clear") || has("snow") || has("mist") {
            WeatherIcon::Clear
        } else if has("sunny") || temperature.is_some_and(|t| t >= 30.0) {
            WeatherIcon::Sunny
        } else {
            WeatherIcon::Clear
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherIcon::Rainy => "rainy",
            WeatherIcon::Clear => "clear",
            WeatherIcon::Sunny => "sunny",
        }
    }
}
