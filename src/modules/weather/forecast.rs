use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::model::WeatherItem;

const MIDDAY_HOUR: u32 = 12;

/// How many upcoming days to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForecastWindow {
    #[default]
    Next3Days,
    Next5Days,
}

impl ForecastWindow {
    pub fn days(&self) -> usize {
        match self {
            ForecastWindow::Next3Days => 3,
            ForecastWindow::Next5Days => 5,
        }
    }

    pub fn from_days(days: usize) -> Option<Self> {
        match days {
            3 => Some(ForecastWindow::Next3Days),
            5 => Some(ForecastWindow::Next5Days),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyForecast<'a> {
    pub date: &'a str,
    pub forecast: &'a WeatherItem,
}

impl DailyForecast<'_> {
    /// `Sunday 2 Jun`, or the raw date key when it is not `YYYY-MM-DD`.
    pub fn day_label(&self) -> String {
        NaiveDate::parse_from_str(self.date, "%Y-%m-%d")
            .map(|d| d.format("%A %-d %b").to_string())
            .unwrap_or_else(|_| self.date.to_string())
    }
}

/// One representative forecast per upcoming day: the slot nearest midday.
///
/// `items` is the list produced by the weather client, current conditions first.
/// Slots dated on the current observation date are skipped.
pub fn daily_forecasts(items: &[WeatherItem], window: ForecastWindow) -> Vec<DailyForecast<'_>> {
    let current_date = items.first().and_then(|i| i.observed_date());

    let mut by_date: BTreeMap<&str, Vec<(&WeatherItem, u32)>> = BTreeMap::new();
    for item in items {
        let Some(slot) = item.forecast_slot() else {
            continue;
        };
        if Some(slot.date) == current_date {
            continue;
        }
        by_date.entry(slot.date).or_default().push((item, slot.hour));
    }

    by_date
        .into_iter()
        .filter_map(|(date, slots)| {
            // min_by_key keeps the first of equal keys
            let (forecast, _) = slots
                .into_iter()
                .min_by_key(|(_, hour)| hour.abs_diff(MIDDAY_HOUR))?;
            Some(DailyForecast { date, forecast })
        })
        .take(window.days())
        .collect()
}
