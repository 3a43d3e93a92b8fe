//! Weather model: WMO weather-code table, current conditions and a 3-day
//! forecast.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::errors::FetchError;

/// Labels of the forecast rows, in order.
pub const FORECAST_DAYS: [&str; 3] = ["Today", "Tomorrow", "Day 3"];

/// Icon + description for one weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    pub icon: &'static str,
    pub description: &'static str,
}

pub const UNKNOWN_CONDITION: Condition = Condition {
    icon: "❓",
    description: "Unknown",
};

const fn c(icon: &'static str, description: &'static str) -> Condition {
    Condition { icon, description }
}

const CONDITIONS: [(i64, Condition); 28] = [
    (0, c("☀️", "Clear sky")),
    (1, c("🌤️", "Mainly clear")),
    (2, c("⛅", "Partly cloudy")),
    (3, c("☁️", "Overcast")),
    (45, c("🌫️", "Foggy")),
    (48, c("🌫️", "Depositing rime fog")),
    (51, c("🌦️", "Light drizzle")),
    (53, c("🌦️", "Moderate drizzle")),
    (55, c("🌧️", "Dense drizzle")),
    (56, c("🌧️", "Light freezing drizzle")),
    (57, c("🌧️", "Dense freezing drizzle")),
    (61, c("🌧️", "Slight rain")),
    (63, c("🌧️", "Moderate rain")),
    (65, c("⛈️", "Heavy rain")),
    (66, c("🌧️", "Light freezing rain")),
    (67, c("🌧️", "Heavy freezing rain")),
    (71, c("🌨️", "Slight snow")),
    (73, c("🌨️", "Moderate snow")),
    (75, c("❄️", "Heavy snow")),
    (77, c("🌨️", "Snow grains")),
    (80, c("🌦️", "Slight rain showers")),
    (81, c("🌧️", "Moderate rain showers")),
    (82, c("⛈️", "Violent rain showers")),
    (85, c("🌨️", "Slight snow showers")),
    (86, c("❄️", "Heavy snow showers")),
    (95, c("⛈️", "Thunderstorm")),
    (96, c("⛈️", "Thunderstorm with hail")),
    (99, c("⛈️", "Thunderstorm with heavy hail")),
];

/// Look up a weather code; unmapped codes give [`UNKNOWN_CONDITION`].
pub fn condition_for(code: i64) -> Condition {
    CONDITIONS
        .iter()
        .find(|(k, _)| *k == code)
        .map(|(_, cond)| *cond)
        .unwrap_or(UNKNOWN_CONDITION)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeather {
    pub temp: i64,
    pub description: String,
    pub icon: String,
    pub location: String,
    pub humidity: u32,
    pub wind_speed: i64,
}

impl CurrentWeather {
    /// Placeholder shown before the first fetch.
    pub fn loading(location: impl Into<String>) -> Self {
        Self {
            temp: 0,
            description: "Loading...".to_string(),
            icon: "⏳".to_string(),
            location: location.into(),
            humidity: 0,
            wind_speed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub day: String,
    pub temp: i64,
    pub icon: String,
    /// Short weekday ("Mon"); only known for live data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekday: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentWeather,
    pub forecast: Vec<ForecastDay>,
}

impl WeatherReport {
    pub fn loading(location: impl Into<String>) -> Self {
        Self {
            current: CurrentWeather::loading(location),
            forecast: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CurrentBlock {
    pub temperature: f64,
    pub windspeed: f64,
    pub weathercode: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailyBlock {
    pub time: Vec<String>,
    pub temperature_2m_max: Vec<f64>,
    pub weathercode: Vec<i64>,
}

/// Response of the forecast endpoint (only the fields we read).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastResponse {
    pub current_weather: CurrentBlock,
    pub daily: DailyBlock,
}

impl ForecastResponse {
    /// Build the report. `humidity` is supplied by the caller since the
    /// endpoint does not provide it.
    pub fn into_report(self, location: &str, humidity: u32) -> Result<WeatherReport, FetchError> {
        let now = condition_for(self.current_weather.weathercode);
        let current = CurrentWeather {
            temp: self.current_weather.temperature.round() as i64,
            description: now.description.to_string(),
            icon: now.icon.to_string(),
            location: location.to_string(),
            humidity,
            wind_speed: self.current_weather.windspeed.round() as i64,
        };

        let daily = &self.daily;
        let mut forecast = Vec::with_capacity(FORECAST_DAYS.len());
        for (index, (date, label)) in daily.time.iter().zip(FORECAST_DAYS).enumerate() {
            let max = daily
                .temperature_2m_max
                .get(index)
                .ok_or_else(|| FetchError::parse(format!("temperature_2m_max[{index}] missing")))?;
            let code = daily
                .weathercode
                .get(index)
                .ok_or_else(|| FetchError::parse(format!("weathercode[{index}] missing")))?;
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|e| FetchError::parse(format!("daily.time[{index}]: {e}")))?;

            forecast.push(ForecastDay {
                day: label.to_string(),
                temp: max.round() as i64,
                icon: condition_for(*code).icon.to_string(),
                weekday: Some(date.format("%a").to_string()),
            });
        }

        Ok(WeatherReport { current, forecast })
    }
}
