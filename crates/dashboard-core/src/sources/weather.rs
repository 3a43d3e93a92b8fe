//! WeatherSource - current conditions + 3-day forecast for one location.

use std::sync::Arc;

use async_trait::async_trait;

use super::{DataSource, decode};
use crate::domain::weather::{CurrentWeather, FORECAST_DAYS, ForecastDay, ForecastResponse, WeatherReport};
use crate::domain::FetchError;
use crate::ports::{JsonFetcher, RandomSource, pick};

/// Coordinates and labels of the forecast location.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub label: String,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            latitude: 41.0082,
            longitude: 28.9784,
            timezone: "Europe/Istanbul".to_string(),
            label: "Istanbul, TR".to_string(),
        }
    }
}

struct Preset {
    temp: i64,
    description: &'static str,
    icon: &'static str,
}

static PRESETS: [Preset; 5] = [
    Preset { temp: 22, description: "Partly Cloudy", icon: "⛅" },
    Preset { temp: 25, description: "Sunny", icon: "☀️" },
    Preset { temp: 18, description: "Rainy", icon: "🌧️" },
    Preset { temp: 15, description: "Cloudy", icon: "☁️" },
    Preset { temp: 28, description: "Hot", icon: "🌞" },
];

pub struct WeatherSource {
    endpoint: String,
    location: Location,
    fetcher: Arc<dyn JsonFetcher>,
    rng: Arc<dyn RandomSource>,
}

impl WeatherSource {
    pub fn new(
        endpoint: &str,
        location: Location,
        fetcher: Arc<dyn JsonFetcher>,
        rng: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            location,
            fetcher,
            rng,
        }
    }

}

/// Query values are form-encoded (`Etc/GMT+3` → `Etc%2FGMT%2B3`).
pub fn forecast_url(endpoint: &str, location: &Location) -> Result<reqwest::Url, FetchError> {
    let params = [
        ("latitude", location.latitude.to_string()),
        ("longitude", location.longitude.to_string()),
        ("current_weather", "true".to_string()),
        ("daily", "temperature_2m_max,temperature_2m_min,weathercode".to_string()),
        ("timezone", location.timezone.clone()),
        ("forecast_days", FORECAST_DAYS.len().to_string()),
    ];
    reqwest::Url::parse_with_params(endpoint, &params).map_err(|e| FetchError::network(endpoint, e))
}

fn humidity(rng: &dyn RandomSource) -> u32 {
    // upstream は湿度を返さない
    rng.range_i64(50, 80) as u32
}

/// One of five presets with jittered forecast days.
pub fn fallback_report(rng: &dyn RandomSource, location: &str) -> WeatherReport {
    let preset = &PRESETS[rng.index(PRESETS.len())];
    let current = CurrentWeather {
        temp: preset.temp,
        description: preset.description.to_string(),
        icon: preset.icon.to_string(),
        location: location.to_string(),
        wind_speed: rng.range_i64(5, 20),
        humidity: humidity(rng),
    };

    let redraw_icon = || {
        pick(rng, &PRESETS)
            .map(|p| p.icon)
            .unwrap_or(preset.icon)
            .to_string()
    };
    let forecast = vec![
        ForecastDay {
            day: FORECAST_DAYS[0].to_string(),
            temp: current.temp,
            icon: current.icon.clone(),
            weekday: None,
        },
        ForecastDay {
            day: FORECAST_DAYS[1].to_string(),
            temp: current.temp + rng.range_i64(-3, 3),
            icon: redraw_icon(),
            weekday: None,
        },
        ForecastDay {
            day: FORECAST_DAYS[2].to_string(),
            temp: current.temp + rng.range_i64(-4, 4),
            icon: redraw_icon(),
            weekday: None,
        },
    ];

    WeatherReport { current, forecast }
}

#[async_trait]
impl DataSource for WeatherSource {
    type Output = WeatherReport;

    fn name(&self) -> &'static str {
        "weather"
    }

    async fn fetch_live(&self) -> Result<WeatherReport, FetchError> {
        let url = forecast_url(&self.endpoint, &self.location)?;
        let body = self.fetcher.get_json(url.as_str()).await?;
        let response: ForecastResponse = decode(body)?;
        response.into_report(&self.location.label, humidity(self.rng.as_ref()))
    }

    fn fallback(&self) -> WeatherReport {
        fallback_report(self.rng.as_ref(), &self.location.label)
    }
}
