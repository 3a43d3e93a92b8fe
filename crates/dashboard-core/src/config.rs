//! DashboardConfig - 起動時の設定
//!
//! 優先順位（後勝ち）:
//! 1. 組み込みデフォルト
//! 2. TOML ファイル（指定された場合）
//! 3. `DASHBOARD_` で始まる環境変数（`__` でネスト。例: `DASHBOARD_LOCATION__LABEL`）
//!
//! ユーザーが画面から変える設定（更新間隔など）は Settings 側。ここにあるのは
//! デプロイ単位で決まるもの。

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::sources::weather::Location;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),
    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError::Invalid(Box::new(e))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub prices: String,
    pub posts: String,
    pub random_users: String,
    pub forecast: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            prices: "https://api.coingecko.com/api/v3/simple/price".to_string(),
            posts: "https://jsonplaceholder.typicode.com/posts".to_string(),
            random_users: "https://randomuser.me/api/".to_string(),
            forecast: "https://api.open-meteo.com/v1/forecast".to_string(),
        }
    }
}

/// Timer periods that are not user settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Intervals {
    pub weather_secs: u64,
    pub notification_secs: u64,
}

impl Default for Intervals {
    fn default() -> Self {
        Self {
            weather_secs: 600,
            notification_secs: 15,
        }
    }
}

impl Intervals {
    pub fn weather(&self) -> Duration {
        Duration::from_secs(self.weather_secs)
    }

    pub fn notification(&self) -> Duration {
        Duration::from_secs(self.notification_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file backing the key-value store. None keeps everything in memory.
    pub path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: Some(PathBuf::from("dashboard-store.json")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub endpoints: Endpoints,
    pub location: Location,
    pub intervals: Intervals,
    pub http: HttpConfig,
    pub storage: StorageConfig,
}

impl DashboardConfig {
    /// Defaults, then `path` (if any), then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            figment = figment.merge(Toml::file(path));
        }
        let config = figment
            .merge(Env::prefixed("DASHBOARD_").split("__"))
            .extract()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_point_at_public_apis() {
        let c = DashboardConfig::default();
        assert!(c.endpoints.prices.contains("coingecko"));
        assert_eq!(c.location.label, "Istanbul, TR");
        assert_eq!(c.intervals.weather(), Duration::from_secs(600));
        assert_eq!(c.intervals.notification(), Duration::from_secs(15));
    }

    #[test]
    fn toml_file_overrides_defaults_partially() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[location]
latitude = 52.52
longitude = 13.41
timezone = "Europe/Berlin"
label = "Berlin, DE"

[intervals]
weather_secs = 300
"#
        )
        .unwrap();

        let c = DashboardConfig::load(Some(file.path())).unwrap();
        assert_eq!(c.location.label, "Berlin, DE");
        assert_eq!(c.intervals.weather_secs, 300);
        assert_eq!(c.intervals.notification_secs, 15);
        assert_eq!(c.endpoints, Endpoints::default());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = DashboardConfig::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn wrong_type_is_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http]\ntimeout_secs = \"ten\"").unwrap();
        let err = DashboardConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
