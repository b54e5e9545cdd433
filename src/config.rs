//! Provider endpoints and credentials, read from the environment.

use std::{env, path::PathBuf, time::Duration};

use crate::error::{Result, WeatherError};

pub const OPENWEATHERMAP_KEY_VAR: &str = "OPENWEATHERMAP_API_KEY";
pub const UNSPLASH_KEY_VAR: &str = "UNSPLASH_API_KEY";

/// Interval between refreshes when auto-update is enabled.
pub const AUTO_UPDATE_INTERVAL: Duration = Duration::from_secs(10 * 60);

pub const DEFAULT_WEATHER_BASE: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_UNSPLASH_BASE: &str = "https://api.unsplash.com";

/// Gets the OpenWeatherMap base url
fn weather_base() -> String {
    env::var("OPENWEATHERMAP_BASE").unwrap_or_else(|_| DEFAULT_WEATHER_BASE.to_string())
}

/// Gets the Unsplash base url
fn unsplash_base() -> String {
    env::var("UNSPLASH_BASE").unwrap_or_else(|_| DEFAULT_UNSPLASH_BASE.to_string())
}

/// Endpoints and keys used by [`crate::WeatherClient`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub weather_base: String,
    pub weather_key: String,
    pub unsplash_base: String,
    /// Background images are optional; without a key they are skipped.
    pub unsplash_key: Option<String>,
    /// No timeout is applied unless one is configured.
    pub request_timeout: Option<Duration>,
}

impl ApiConfig {
    /// Configuration for an explicit weather endpoint. The image provider
    /// starts at its public url with no key; see [`ApiConfig::with_unsplash`].
    pub fn new(weather_base: impl Into<String>, weather_key: impl Into<String>) -> Self {
        Self {
            weather_base: weather_base.into(),
            weather_key: weather_key.into(),
            unsplash_base: DEFAULT_UNSPLASH_BASE.to_string(),
            unsplash_key: None,
            request_timeout: None,
        }
    }

    pub fn with_unsplash(mut self, base: impl Into<String>, key: Option<String>) -> Self {
        self.unsplash_base = base.into();
        self.unsplash_key = key;
        self
    }

    /// Build the configuration from `OPENWEATHERMAP_API_KEY`, `UNSPLASH_API_KEY`,
    /// the optional base url overrides and `WEATHER_REQUEST_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let weather_key = env::var(OPENWEATHERMAP_KEY_VAR)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(WeatherError::MissingApiKey(OPENWEATHERMAP_KEY_VAR))?;
        let unsplash_key = env::var(UNSPLASH_KEY_VAR)
            .ok()
            .filter(|k| !k.trim().is_empty());
        let request_timeout = env::var("WEATHER_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs);

        Ok(Self {
            weather_base: weather_base(),
            weather_key,
            unsplash_base: unsplash_base(),
            unsplash_key,
            request_timeout,
        })
    }
}

/// Location of the persisted preferences file.
///
/// `WEATHER_DASHBOARD_PREFS` wins; otherwise the platform config directory is used.
pub fn preferences_path() -> PathBuf {
    if let Ok(p) = env::var("WEATHER_DASHBOARD_PREFS") {
        return PathBuf::from(p);
    }
    dirs::config_dir()
        .unwrap_or_else(env::temp_dir)
        .join("weather-dashboard")
        .join("preferences.json")
}
