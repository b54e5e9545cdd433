//! HTTP access to OpenWeatherMap and Unsplash.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::{Result, WeatherError};
use crate::forecast::parse_forecast;
use crate::types::{
    AirPollutionResp, AirQuality, CurrentResp, CurrentWeather, ForecastResp, ForecastSeries,
    LocationQuery, UnsplashResp,
};

/// Client for the weather and image providers. Requests are never retried.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: Client,
    config: ApiConfig,
}

/// Parse a successful body, mapping shape mismatches to `MalformedResponse`.
async fn read_json<T: DeserializeOwned>(resp: reqwest::Response, what: &str) -> Result<T> {
    let body = resp.text().await?;
    serde_json::from_str(&body)
        .map_err(|e| WeatherError::MalformedResponse(format!("{what}: {e}")))
}

impl WeatherClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            config,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Send a GET to `{weather_base}/{endpoint}?{query}` with the API key appended.
    async fn get_weather(&self, endpoint: &str, query: &str) -> Result<reqwest::Response> {
        let url = format!("{}/{endpoint}?{query}", self.config.weather_base);
        debug!(%url, "requesting");
        let resp = self
            .http
            .get(format!("{url}&appid={}", self.config.weather_key))
            .send()
            .await?;
        Ok(resp)
    }

    /// Fetch the 5-day / 3-hour forecast feed and normalize it.
    pub async fn forecast(&self, query: &LocationQuery) -> Result<ForecastSeries> {
        let resp = self
            .get_weather(
                "forecast",
                &format!("{}&units=metric&lang=pt_br", query.as_query()),
            )
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(WeatherError::TransportFailure(format!(
                "forecast unavailable: {status}"
            )));
        }
        let raw: ForecastResp = read_json(resp, "forecast").await?;
        let series = parse_forecast(raw)?;
        debug!(samples = series.samples.len(), "forecast parsed");
        Ok(series)
    }

    /// Fetch current conditions; this also resolves the city name and coordinates.
    pub async fn current_weather(&self, query: &LocationQuery) -> Result<CurrentWeather> {
        let resp = self
            .get_weather(
                "weather",
                &format!("{}&units=metric&lang=pt_br", query.as_query()),
            )
            .await?;
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(WeatherError::InvalidApiKey);
        }
        if !status.is_success() {
            return Err(WeatherError::LocationNotFound);
        }
        let raw: CurrentResp = read_json(resp, "current weather").await?;
        let weather = raw
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::MalformedResponse("weather is empty".into()))?;
        Ok(CurrentWeather {
            name: raw.name,
            country: raw.sys.country,
            sunrise: raw.sys.sunrise,
            sunset: raw.sys.sunset,
            temp: raw.main.temp,
            feels_like: raw.main.feels_like,
            temp_min: raw.main.temp_min,
            temp_max: raw.main.temp_max,
            pressure: raw.main.pressure,
            humidity: raw.main.humidity,
            description: weather.description,
            icon: weather.icon,
            wind_speed: raw.wind.speed,
            visibility: raw.visibility,
            dt: raw.dt,
            lat: raw.coord.lat,
            lon: raw.coord.lon,
            timezone: raw.timezone,
        })
    }

    /// Air quality for a coordinate pair. A failed status or an empty list is `None`.
    pub async fn air_quality(&self, lat: f64, lon: f64) -> Result<Option<AirQuality>> {
        let resp = self
            .get_weather("air_pollution", &format!("lat={lat}&lon={lon}"))
            .await?;
        if !resp.status().is_success() {
            warn!(status = %resp.status(), "air quality unavailable");
            return Ok(None);
        }
        let raw: AirPollutionResp = read_json(resp, "air pollution").await?;
        Ok(raw.list.into_iter().next().map(|item| AirQuality {
            aqi: item.main.aqi,
            components: item.components,
        }))
    }

    /// Url of a landscape photo for `query`, if the image provider has one.
    ///
    /// Failures are logged and yield `None`.
    pub async fn background_image(&self, query: &str) -> Option<String> {
        let Some(key) = self.config.unsplash_key.as_deref() else {
            warn!("Unsplash API key not configured, skipping background image");
            return None;
        };
        let url = format!(
            "{}/search/photos?query={}&orientation=landscape&per_page=1",
            self.config.unsplash_base,
            urlencoding::encode(query)
        );
        debug!(%url, "requesting");
        let resp = match self
            .http
            .get(format!("{url}&client_id={key}"))
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                let e = e.without_url();
                warn!(error = %e, "background image request failed");
                return None;
            }
        };
        if !resp.status().is_success() {
            warn!(status = %resp.status(), "background image request failed");
            return None;
        }
        match read_json::<UnsplashResp>(resp, "unsplash").await {
            Ok(data) => {
                let found = data.results.into_iter().next().map(|p| p.urls.regular);
                if found.is_none() {
                    warn!(%query, "no background image found");
                }
                found
            }
            Err(e) => {
                warn!(error = %e, "background image response unreadable");
                None
            }
        }
    }
}
