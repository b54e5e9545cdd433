//! Data shapes: the raw OpenWeatherMap payloads and the display-ready views
//! derived from them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Where to fetch weather for.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

impl LocationQuery {
    /// Render as the provider query fragment: `q=<city>` or `lat=<f>&lon=<f>`.
    pub fn as_query(&self) -> String {
        match self {
            Self::City(name) => format!("q={}", urlencoding::encode(name.trim())),
            Self::Coordinates { lat, lon } => format!("lat={lat}&lon={lon}"),
        }
    }
}

// ---- provider payloads -------------------------------------------------------

#[derive(Deserialize, Debug)]
pub struct ForecastResp {
    pub list: Vec<ForecastItem>,
    #[serde(default)]
    pub city: Option<ForecastCity>,
}

#[derive(Deserialize, Debug)]
pub struct ForecastCity {
    #[serde(default)]
    pub timezone: Option<i32>,
}

#[derive(Deserialize, Debug)]
pub struct ForecastItem {
    pub dt: i64,
    pub main: ForecastMain,
    pub weather: Vec<WeatherDesc>,
}

#[derive(Deserialize, Debug)]
pub struct ForecastMain {
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
}

#[derive(Deserialize, Debug)]
pub struct WeatherDesc {
    pub icon: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct CurrentResp {
    pub name: String,
    pub sys: CurrentSys,
    pub main: CurrentMain,
    pub weather: Vec<WeatherDesc>,
    pub wind: CurrentWind,
    #[serde(default)]
    pub visibility: u32,
    pub dt: i64,
    pub coord: Coord,
    #[serde(default)]
    pub timezone: i32,
}

#[derive(Deserialize, Debug)]
pub(crate) struct CurrentSys {
    #[serde(default)]
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

#[derive(Deserialize, Debug)]
pub(crate) struct CurrentMain {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: u32,
    pub humidity: u8,
}

#[derive(Deserialize, Debug)]
pub(crate) struct CurrentWind {
    pub speed: f64,
}

#[derive(Deserialize, Debug)]
pub(crate) struct Coord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Deserialize, Debug)]
pub(crate) struct AirPollutionResp {
    pub list: Vec<AirPollutionItem>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct AirPollutionItem {
    pub main: AirPollutionMain,
    pub components: AirComponents,
}

#[derive(Deserialize, Debug)]
pub(crate) struct AirPollutionMain {
    pub aqi: u8,
}

#[derive(Deserialize, Debug)]
pub(crate) struct UnsplashResp {
    #[serde(default)]
    pub results: Vec<UnsplashPhoto>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct UnsplashPhoto {
    pub urls: UnsplashUrls,
}

#[derive(Deserialize, Debug)]
pub(crate) struct UnsplashUrls {
    pub regular: String,
}

// ---- normalized views --------------------------------------------------------

/// One 3-hour forecast data point.
#[derive(Clone, Debug, PartialEq)]
pub struct ForecastSample {
    /// Seconds since epoch, UTC.
    pub timestamp: i64,
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub icon: String,
}

/// Samples in provider order plus the location's UTC offset in seconds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ForecastSeries {
    pub samples: Vec<ForecastSample>,
    pub utc_offset: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HourlyForecastEntry {
    /// Local "HH:MM".
    pub time: String,
    pub temp: f64,
    pub icon: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DailyForecastEntry {
    /// Capitalized short weekday, e.g. "Ter.".
    pub day: String,
    /// Local date of the first sample in the group.
    pub date: NaiveDate,
    pub min_temp: f64,
    pub max_temp: f64,
    pub icon: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ForecastData {
    pub hourly: Vec<HourlyForecastEntry>,
    pub daily: Vec<DailyForecastEntry>,
}

/// Current conditions for the resolved location.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CurrentWeather {
    pub name: String,
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: u32,
    pub humidity: u8,
    pub description: String,
    pub icon: String,
    /// Meters per second.
    pub wind_speed: f64,
    /// Meters.
    pub visibility: u32,
    pub dt: i64,
    pub lat: f64,
    pub lon: f64,
    /// Seconds east of UTC.
    pub timezone: i32,
}

impl CurrentWeather {
    pub fn wind_speed_kmh(&self) -> f64 {
        self.wind_speed * 3.6
    }

    pub fn visibility_km(&self) -> f64 {
        f64::from(self.visibility) / 1000.0
    }

    pub fn coordinates(&self) -> LocationQuery {
        LocationQuery::Coordinates {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AirComponents {
    pub co: f64,
    pub o3: f64,
    pub pm2_5: f64,
    pub pm10: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AirQuality {
    pub aqi: u8,
    pub components: AirComponents,
}

impl AirQuality {
    pub fn level(&self) -> AqiLevel {
        AqiLevel::from_index(self.aqi)
    }
}

/// OpenWeatherMap air quality index classes (1..=5).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AqiLevel {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
    Unknown,
}

impl AqiLevel {
    pub fn from_index(aqi: u8) -> Self {
        match aqi {
            1 => Self::Good,
            2 => Self::Fair,
            3 => Self::Moderate,
            4 => Self::Poor,
            5 => Self::VeryPoor,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "Boa",
            Self::Fair => "Razoável",
            Self::Moderate => "Moderada",
            Self::Poor => "Pobre",
            Self::VeryPoor => "Muito Pobre",
            Self::Unknown => "N/A",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Good => "green",
            Self::Fair => "yellow",
            Self::Moderate => "orange",
            Self::Poor => "red",
            Self::VeryPoor => "purple",
            Self::Unknown => "gray",
        }
    }
}

/// Everything the dashboard renders for one location.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub current: CurrentWeather,
    pub forecast: ForecastData,
    pub air_quality: Option<AirQuality>,
    pub background_image_url: Option<String>,
    pub fetched_at: DateTime<Utc>,
}
