//! Fetch-then-aggregate pipelines.

use chrono::Utc;
use tracing::{info, warn};

use crate::client::WeatherClient;
use crate::error::Result;
use crate::forecast::{DayGrouping, aggregate};
use crate::types::{DashboardSnapshot, ForecastData, LocationQuery};

/// Fetch the forecast feed for `query` and derive the hourly and daily views.
///
/// A failed fetch returns before any aggregation happens.
pub async fn fetch_forecast_data(
    client: &WeatherClient,
    query: &LocationQuery,
    grouping: DayGrouping,
) -> Result<ForecastData> {
    let series = client.forecast(query).await?;
    Ok(aggregate(&series, grouping))
}

/// Load everything the dashboard shows for one location.
///
/// Current conditions come first because they resolve the city name and
/// coordinates; the image, forecast and air quality are then fetched together.
/// Only a forecast failure aborts; a missing image or air-quality reading is
/// tolerated.
pub async fn load_dashboard(
    client: &WeatherClient,
    query: &LocationQuery,
    grouping: DayGrouping,
) -> Result<DashboardSnapshot> {
    let current = client.current_weather(query).await?;
    info!(city = %current.name, country = %current.country, "current weather loaded");

    let coords = current.coordinates();
    let (background_image_url, forecast, air_quality) = tokio::join!(
        client.background_image(&current.name),
        fetch_forecast_data(client, &coords, grouping),
        client.air_quality(current.lat, current.lon),
    );
    let forecast = forecast?;
    let air_quality = air_quality.unwrap_or_else(|e| {
        warn!(error = %e, "air quality ignored");
        None
    });

    info!(
        hourly = forecast.hourly.len(),
        daily = forecast.daily.len(),
        "forecast aggregated"
    );

    Ok(DashboardSnapshot {
        current,
        forecast,
        air_quality,
        background_image_url,
        fetched_at: Utc::now(),
    })
}
