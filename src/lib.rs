//! Weather Dashboard
//!
//! Core library for loading OpenWeatherMap conditions for a city or coordinate
//! pair, aggregating the 3-hour forecast feed into hourly and daily views, and
//! keeping the dashboard's persisted preferences.
//!
//! The binary crate parses [`Cli`] and calls [`run`].

pub mod astro;
pub mod chart;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod forecast;
pub mod store;
pub mod types;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use chrono::Timelike;
use tracing::info;

pub use client::WeatherClient;
pub use config::ApiConfig;
pub use dashboard::{fetch_forecast_data, load_dashboard};
pub use error::WeatherError;
pub use forecast::{DayGrouping, aggregate, aggregate_daily, slice_hourly};
pub use store::{DashboardState, PreferenceAction, PreferenceStore, Preferences, ThemePreference};
pub use types::*;

/// Command line options.
#[derive(Debug, Default, PartialEq)]
pub struct Cli {
    pub location: Option<LocationQuery>,
    pub watch: bool,
    pub chart: Option<PathBuf>,
    pub grouping: DayGrouping,
    /// Preference changes applied before anything is loaded.
    pub actions: Vec<PreferenceAction>,
    pub show_history: bool,
}

impl Cli {
    /// Parse arguments (without the program name).
    ///
    /// `weather-dashboard [--watch] [--chart FILE] [--weekday-grouping] (CITY... | --lat F --lon F)`
    ///
    /// Preferences: `--theme automatico|manha|tarde|noite`, `--auto-update on|off`,
    /// `--forget CITY`, `--clear-history`, `--history`.
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Cli> {
        let mut cli = Cli::default();
        let mut city: Vec<String> = vec![];
        let mut lat = None;
        let mut lon = None;
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--watch" => cli.watch = true,
                "--weekday-grouping" => cli.grouping = DayGrouping::WeekdayLabel,
                "--chart" => {
                    let p = args.next().ok_or_else(|| anyhow!("--chart needs a file path"))?;
                    cli.chart = Some(PathBuf::from(p));
                }
                "--history" => cli.show_history = true,
                "--clear-history" => cli.actions.push(PreferenceAction::ClearHistory),
                "--forget" => {
                    let c = args.next().ok_or_else(|| anyhow!("--forget needs a city"))?;
                    cli.actions.push(PreferenceAction::RemoveFromHistory(c));
                }
                "--theme" => {
                    let name = args.next().ok_or_else(|| anyhow!("--theme needs a value"))?;
                    let theme = ThemePreference::from_name(&name).ok_or_else(|| {
                        anyhow!("unknown theme: {name} (automatico, manha, tarde or noite)")
                    })?;
                    cli.actions.push(PreferenceAction::SetTheme(theme));
                }
                "--auto-update" => {
                    let enabled = match args.next().as_deref() {
                        Some("on") => true,
                        Some("off") => false,
                        _ => bail!("--auto-update needs on or off"),
                    };
                    cli.actions.push(PreferenceAction::SetAutoUpdate(enabled));
                }
                "--lat" | "--lon" => {
                    let v = args
                        .next()
                        .ok_or_else(|| anyhow!("{arg} needs a value"))?
                        .parse::<f64>()
                        .with_context(|| format!("{arg} must be a number"))?;
                    if arg == "--lat" {
                        lat = Some(v);
                    } else {
                        lon = Some(v);
                    }
                }
                s if s.starts_with("--") => bail!("unknown option: {s}"),
                _ => city.push(arg),
            }
        }
        cli.location = match (lat, lon, city.is_empty()) {
            (Some(lat), Some(lon), true) => Some(LocationQuery::Coordinates { lat, lon }),
            (None, None, false) => Some(LocationQuery::City(city.join(" "))),
            (None, None, true) => None,
            (Some(_), Some(_), false) => bail!("give either a city or --lat/--lon, not both"),
            _ => bail!("--lat and --lon must be given together"),
        };
        Ok(cli)
    }
}

/// Render a Markdown table of the hourly preview.
pub fn render_hourly_table(data: &[HourlyForecastEntry]) -> String {
    if data.is_empty() {
        return "_(sem previsão horária)_".into();
    }
    let mut s = String::from("| Hora | Temp (°C) | Ícone |\n|---|---:|---|\n");
    for h in data {
        s.push_str(&format!("| {} | {:.0} | {} |\n", h.time, h.temp, h.icon));
    }
    s
}

/// Render a Markdown table of daily lows and highs.
pub fn render_daily_table(data: &[DailyForecastEntry]) -> String {
    if data.is_empty() {
        return "_(sem previsão diária)_".into();
    }
    let mut s = String::from("| Dia | Data | Mín (°C) | Máx (°C) | Ícone |\n|---|---|---:|---:|---|\n");
    for d in data {
        s.push_str(&format!(
            "| {} | {} | {:.0} | {:.0} | {} |\n",
            d.day, d.date, d.min_temp, d.max_temp, d.icon
        ));
    }
    s
}

/// Numbered search history, oldest first.
pub fn render_history(prefs: &Preferences) -> String {
    if prefs.search_history.is_empty() {
        return "_(histórico vazio)_".into();
    }
    prefs
        .search_history
        .iter()
        .enumerate()
        .map(|(i, city)| format!("{}. {city}\n", i + 1))
        .collect()
}

/// Line shown above a snapshot kept from an earlier load after a refresh failed.
pub fn render_stale_notice(snapshot: &DashboardSnapshot) -> String {
    let offset = forecast::fixed_offset(snapshot.current.timezone);
    format!(
        "Exibindo os últimos dados obtidos em {}.",
        snapshot
            .fetched_at
            .with_timezone(&offset)
            .format("%d/%m/%Y %H:%M")
    )
}

/// Text block summarizing a snapshot for the terminal.
pub fn render_snapshot(snapshot: &DashboardSnapshot, prefs: &Preferences) -> String {
    let c = &snapshot.current;
    let offset = forecast::fixed_offset(c.timezone);
    let local_hour = snapshot.fetched_at.with_timezone(&offset).hour();
    let sun = astro::solar_position(c.sunrise, c.sunset, snapshot.fetched_at.timestamp());
    let moon = astro::moon_phase(snapshot.fetched_at);

    let mut s = format!(
        "{}, {} · {:.0}°C {} ({})\n",
        c.name, c.country, c.temp, c.description, c.icon
    );
    s.push_str(&format!(
        "Sensação {:.0}°C · Umidade {}% · Vento {:.1} km/h · Visibilidade {:.1} km · Pressão {} hPa\n",
        c.feels_like,
        c.humidity,
        c.wind_speed_kmh(),
        c.visibility_km(),
        c.pressure
    ));
    match &snapshot.air_quality {
        Some(aq) => s.push_str(&format!(
            "Qualidade do ar: {} ({}) · PM2.5 {:.1} · PM10 {:.1}\n",
            aq.aqi,
            aq.level().label(),
            aq.components.pm2_5,
            aq.components.pm10
        )),
        None => s.push_str("Qualidade do ar: N/A\n"),
    }
    s.push_str(&format!(
        "Ciclo solar: {:.0}%{} · {} ({:.0}% iluminada)\n",
        sun.progress * 100.0,
        if sun.is_daytime { "" } else { " (noite)" },
        moon.name.label(),
        moon.illumination
    ));
    s.push_str(&format!("Tema: {}\n", prefs.theme.resolve(local_hour).as_str()));
    if let Some(url) = &snapshot.background_image_url {
        s.push_str(&format!("Imagem: {url}\n"));
    }
    s.push('\n');
    s.push_str(&render_hourly_table(&snapshot.forecast.hourly));
    s.push('\n');
    s.push_str(&render_daily_table(&snapshot.forecast.daily));
    s
}

/// Apply each action to the stored preferences in order and return the result.
pub fn apply_preference_actions(
    store: &PreferenceStore,
    actions: &[PreferenceAction],
) -> Result<Preferences> {
    let mut prefs = store.load().context("failed to read preferences")?;
    for action in actions {
        prefs = store
            .update(action.clone())
            .context("failed to save preferences")?;
    }
    if !actions.is_empty() {
        info!(path = %store.path().display(), "preferences updated");
    }
    Ok(prefs)
}

/// Load the dashboard for the requested location, print it, and keep
/// refreshing while `--watch` is set and auto-update is enabled.
pub async fn run(cli: Cli) -> Result<()> {
    let store = PreferenceStore::new(config::preferences_path());
    let mut prefs = apply_preference_actions(&store, &cli.actions)?;
    if cli.show_history {
        println!("{}", render_history(&prefs));
    }
    if cli.location.is_none() && (cli.show_history || !cli.actions.is_empty()) {
        return Ok(());
    }

    let location = cli
        .location
        .clone()
        .or_else(|| prefs.search_history.last().cloned().map(LocationQuery::City))
        .ok_or_else(|| anyhow!("no location given and no search history"))?;

    let client = WeatherClient::new(ApiConfig::from_env()?)?;
    let mut state = DashboardState::new();

    loop {
        let ticket = state.begin_request();
        let result = load_dashboard(&client, &location, cli.grouping).await;
        state.finish(ticket, result, &mut prefs);
        store.save(&prefs).context("failed to save preferences")?;

        if let Some(err) = &state.error {
            eprintln!("{err}");
        }
        match &state.snapshot {
            Some(snapshot) => {
                if state.error.is_some() {
                    println!("{}", render_stale_notice(snapshot));
                }
                println!("{}", render_snapshot(snapshot, &prefs));
                if let Some(path) = &cli.chart {
                    chart::render_temperature_chart(&snapshot.forecast.hourly, path)
                        .with_context(|| format!("failed to write chart {}", path.display()))?;
                    info!(path = %path.display(), "chart written");
                }
            }
            None => bail!("weather data unavailable"),
        }

        if !(cli.watch && prefs.auto_update) {
            return Ok(());
        }
        info!(
            secs = config::AUTO_UPDATE_INTERVAL.as_secs(),
            "waiting for next update"
        );
        tokio::time::sleep(config::AUTO_UPDATE_INTERVAL).await;
    }
}
