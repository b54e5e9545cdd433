//! Argument parsing, snapshot rendering and chart output tests (no network)

use chrono::{DateTime, Utc};
use weather_dashboard::chart::render_temperature_chart;
use weather_dashboard::{
    AirComponents, AirQuality, Cli, CurrentWeather, DashboardSnapshot, DayGrouping, ForecastData,
    HourlyForecastEntry, LocationQuery, PreferenceAction, PreferenceStore, Preferences,
    ThemePreference, apply_preference_actions, render_history, render_snapshot, render_stale_notice,
};

fn args(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

#[test]
fn parse_city_words() {
    let cli = Cli::parse(args(&["Rio", "de", "Janeiro", "--watch"])).unwrap();
    assert_eq!(cli.location, Some(LocationQuery::City("Rio de Janeiro".into())));
    assert!(cli.watch);
    assert_eq!(cli.grouping, DayGrouping::CalendarDate);
}

#[test]
fn parse_coordinates_and_options() {
    let cli = Cli::parse(args(&[
        "--lat",
        "-15.78",
        "--lon",
        "-47.93",
        "--weekday-grouping",
        "--chart",
        "out.svg",
    ]))
    .unwrap();
    assert_eq!(
        cli.location,
        Some(LocationQuery::Coordinates { lat: -15.78, lon: -47.93 })
    );
    assert_eq!(cli.grouping, DayGrouping::WeekdayLabel);
    assert_eq!(cli.chart.unwrap().to_str(), Some("out.svg"));
}

#[test]
fn parse_errors() {
    assert!(Cli::parse(args(&["--lat", "1.0"])).is_err());
    assert!(Cli::parse(args(&["--lat", "abc", "--lon", "1"])).is_err());
    assert!(Cli::parse(args(&["Recife", "--lat", "1", "--lon", "2"])).is_err());
    assert!(Cli::parse(args(&["--bogus"])).is_err());
    assert_eq!(Cli::parse(args(&[])).unwrap().location, None);
}

#[test]
fn parse_preference_options() {
    let cli = Cli::parse(args(&[
        "--theme",
        "noite",
        "--auto-update",
        "off",
        "--forget",
        "Recife",
        "--clear-history",
        "--history",
    ]))
    .unwrap();
    assert_eq!(cli.location, None);
    assert!(cli.show_history);
    assert_eq!(
        cli.actions,
        vec![
            PreferenceAction::SetTheme(ThemePreference::Night),
            PreferenceAction::SetAutoUpdate(false),
            PreferenceAction::RemoveFromHistory("Recife".into()),
            PreferenceAction::ClearHistory,
        ]
    );

    let cli = Cli::parse(args(&["--auto-update", "on", "Natal"])).unwrap();
    assert_eq!(cli.actions, vec![PreferenceAction::SetAutoUpdate(true)]);
    assert_eq!(cli.location, Some(LocationQuery::City("Natal".into())));
}

#[test]
fn parse_preference_errors() {
    assert!(Cli::parse(args(&["--theme", "dia"])).is_err());
    assert!(Cli::parse(args(&["--theme"])).is_err());
    assert!(Cli::parse(args(&["--auto-update", "yes"])).is_err());
    assert!(Cli::parse(args(&["--auto-update"])).is_err());
    assert!(Cli::parse(args(&["--forget"])).is_err());
}

#[test]
fn parsed_options_update_stored_preferences() {
    let dir = tempfile::tempdir().unwrap();
    let store = PreferenceStore::new(dir.path().join("preferences.json"));
    store
        .save(&Preferences {
            search_history: vec!["Recife".into(), "Natal".into()],
            ..Preferences::default()
        })
        .unwrap();

    let cli = Cli::parse(args(&["--theme", "manha", "--auto-update", "off", "--forget", "Recife"]))
        .unwrap();
    let prefs = apply_preference_actions(&store, &cli.actions).unwrap();
    assert_eq!(prefs.theme, ThemePreference::Morning);
    assert!(!prefs.auto_update);
    assert_eq!(prefs.search_history, vec!["Natal"]);
    assert_eq!(store.load().unwrap(), prefs);

    let cli = Cli::parse(args(&["--clear-history"])).unwrap();
    let prefs = apply_preference_actions(&store, &cli.actions).unwrap();
    assert!(prefs.search_history.is_empty());
    assert!(!prefs.auto_update);
}

#[test]
fn history_listing() {
    let mut prefs = Preferences::default();
    assert!(render_history(&prefs).contains("histórico vazio"));
    prefs.search_history = vec!["Recife".into(), "Belém".into()];
    assert_eq!(render_history(&prefs), "1. Recife\n2. Belém\n");
}

fn hourly() -> Vec<HourlyForecastEntry> {
    vec![
        HourlyForecastEntry { time: "09:00".into(), temp: 18.5, icon: "01d".into() },
        HourlyForecastEntry { time: "12:00".into(), temp: 23.0, icon: "02d".into() },
        HourlyForecastEntry { time: "15:00".into(), temp: 21.2, icon: "03d".into() },
    ]
}

fn snapshot() -> DashboardSnapshot {
    let fetched_at: DateTime<Utc> = DateTime::from_timestamp(1600020000, 0).unwrap();
    DashboardSnapshot {
        current: CurrentWeather {
            name: "Fortaleza".into(),
            country: "BR".into(),
            sunrise: 1600000000,
            sunset: 1600040000,
            temp: 29.6,
            feels_like: 33.0,
            temp_min: 28.0,
            temp_max: 31.0,
            pressure: 1010,
            humidity: 70,
            description: "nuvens dispersas".into(),
            icon: "03d".into(),
            wind_speed: 5.0,
            visibility: 8000,
            dt: 1600020000,
            lat: -3.72,
            lon: -38.54,
            timezone: -10800,
        },
        forecast: ForecastData { hourly: hourly(), daily: vec![] },
        air_quality: Some(AirQuality {
            aqi: 1,
            components: AirComponents { co: 200.0, o3: 50.0, pm2_5: 1.25, pm10: 2.0 },
        }),
        background_image_url: None,
        fetched_at,
    }
}

#[test]
fn render_snapshot_summary() {
    let snapshot = snapshot();
    let text = render_snapshot(&snapshot, &Preferences::default());
    assert!(text.starts_with("Fortaleza, BR · 30°C nuvens dispersas (03d)"));
    assert!(text.contains("Vento 18.0 km/h"));
    assert!(text.contains("Visibilidade 8.0 km"));
    assert!(text.contains("Qualidade do ar: 1 (Boa)"));
    assert!(text.contains("Ciclo solar: 50%"));
    assert!(text.contains("| 12:00 | 23 | 02d |"));
    assert!(text.contains("sem previsão diária"));
}

#[test]
fn stale_notice_shows_local_fetch_time() {
    // 1600020000 is 2020-09-13 18:00 UTC, 15:00 at UTC-3.
    assert_eq!(
        render_stale_notice(&snapshot()),
        "Exibindo os últimos dados obtidos em 13/09/2020 15:00."
    );
}

#[test]
fn chart_written_as_svg() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chart.svg");
    render_temperature_chart(&hourly(), &path).unwrap();
    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.trim_end().ends_with("</svg>"));
}

#[test]
fn chart_needs_data() {
    let dir = tempfile::tempdir().unwrap();
    assert!(render_temperature_chart(&[], &dir.path().join("empty.svg")).is_err());
}
