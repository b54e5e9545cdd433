//! Dashboard state: persisted preferences and the latest loaded snapshot.
//!
//! Preferences change only through [`reduce`]; the aggregation code never
//! touches this state.

use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, WeatherError};
use crate::types::DashboardSnapshot;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThemePreference {
    #[default]
    #[serde(rename = "automatico")]
    Automatic,
    #[serde(rename = "manha")]
    Morning,
    #[serde(rename = "tarde")]
    Afternoon,
    #[serde(rename = "noite")]
    Night,
}

impl ThemePreference {
    /// Concrete theme for the given local hour. Manual choices are returned as-is.
    pub fn resolve(self, hour: u32) -> ThemePreference {
        match self {
            Self::Automatic => match hour {
                6..=11 => Self::Morning,
                12..=17 => Self::Afternoon,
                _ => Self::Night,
            },
            other => other,
        }
    }

    /// Inverse of [`ThemePreference::as_str`].
    pub fn from_name(name: &str) -> Option<ThemePreference> {
        match name {
            "automatico" => Some(Self::Automatic),
            "manha" => Some(Self::Morning),
            "tarde" => Some(Self::Afternoon),
            "noite" => Some(Self::Night),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Automatic => "automatico",
            Self::Morning => "manha",
            Self::Afternoon => "tarde",
            Self::Night => "noite",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: ThemePreference,
    pub search_history: Vec<String>,
    pub auto_update: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: ThemePreference::Automatic,
            search_history: Vec::new(),
            auto_update: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PreferenceAction {
    SetTheme(ThemePreference),
    SetAutoUpdate(bool),
    AddToHistory(String),
    RemoveFromHistory(String),
    ClearHistory,
}

/// Apply an action to the preferences, returning the new value.
pub fn reduce(mut prefs: Preferences, action: PreferenceAction) -> Preferences {
    match action {
        PreferenceAction::SetTheme(theme) => prefs.theme = theme,
        PreferenceAction::SetAutoUpdate(enabled) => prefs.auto_update = enabled,
        PreferenceAction::AddToHistory(city) => {
            if !prefs.search_history.contains(&city) {
                prefs.search_history.push(city);
            }
        }
        PreferenceAction::RemoveFromHistory(city) => prefs.search_history.retain(|c| *c != city),
        PreferenceAction::ClearHistory => prefs.search_history.clear(),
    }
    prefs
}

/// JSON file holding [`Preferences`].
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Read preferences; a missing file yields the defaults.
    pub fn load(&self) -> Result<Preferences> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no preferences file, using defaults");
            return Ok(Preferences::default());
        }
        let text = fs::read_to_string(&self.path)?;
        serde_json::from_str(&text).map_err(|e| {
            WeatherError::Storage(format!("{}: {e}", self.path.display()))
        })
    }

    pub fn save(&self, prefs: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(prefs)
            .map_err(|e| WeatherError::Storage(e.to_string()))?;
        fs::write(&self.path, text)?;
        Ok(())
    }

    /// Load, apply `action`, save, and return the result.
    pub fn update(&self, action: PreferenceAction) -> Result<Preferences> {
        let prefs = reduce(self.load()?, action);
        self.save(&prefs)?;
        Ok(prefs)
    }
}

/// Identifies one dashboard load; later requests get larger tickets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

/// What the dashboard currently shows.
///
/// Overlapping loads are resolved by ticket: a response older than the last
/// applied one is dropped, so a slow earlier search cannot overwrite a newer one.
#[derive(Debug, Default)]
pub struct DashboardState {
    pub snapshot: Option<DashboardSnapshot>,
    pub error: Option<String>,
    pub loading: bool,
    next_ticket: u64,
    applied: Option<RequestTicket>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_request(&mut self) -> RequestTicket {
        self.next_ticket += 1;
        self.loading = true;
        self.error = None;
        RequestTicket(self.next_ticket)
    }

    /// Apply a finished load. Returns `false` when the response was stale and
    /// ignored.
    ///
    /// On success the resolved city is added to `prefs` history. On failure
    /// the previous snapshot stays and the user message is recorded.
    pub fn finish(
        &mut self,
        ticket: RequestTicket,
        result: Result<DashboardSnapshot>,
        prefs: &mut Preferences,
    ) -> bool {
        if self.applied.is_some_and(|applied| ticket < applied) {
            debug!(?ticket, "discarding stale response");
            return false;
        }
        self.applied = Some(ticket);
        if ticket.0 == self.next_ticket {
            self.loading = false;
        }
        match result {
            Ok(snapshot) => {
                *prefs = reduce(
                    std::mem::take(prefs),
                    PreferenceAction::AddToHistory(snapshot.current.name.clone()),
                );
                self.snapshot = Some(snapshot);
                self.error = None;
            }
            Err(e) => {
                warn!(error = %e, "dashboard load failed");
                self.error = Some(e.user_message());
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_resolution_by_hour() {
        let auto = ThemePreference::Automatic;
        assert_eq!(auto.resolve(6), ThemePreference::Morning);
        assert_eq!(auto.resolve(11), ThemePreference::Morning);
        assert_eq!(auto.resolve(12), ThemePreference::Afternoon);
        assert_eq!(auto.resolve(17), ThemePreference::Afternoon);
        assert_eq!(auto.resolve(18), ThemePreference::Night);
        assert_eq!(auto.resolve(5), ThemePreference::Night);
        assert_eq!(ThemePreference::Night.resolve(9), ThemePreference::Night);
    }

    #[test]
    fn theme_serializes_with_stored_names() {
        let json = serde_json::to_string(&ThemePreference::Afternoon).unwrap();
        assert_eq!(json, "\"tarde\"");
        let back: ThemePreference = serde_json::from_str("\"automatico\"").unwrap();
        assert_eq!(back, ThemePreference::Automatic);
    }

    #[test]
    fn theme_names_round_trip() {
        for theme in [
            ThemePreference::Automatic,
            ThemePreference::Morning,
            ThemePreference::Afternoon,
            ThemePreference::Night,
        ] {
            assert_eq!(ThemePreference::from_name(theme.as_str()), Some(theme));
        }
        assert_eq!(ThemePreference::from_name("dia"), None);
    }

    #[test]
    fn partial_preferences_fill_defaults() {
        let prefs: Preferences = serde_json::from_str(r#"{"theme":"noite"}"#).unwrap();
        assert_eq!(prefs.theme, ThemePreference::Night);
        assert!(prefs.auto_update);
        assert!(prefs.search_history.is_empty());
    }
}
