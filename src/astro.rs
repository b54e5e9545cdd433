//! Solar-cycle arc position and moon-phase estimate.

use std::f64::consts::PI;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Mean synodic month in seconds (about 29.53 days).
pub const LUNAR_PERIOD_SECS: i64 = 2_551_443;
/// A known new moon: 1970-01-07 20:35:00 UTC.
pub const REFERENCE_NEW_MOON: i64 = 592_500;

/// Radius of the drawn arc; the arc box is `2r` wide and `r` tall.
const ARC_RADIUS: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SolarPosition {
    /// 0 at sunrise, 1 at sunset.
    pub progress: f64,
    pub x: f64,
    pub y: f64,
    pub is_daytime: bool,
}

/// Where the sun sits on a semicircle running from sunrise (left) to sunset
/// (right). Times are epoch seconds.
pub fn solar_position(sunrise: i64, sunset: i64, now: i64) -> SolarPosition {
    let progress = if now <= sunrise {
        0.0
    } else if now >= sunset {
        1.0
    } else {
        (now - sunrise) as f64 / (sunset - sunrise) as f64
    };
    let angle = PI - progress * PI;
    SolarPosition {
        progress,
        x: ARC_RADIUS + ARC_RADIUS * angle.cos(),
        y: ARC_RADIUS - ARC_RADIUS * angle.sin(),
        is_daytime: now >= sunrise && now <= sunset,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MoonPhaseName {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhaseName {
    fn from_fraction(phase: f64) -> Self {
        match phase {
            p if p <= 0.03 || p > 0.97 => Self::NewMoon,
            p if p <= 0.23 => Self::WaxingCrescent,
            p if p <= 0.27 => Self::FirstQuarter,
            p if p <= 0.47 => Self::WaxingGibbous,
            p if p <= 0.53 => Self::FullMoon,
            p if p <= 0.73 => Self::WaningGibbous,
            p if p <= 0.77 => Self::LastQuarter,
            _ => Self::WaningCrescent,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NewMoon => "Lua Nova",
            Self::WaxingCrescent => "Lua Crescente Côncava",
            Self::FirstQuarter => "Quarto Crescente",
            Self::WaxingGibbous => "Lua Crescente Convexa",
            Self::FullMoon => "Lua Cheia",
            Self::WaningGibbous => "Lua Minguante Convexa",
            Self::LastQuarter => "Quarto Minguante",
            Self::WaningCrescent => "Lua Minguante Côncava",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MoonPhase {
    pub name: MoonPhaseName,
    /// Position in the cycle, `0.0..1.0`, new moon at 0.
    pub fraction: f64,
    /// Approximate lit share of the disc, 0–100.
    pub illumination: f64,
}

pub fn moon_phase(at: DateTime<Utc>) -> MoonPhase {
    let elapsed = (at.timestamp() - REFERENCE_NEW_MOON).rem_euclid(LUNAR_PERIOD_SECS);
    let fraction = elapsed as f64 / LUNAR_PERIOD_SECS as f64;
    MoonPhase {
        name: MoonPhaseName::from_fraction(fraction),
        fraction,
        illumination: (1.0 - (2.0 * PI * fraction).cos()) / 2.0 * 100.0,
    }
}
