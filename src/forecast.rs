//! Forecast aggregation
//!
//! Turns the provider's 3-hour forecast feed into a short hourly preview and a
//! per-day summary (min/max temperature and the most frequent icon).

use std::collections::HashMap;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, Utc};

use crate::error::{Result, WeatherError};
use crate::types::{
    DailyForecastEntry, ForecastData, ForecastResp, ForecastSample, ForecastSeries,
    HourlyForecastEntry,
};

/// Number of samples shown in the hourly preview.
pub const HOURLY_SLICE_LEN: usize = 5;
/// Upper bound on daily entries.
pub const DAILY_MAX_DAYS: usize = 7;

const WEEKDAY_LABELS: [&str; 7] = ["Dom.", "Seg.", "Ter.", "Qua.", "Qui.", "Sex.", "Sáb."];

/// How samples are assigned to days.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DayGrouping {
    /// Group by local calendar date.
    #[default]
    CalendarDate,
    /// Group by the short weekday label. Samples exactly a week apart share a
    /// label and therefore merge into one entry.
    WeekdayLabel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum DayKey {
    Date(NaiveDate),
    Label(&'static str),
}

struct DayAccumulator {
    label: &'static str,
    date: NaiveDate,
    min: f64,
    max: f64,
    icons: Vec<String>,
}

/// Offset in seconds east of UTC; out-of-range values fall back to UTC.
pub fn fixed_offset(seconds: i32) -> FixedOffset {
    FixedOffset::east_opt(seconds).unwrap_or_else(|| Utc.fix())
}

fn local_time(timestamp: i64, offset: FixedOffset) -> DateTime<FixedOffset> {
    DateTime::from_timestamp(timestamp, 0)
        .unwrap_or_default()
        .with_timezone(&offset)
}

/// Capitalized pt-BR short weekday label for a timestamp, e.g. "Ter.".
pub fn weekday_label(timestamp: i64, offset: FixedOffset) -> &'static str {
    let idx = local_time(timestamp, offset)
        .weekday()
        .num_days_from_sunday() as usize;
    WEEKDAY_LABELS[idx]
}

/// Convert the provider payload into a [`ForecastSeries`].
///
/// Provider order is kept as-is. An element without a weather entry or with an
/// unrepresentable timestamp makes the whole payload malformed.
pub fn parse_forecast(api: ForecastResp) -> Result<ForecastSeries> {
    let utc_offset = api.city.and_then(|c| c.timezone).unwrap_or(0);
    let mut samples = Vec::with_capacity(api.list.len());
    for (i, item) in api.list.into_iter().enumerate() {
        if DateTime::from_timestamp(item.dt, 0).is_none() {
            return Err(WeatherError::MalformedResponse(format!(
                "list[{i}].dt out of range: {}",
                item.dt
            )));
        }
        let icon = item
            .weather
            .into_iter()
            .next()
            .map(|w| w.icon)
            .ok_or_else(|| WeatherError::MalformedResponse(format!("list[{i}].weather is empty")))?;
        samples.push(ForecastSample {
            timestamp: item.dt,
            temp: item.main.temp,
            temp_min: item.main.temp_min,
            temp_max: item.main.temp_max,
            icon,
        });
    }
    Ok(ForecastSeries {
        samples,
        utc_offset,
    })
}

/// First `n` samples as display entries, in provider order.
pub fn slice_hourly(
    samples: &[ForecastSample],
    n: usize,
    offset: FixedOffset,
) -> Vec<HourlyForecastEntry> {
    samples
        .iter()
        .take(n)
        .map(|s| HourlyForecastEntry {
            time: local_time(s.timestamp, offset).format("%H:%M").to_string(),
            temp: s.temp,
            icon: s.icon.clone(),
        })
        .collect()
}

/// Most frequent icon; on a tie the one seen first wins.
pub fn representative_icon(icons: &[String]) -> Option<&str> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for icon in icons {
        match counts.iter_mut().find(|(i, _)| *i == icon.as_str()) {
            Some((_, c)) => *c += 1,
            None => counts.push((icon.as_str(), 1)),
        }
    }
    let mut best: Option<(&str, usize)> = None;
    for (icon, count) in counts {
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((icon, count)),
        }
    }
    best.map(|(icon, _)| icon)
}

/// Group samples into days and reduce each day to min/max temperature and a
/// representative icon.
///
/// Days keep the order in which they first appear in `samples`; anything past
/// `max_days` is dropped.
pub fn aggregate_daily(
    samples: &[ForecastSample],
    max_days: usize,
    offset: FixedOffset,
    grouping: DayGrouping,
) -> Vec<DailyForecastEntry> {
    let mut days: Vec<DayAccumulator> = Vec::new();
    let mut index: HashMap<DayKey, usize> = HashMap::new();

    for s in samples {
        let local = local_time(s.timestamp, offset);
        let label = weekday_label(s.timestamp, offset);
        let key = match grouping {
            DayGrouping::CalendarDate => DayKey::Date(local.date_naive()),
            DayGrouping::WeekdayLabel => DayKey::Label(label),
        };

        match index.get(&key) {
            Some(&i) => {
                let day = &mut days[i];
                day.min = day.min.min(s.temp_min);
                day.max = day.max.max(s.temp_max);
                day.icons.push(s.icon.clone());
            }
            None => {
                index.insert(key, days.len());
                days.push(DayAccumulator {
                    label,
                    date: local.date_naive(),
                    min: s.temp_min,
                    max: s.temp_max,
                    icons: vec![s.icon.clone()],
                });
            }
        }
    }

    days.into_iter()
        .take(max_days)
        .map(|d| DailyForecastEntry {
            day: d.label.to_string(),
            date: d.date,
            min_temp: d.min,
            max_temp: d.max,
            icon: representative_icon(&d.icons).unwrap_or_default().to_string(),
        })
        .collect()
}

/// Hourly preview and daily summary of a series, in the series' local offset.
pub fn aggregate(series: &ForecastSeries, grouping: DayGrouping) -> ForecastData {
    let offset = fixed_offset(series.utc_offset);
    ForecastData {
        hourly: slice_hourly(&series.samples, HOURLY_SLICE_LEN, offset),
        daily: aggregate_daily(&series.samples, DAILY_MAX_DAYS, offset, grouping),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn icons(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn representative_icon_majority() {
        assert_eq!(representative_icon(&icons(&["01d", "02d", "01d"])), Some("01d"));
    }

    #[test]
    fn representative_icon_tie_first_seen() {
        assert_eq!(representative_icon(&icons(&["04d", "10d", "10d", "04d"])), Some("04d"));
        assert_eq!(representative_icon(&icons(&["10d", "04d"])), Some("10d"));
    }

    #[test]
    fn representative_icon_empty() {
        assert_eq!(representative_icon(&[]), None);
    }

    #[test]
    fn weekday_labels_follow_offset() {
        // 2023-10-10 23:00 UTC is a Tuesday, but already Wednesday at UTC+3.
        let ts = 1696978800;
        assert_eq!(weekday_label(ts, fixed_offset(0)), "Ter.");
        assert_eq!(weekday_label(ts, fixed_offset(3 * 3600)), "Qua.");
    }

    #[test]
    fn fixed_offset_out_of_range_is_utc() {
        assert_eq!(fixed_offset(100_000).local_minus_utc(), 0);
        assert_eq!(fixed_offset(-10_800).local_minus_utc(), -10_800);
    }
}
