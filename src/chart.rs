//! Hourly temperature chart rendered to SVG.

use std::path::Path;

use plotters::prelude::*;

use crate::error::{Result, WeatherError};
use crate::types::HourlyForecastEntry;

fn chart_err<E: std::fmt::Display>(e: E) -> WeatherError {
    WeatherError::Chart(e.to_string())
}

/// Draw the hourly temperatures as a line chart, one point per entry.
pub fn render_temperature_chart(entries: &[HourlyForecastEntry], path: &Path) -> Result<()> {
    if entries.is_empty() {
        return Err(WeatherError::Chart("no hourly data to plot".into()));
    }
    let n = entries.len();
    let (lo, hi) = entries
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), e| (lo.min(e.temp), hi.max(e.temp)));

    let root = SVGBackend::new(path, (640, 320)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(16)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), (lo - 2.0)..(hi + 2.0))
        .map_err(chart_err)?;

    let label_for = |x: &f64| {
        let i = x.round();
        if (x - i).abs() < 1e-6 && i >= 0.0 && (i as usize) < n {
            entries[i as usize].time.clone()
        } else {
            String::new()
        }
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&label_for)
        .y_desc("Temperatura (°C)")
        .draw()
        .map_err(chart_err)?;

    let points = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (i as f64, e.temp));
    chart
        .draw_series(LineSeries::new(points.clone(), &BLUE))
        .map_err(chart_err)?;
    chart
        .draw_series(points.map(|p| Circle::new(p, 3, BLUE.filled())))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}
