//! weather-dashboard binary
//!
//! Thin CLI wrapper around the library. Sets up logging, parses arguments and
//! invokes `weather_dashboard::run`.

use anyhow::Result;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = weather_dashboard::Cli::parse(env::args().skip(1))?;
    weather_dashboard::run(cli).await
}
