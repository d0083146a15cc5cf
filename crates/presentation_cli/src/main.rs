//! QWeather CLI
//!
//! Fetches weather data for one configured location and prints it as JSON,
//! or keeps a hub refreshing on its cron schedules until interrupted.

#![allow(clippy::print_stdout)]

mod runtime;

use std::path::PathBuf;

use anyhow::Context;
use application::{ApplicationError, WeatherPort};
use clap::{Parser, Subcommand};
use infrastructure::{AppConfig, QWeatherAdapter, init_tracing};
use serde::Serialize;

/// QWeather CLI
#[derive(Parser)]
#[command(name = "qweather-cli")]
#[command(author, version, about = "QWeather (和风天气) weather hub", long_about = None)]
struct Cli {
    /// Verbosity level (overrides the configured log filter)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (default: ./config.toml if present)
    #[arg(short, long, env = "QWEATHER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration without contacting QWeather
    Validate,

    /// Print the current observation
    Now,

    /// Print the hourly forecast
    Hourly,

    /// Print the day/night forecast records
    Daily,

    /// Fetch everything once and print the hub snapshot
    Snapshot,

    /// Keep refreshing on schedule until interrupted
    ///
    /// SIGHUP reloads the configuration and restarts the hub.
    Run,
}

/// Log filter override for a verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("debug"),
        _ => Some("trace"),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Render a validation failure with one line per field
fn describe_error(err: &ApplicationError) -> String {
    match err {
        ApplicationError::InvalidSettings(fields) => fields
            .iter()
            .map(|(field, code)| format!("  hub.{field}: {code}"))
            .collect::<Vec<_>>()
            .join("\n"),
        other => format!("  {other}"),
    }
}

fn create_adapter(config: &AppConfig) -> anyhow::Result<QWeatherAdapter> {
    let settings = config.validate()?;
    Ok(QWeatherAdapter::new(config.api.clone(), &settings)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(filter) = log_filter_from_verbosity(cli.verbose) {
        config.logging.filter = filter.to_string();
    }
    init_tracing(&config.logging)?;

    match cli.command {
        Commands::Validate => match config.validate() {
            Ok(settings) => {
                println!(
                    "Configuration OK: {} (location {})",
                    settings.location_name(),
                    settings.location()
                );
            },
            Err(e) => {
                println!("Configuration invalid:\n{}", describe_error(&e));
                anyhow::bail!("invalid configuration");
            },
        },

        Commands::Now => {
            let current = create_adapter(&config)?.fetch_current().await?;
            print_json(&current)?;
        },

        Commands::Hourly => {
            let points = create_adapter(&config)?.fetch_hourly().await?;
            print_json(&points)?;
        },

        Commands::Daily => {
            let points = create_adapter(&config)?.fetch_daily().await?;
            print_json(&points)?;
        },

        Commands::Snapshot => {
            let hub = runtime::create_hub(&config)?;
            let failed = hub.refresh_all().await;
            print_json(&hub.snapshot())?;
            if failed > 0 {
                anyhow::bail!("{failed} of 3 weather refreshes failed");
            }
        },

        Commands::Run => {
            runtime::run(&config, cli.config.as_deref()).await?;
        },
    }

    Ok(())
}
