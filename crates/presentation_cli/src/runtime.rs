//! Long-running mode: a hub refreshed on cron schedules
//!
//! SIGHUP reloads the configuration and replaces the running hub with a new
//! one. An invalid reload leaves the running hub untouched.

use std::{path::Path, sync::Arc};

use application::{ApplicationError, WeatherHub};
use infrastructure::{
    AppConfig, QWeatherAdapter, ScheduleConfig, SchedulerConfig, SchedulerError, TaskScheduler,
    schedule_weather_tasks,
};
use tokio::signal;
use tracing::{error, info, warn};

/// Build a hub for the configured location, without fetching anything
pub fn create_hub(config: &AppConfig) -> Result<Arc<WeatherHub>, ApplicationError> {
    let settings = config.validate()?;
    let adapter = QWeatherAdapter::new(config.api.clone(), &settings)?;
    Ok(Arc::new(WeatherHub::new(settings, Arc::new(adapter))))
}

fn startup_banner() -> String {
    let line = "-".repeat(70);
    format!(
        "\n{line}\nqweather\nVersion: {}\n{line}",
        env!("CARGO_PKG_VERSION")
    )
}

/// A hub together with the scheduler refreshing it
struct RunningHub {
    hub: Arc<WeatherHub>,
    scheduler: TaskScheduler,
}

impl RunningHub {
    /// Build the hub, fetch every data kind once, then schedule refreshes
    async fn start(config: &AppConfig) -> anyhow::Result<Self> {
        let hub = create_hub(config)?;
        hub.refresh_all().await;
        Self::schedule(hub, &config.schedule).await
    }

    /// Register the refresh tasks of `hub` on a fresh scheduler
    async fn schedule(hub: Arc<WeatherHub>, schedule: &ScheduleConfig) -> anyhow::Result<Self> {
        let scheduler = TaskScheduler::new(SchedulerConfig::default()).await?;
        if let Err(e) = schedule_weather_tasks(&scheduler, &hub, schedule).await {
            if let Err(stop_err) = scheduler.stop().await {
                warn!(error = %stop_err, "Failed to stop scheduler after scheduling error");
            }
            return Err(e.into());
        }

        info!(
            hub = %hub.name(),
            location = %hub.settings().location(),
            "Weather hub running"
        );
        Ok(Self { hub, scheduler })
    }

    async fn stop(self) -> Result<(), SchedulerError> {
        for stats in self.scheduler.get_all_stats() {
            info!(
                task = %stats.name,
                success = stats.success_count,
                failure = stats.failure_count,
                "Task summary"
            );
        }
        self.scheduler.stop().await
    }
}

/// Replace `current` with a hub built from the reloaded configuration
///
/// Returns `current` unchanged if the configuration cannot be loaded or is
/// invalid, or the new hub fails to start.
async fn restart(current: RunningHub, path: Option<&Path>) -> RunningHub {
    let config = match AppConfig::load(path) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to reload configuration, keeping running hub");
            return current;
        },
    };

    if let Err(e) = config.validate() {
        error!(error = %e, "Reloaded configuration is invalid, keeping running hub");
        return current;
    }

    match RunningHub::start(&config).await {
        Ok(next) => {
            if let Err(e) = current.stop().await {
                warn!(error = %e, "Failed to stop previous scheduler");
            }
            info!("Weather hub restarted");
            next
        },
        Err(e) => {
            error!(error = %e, "Failed to start reloaded hub, keeping running hub");
            current
        },
    }
}

#[cfg(unix)]
type ReloadSignal = Option<signal::unix::Signal>;

#[cfg(not(unix))]
type ReloadSignal = ();

#[cfg(unix)]
fn reload_signal() -> ReloadSignal {
    match signal::unix::signal(signal::unix::SignalKind::hangup()) {
        Ok(sighup) => Some(sighup),
        Err(e) => {
            error!("Failed to install SIGHUP handler: {}", e);
            None
        },
    }
}

#[cfg(not(unix))]
fn reload_signal() -> ReloadSignal {
    warn!("SIGHUP config reload not supported on this platform");
}

#[cfg(unix)]
async fn reload_requested(sighup: &mut ReloadSignal) {
    if let Some(sighup) = sighup {
        if sighup.recv().await.is_some() {
            return;
        }
    }
    std::future::pending::<()>().await;
}

#[cfg(not(unix))]
async fn reload_requested(_: &mut ReloadSignal) {
    std::future::pending::<()>().await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        () = terminate => {
            info!("Received SIGTERM, shutting down");
        }
    }
}

/// Run until Ctrl+C or SIGTERM, restarting on SIGHUP
///
/// # Errors
///
/// Fails if the initial configuration is invalid or the first hub cannot be
/// started.
pub async fn run(config: &AppConfig, path: Option<&Path>) -> anyhow::Result<()> {
    info!("{}", startup_banner());

    let mut running = RunningHub::start(config).await?;
    let mut sighup = reload_signal();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => break,
            () = reload_requested(&mut sighup) => {
                info!("Received SIGHUP, reloading configuration");
                running = restart(running, path).await;
            }
        }
    }

    running.stop().await?;
    info!("Weather hub stopped");
    Ok(())
}
