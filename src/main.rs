// main.rs
mod color;
mod commands;
mod config;
mod devices;
mod error;
mod fleet;
mod handlers;
mod metrics;
mod models;
mod motion;
mod page;
mod utils;

use fleet::Fleet;
use models::AppState;
use motion::{MotionWatch, SysfsMotionSensor};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = config::Settings::new()
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    if settings.metrics.enabled {
        metrics::setup_metrics(settings.metrics.port)
            .map_err(|e| anyhow::anyhow!("Failed to setup metrics: {}", e))?;
        tracing::info!("Metrics exporter on port {}", settings.metrics.port);
    }

    let sensor = SysfsMotionSensor::export(&settings.sensor.gpio_root, settings.sensor.pin)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to setup motion sensor: {}", e))?;

    let fleet = Arc::new(Fleet::kasa(&settings.bulbs.addresses));
    fleet.refresh_all().await;
    for bulb in fleet.bulbs() {
        tracing::info!(host = bulb.host(), state = ?bulb.state().await, "Bulb");
    }

    let (watch, motion) = MotionWatch::new(
        sensor,
        fleet.clone(),
        settings.sensor.poll_interval(),
        settings.sensor.hold(),
    );
    let watch_task = tokio::spawn(watch.run());

    let state = Arc::new(AppState::new(fleet, motion));
    let app = handlers::router(state);

    let listener = tokio::net::TcpListener::bind(&settings.server.address)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind address: {}", e))?;

    tracing::info!("Server started on {}", settings.server.address);

    axum::serve(listener, app)
        .with_graceful_shutdown(utils::shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    utils::stop_motion_watch(watch_task);
    Ok(())
}
