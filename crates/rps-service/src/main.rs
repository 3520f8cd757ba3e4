//! RPS Registry Service
//!
//! Serves a commit-reveal Rock-Paper-Scissors registry over HTTP.

use rps_service::{app, AppState, ServiceConfig};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServiceConfig::from_env();
    if config.simulated_clock {
        tracing::info!("Simulated clock enabled (POST /api/system/tick to advance)");
    } else {
        tracing::info!("Using system clock (set RPS_SIMULATED_CLOCK=1 for simulated time)");
    }

    let state = AppState::new(config.registry.clone(), config.simulated_clock)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(
        entry_fee = config.registry.entry_fee,
        "RPS registry starting on http://{}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;
    Ok(())
}
