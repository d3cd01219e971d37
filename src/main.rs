//! FlightSurety Oracle Server
//!
//! Registers test accounts as oracles, listens for oracle requests from the
//! FlightSurety app contract, simulates their responses, and exposes the
//! dapp API.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use flightsurety_oracles::config::OracleConfig;
use flightsurety_oracles::routes;
use flightsurety_oracles::supervisor::ChainSupervisor;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Arc::new(OracleConfig::from_env().context("failed to load oracle config")?);
    info!(
        node = %config.node_url,
        app = ?config.app_address,
        oracle_cap = config.oracle_cap,
        auto_respond = config.auto_respond,
        "Oracle configuration loaded"
    );

    // Chain work is supervised separately so the API stays up without a node.
    tokio::spawn(ChainSupervisor::new(config.clone()).run());

    let app = routes::app(&config.cors_allowed_origins);
    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));

    info!("Server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
