mod config;
mod docx;
mod errors;
mod routes;
mod skills;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first so a malformed value fails before anything starts
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume skills API v{}", env!("CARGO_PKG_VERSION"));
    info!(
        max_upload_bytes = config.max_upload_bytes,
        "Upload limit configured"
    );

    let addr: SocketAddr = format!("{}:{}", config.bind_addr, config.port)
        .parse()
        .context("BIND_ADDR and PORT must form a valid socket address")?;

    let state = AppState { config };

    // The service is called from other local services, not browsers on fixed origins
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
