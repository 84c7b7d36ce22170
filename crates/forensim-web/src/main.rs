//! Forensim Web Server
//!
//! Run with: cargo run -p forensim-web
//!
//! Reads `$FORENSIM_CONFIG` (YAML) when set; `RUST_LOG` controls log output.

use std::net::SocketAddr;

use anyhow::Context;
use forensim_common::config::AnalysisConfig;
use forensim_ingest::load_dataset;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Forensim Web Server...");

    let config = AnalysisConfig::from_env().context("Failed to load configuration")?;

    let data = config.data.clone();
    let dataset = tokio::task::spawn_blocking(move || load_dataset(&data))
        .await?
        .context("Failed to load dataset")?;

    // Create app state
    let state = forensim_web::state::AppState::new(
        dataset,
        config.similarity.clone(),
        config.server.memo_capacity,
    );

    // Build router
    let app = forensim_web::router::build_router(state);

    // Bind to port
    let host = config.server.bind_host();
    let addr: SocketAddr = format!("{}:{}", host, config.server.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", host, config.server.port))?;
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
