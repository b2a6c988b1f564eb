mod backend;
mod config;
mod dashboard;
mod errors;
mod feedback;
mod local_store;
mod models;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::backend::HttpBackend;
use crate::config::Config;
use crate::dashboard::fixtures::mock_catalog;
use crate::dashboard::loader::load_pipeline;
use crate::dashboard::Dashboard;
use crate::local_store::LocalStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting pipeline dashboard v{}", env!("CARGO_PKG_VERSION"));

    let local_store = LocalStore::open(&config.local_store_path)?;
    info!("Local store at {}", config.local_store_path.display());

    let backend = HttpBackend::new(
        &config.api_base,
        config.recruiter_id,
        Duration::from_secs(config.backend_timeout_secs),
    )?;
    info!(
        "Recruiting backend: {} (recruiter {})",
        config.api_base, config.recruiter_id
    );

    // Initial load; each dataset falls back to the bundled mock data
    let mock = mock_catalog()?;
    let data = load_pipeline(&backend, &mock, None).await;
    let dashboard = Dashboard::new(data, mock.availability.clone());

    let state = AppState {
        backend: Arc::new(backend),
        dashboard: Arc::new(Mutex::new(dashboard)),
        local_store: Arc::new(local_store),
        mock: Arc::new(mock),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the dashboard UI has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
