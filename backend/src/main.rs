//! Tailoring Orders Platform - Backend Server
//!
//! Serves order placement, piece lookup and repeat orders for tailoring
//! workshops.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tailor_backend::{create_app, services::InMemoryOrderStore, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tailor_server=debug,tailor_backend=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Tailoring Orders Server");
    tracing::info!("Environment: {}", config.environment);

    // Create the order store
    let store = match &config.store.seed_path {
        Some(path) => InMemoryOrderStore::load_seed(path)
            .with_context(|| format!("loading order store seed {}", path))?,
        None => {
            tracing::info!("No seed configured, starting with an empty order store");
            InMemoryOrderStore::new()
        }
    };

    // Create application state
    let state = AppState::new(Arc::new(store), config.clone());

    // Build application
    let app = create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("invalid listen address {}", config.server.host))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
