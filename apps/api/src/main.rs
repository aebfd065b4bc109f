mod analysis;
mod config;
mod documents;
mod errors;
mod letter;
mod llm_client;
mod models;
mod research;
mod routes;
mod session;
mod state;
mod storage;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Lettersmith v{}", env!("CARGO_PKG_VERSION"));

    // LLM client + candidate profile (missing profile aborts startup)
    let state = AppState::from_config(config.clone())?;
    info!(
        "LLM client initialized (model: {} at {})",
        state.llm.model(),
        state.llm.base_url()
    );
    info!(
        "User profile loaded from {}",
        config.user_profile_path.display()
    );

    if state.llm.list_models().await.is_err() {
        tracing::warn!(
            "Model server at {} is not reachable yet; requests will fail until it is",
            config.llm_base_url
        );
    }

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
