mod config;
mod errors;
mod form;
mod persistence;
mod routes;
mod sessions;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::persistence::InMemoryResumeStore;
use crate::routes::build_router;
use crate::sessions::{run_idle_sweeper, SessionStore};
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

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "New sessions start {}",
        if config.seed_entries {
            "with one blank entry per section"
        } else {
            "empty"
        }
    );

    let sessions = SessionStore::new();
    match config.session_idle_timeout {
        Some(max_idle) => {
            info!("Idle sessions expire after {}s", max_idle.as_secs());
            tokio::spawn(run_idle_sweeper(sessions.clone(), max_idle));
        }
        None => info!("Session expiry disabled"),
    }

    let state = AppState {
        sessions,
        resumes: Arc::new(InMemoryResumeStore::default()),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
