use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use ecobot_server::config::Settings;
use ecobot_server::services::{
    FallbackContent, GeminiService, InMemorySessionStore, LlmProvider, SessionStore,
};
use ecobot_server::utils::limiters::Limiters;
use ecobot_server::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,ecobot_server=debug,tower_http=info".to_string()),
        )
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .init();

    info!("🚀 Starting EcoBot server...");

    // Load configuration; a missing API key stops startup here
    let settings = Settings::load()?;
    info!(model = %settings.gemini.model, "✅ Configuration loaded");

    let limiters = Arc::new(Limiters::new(&settings.limits));
    let provider: Arc<dyn LlmProvider> =
        Arc::new(GeminiService::new(settings.gemini.clone(), limiters)?);

    let fallback = Arc::new(FallbackContent::load(settings.content.fallback_path.as_deref())?);
    info!(version = fallback.version, "✅ Fallback content loaded");

    let store = InMemorySessionStore::new(Duration::from_secs(settings.session.ttl_seconds));
    store.spawn_sweeper(Duration::from_secs(settings.session.sweep_interval_seconds));
    let sessions: Arc<dyn SessionStore> = Arc::new(store);

    let addr = SocketAddr::from((
        settings.server.host.parse::<std::net::IpAddr>()?,
        settings.server.port,
    ));

    let state = AppState::new(settings, provider, sessions, fallback)?;
    let app = build_router(state);

    info!("🎯 Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
