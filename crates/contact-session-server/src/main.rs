use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info};

use contact_session_server::config::Settings;
use contact_session_server::security::RateLimiter;
use contact_session_server::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,contact_session_server=debug".to_string()),
        )
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .init();

    info!("🚀 Starting contact session server...");

    // Load configuration
    let settings = Settings::load()?;
    info!("✅ Configuration loaded");

    let addr = SocketAddr::from((
        settings.server.host.parse::<std::net::IpAddr>()?,
        settings.server.port,
    ));
    let sweep_every = settings.limits.rate_sweep_interval();

    // Session store + services
    let state = AppState::from_settings(settings).await?;
    info!(
        "✅ Session store ready at {}",
        state.store.base_dir().display()
    );

    spawn_rate_limit_sweeper(state.rate_limiter.clone(), sweep_every);

    let app = build_router(state);

    info!("🎯 Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

/// Evict idle client windows so the limiter does not grow with every IP seen.
fn spawn_rate_limit_sweeper(limiter: Arc<RateLimiter>, every: std::time::Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let removed = limiter.sweep();
            debug!(
                "Rate limiter sweep: removed={}, tracked={}",
                removed,
                limiter.tracked_clients()
            );
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
