//! Restaurant Cache - a restaurant catalogue service with a cache-aside layer
//!
//! Serves restaurant reads through a TTL/LRU cache and invalidates cached
//! entries on every write.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use restaurant_cache::api::create_router;
use restaurant_cache::source::InMemorySource;
use restaurant_cache::{spawn_cleanup_task, AppState, Config};

/// Main entry point for the restaurant service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration from environment variables
/// 3. Create the data source and the cache in front of it
/// 4. Start background TTL cleanup task
/// 5. Serve HTTP until SIGINT/SIGTERM
/// 6. Stop the cleanup task and drain the cache
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "restaurant_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting restaurant service");

    let config = Config::from_env();
    config
        .validate()
        .map_err(|msg| anyhow!(msg))
        .context("invalid configuration")?;
    info!(
        "Configuration loaded: max_entries={}, port={}, cleanup_interval={}s, ttls(list={}s, detail={}s, search={}s, active={}s), source_latency={}ms",
        config.max_entries,
        config.server_port,
        config.cleanup_interval,
        config.list_ttl,
        config.detail_ttl,
        config.search_ttl,
        config.active_ttl,
        config.source_latency_ms
    );

    let source = Arc::new(InMemorySource::new().with_latency(config.source_latency()));
    let state = AppState::from_config(&config, source);
    let cache = state.cache.clone();
    info!("Cache initialized");

    let cleanup_handle = spawn_cleanup_task(
        cache.clone(),
        Duration::from_secs(config.cleanup_interval),
    );

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    cleanup_handle.abort();
    warn!("Cleanup task aborted");
    cache.drain().await;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
