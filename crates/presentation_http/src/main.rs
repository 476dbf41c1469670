//! Geocoding gateway server
//!
//! Main entry point for the HTTP API server.

use std::{future::IntoFuture, sync::Arc, time::Duration};

use anyhow::Context;
use application::GeocodingService;
use axum::http::{HeaderValue, Method};
use infrastructure::{
    AppConfig, MokaCache, MokaCacheConfig, ServerConfig, init_tracing, spawn_cache_sweeper,
};
use presentation_http::{AppState, create_router};
use tokio::{net::TcpListener, signal};
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.server.log_format).context("failed to initialize tracing")?;
    config.validate().context("invalid configuration")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        provider = %config.geocoding.provider,
        "🌍 Starting geocoding gateway"
    );

    let provider = integration_geocoding::create_provider(&config.geocoding.to_geocoding_config())
        .context("failed to create geocoding provider")?;

    let cache = Arc::new(MokaCache::with_config(MokaCacheConfig {
        max_entries: config.cache.max_entries,
        hard_ttl: config.cache.cleanup_interval(),
    }));
    let service = GeocodingService::new(provider, cache.clone(), config.cache.ttl());

    let shutdown = CancellationToken::new();
    let sweeper = spawn_cache_sweeper(cache, config.cache.cleanup_interval(), shutdown.clone());

    let app = create_router(AppState::new(service))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.server));

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("🚀 Server listening on http://{}", addr);

    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            shutdown_signal().await;
            shutdown.cancel();
        }
    });

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .into_future();

    let drain_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);
    let drain_deadline = {
        let shutdown = shutdown.clone();
        async move {
            shutdown.cancelled().await;
            info!("⏳ Waiting up to {:?} for connections to close...", drain_timeout);
            tokio::time::sleep(drain_timeout).await;
        }
    };

    tokio::select! {
        result = server => result.context("server error")?,
        () = drain_deadline => warn!("Shutdown timeout elapsed with open connections"),
    }

    shutdown.cancel();
    if let Err(e) = sweeper.await {
        warn!(error = %e, "Cache sweeper task failed");
    }

    info!("👋 Server shutdown complete");
    Ok(())
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    if server.allowed_origins.is_empty() {
        // Development mode: allow all origins
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = server
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any)
    }
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("📥 Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("📥 Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
