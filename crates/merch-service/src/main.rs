//! Merch Shop Service - HTTP API for the internal merch shop
//!
//! This is the main entry point for the merch-service binary.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use merch_service::{create_router, AppState, ServiceConfig, TokenAuthority};
use merch_store::{MemoryStore, PgStore, Store};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,merch=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Merch Shop Service");

    // Load configuration from environment
    let config = ServiceConfig::from_env()?;

    tracing::info!(
        listen_addr = %config.listen_addr(),
        memory_store = %config.uses_memory_store(),
        token_ttl_hours = config.token_ttl_hours,
        "Service configuration loaded"
    );

    let tokens = Arc::new(TokenAuthority::from_base64_pem(
        &config.private_key,
        &config.public_key,
        config.token_ttl(),
    )?);

    // Initialize store
    let mut pg_store = None;
    let store: Arc<dyn Store> = if config.uses_memory_store() {
        tracing::warn!("Using in-memory store; state is lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        tracing::info!(
            max_connections = config.database_max_connections,
            "Connecting to PostgreSQL"
        );
        let pg = PgStore::connect(&config.database_url, config.database_max_connections).await?;
        pg.migrate().await?;
        pg_store = Some(pg.clone());
        Arc::new(pg)
    };

    let grace = Duration::from_secs(config.shutdown_grace_seconds);
    let listen_addr = config.listen_addr();

    // Build app state and router
    let state = AppState::new(store, tokens, config);
    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    // Start HTTP server
    tracing::info!(listen_addr = %listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        result = &mut server => {
            result??;
            return Ok(());
        }
        () = shutdown_signal() => {}
    }

    tracing::info!(grace_seconds = grace.as_secs(), "Shutdown signal received, draining requests");
    let _ = stop_tx.send(());

    match tokio::time::timeout(grace, &mut server).await {
        Ok(result) => {
            result??;
            tracing::info!("Server stopped");
        }
        Err(_) => {
            tracing::warn!("Grace period elapsed, closing remaining connections");
            server.abort();
        }
    }

    if let Some(pg) = pg_store {
        pg.close().await;
    }

    Ok(())
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
