use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use satchel_api::config::ServerConfig;
use satchel_api::router::build_app_router;
use satchel_api::state::AppState;
use satchel_store::StoreManager;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "satchel_api=debug,satchel_store=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Embedded store startup ---
    // Strictly sequential: storage location, then the server process,
    // then the client pool; each step gates the next. A failure here is
    // fatal -- nothing downstream can function without the store.
    let store = StoreManager::new(config.store.clone());
    if let Err(e) = store.startup().await {
        tracing::error!(error = %e, "Store startup failed, aborting");
        std::process::exit(1);
    }
    tracing::info!("Embedded store ready");

    // --- Database migrations ---
    match store.pool().await {
        Ok(pool) => {
            if let Err(e) = satchel_db::run_migrations(&pool).await {
                tracing::error!(error = %e, "Failed to run database migrations, aborting");
                store.shutdown().await;
                std::process::exit(1);
            }
            tracing::info!("Database migrations applied");
        }
        Err(e) => {
            tracing::error!(error = %e, "Store reported ready but no pool available");
            std::process::exit(1);
        }
    }

    // --- App state & router ---
    let state = AppState {
        store: Arc::clone(&store),
        config: Arc::new(config.clone()),
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    // The listener binds only after the store is ready, so handlers
    // normally never observe NotReady; the readiness gate still guards
    // the drain window after shutdown begins.
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    let _ = tokio::time::timeout(
        std::time::Duration::from_secs(config.shutdown_timeout_secs),
        store.shutdown(),
    )
    .await;

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
