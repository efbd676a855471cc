use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inventory_service::{
    api,
    config::{Cli, Config},
    file_store::LocalFileStore,
    storage::{create_pool, PgItemRepository},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Exits with a usage message when a required flag is missing
    let cli = Cli::parse();

    // Initialize tracing
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    match log_format.to_lowercase().as_str() {
        "gcp" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_stackdriver::layer())
                .init();
        }
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_span_list(false),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    info!(version = env!("CARGO_PKG_VERSION"), "inventory-service starting");

    // Load configuration
    let config = Config::load(cli)?;

    // Ensure the cache directory exists
    let files = LocalFileStore::new(&config.cache_dir)?;
    info!("Using cache directory at: {}", files.base_path().display());

    // Connections are opened on first query
    let pool = create_pool(&config.database);
    info!(
        max_connections = config.database.max_connections,
        "Database pool configured"
    );

    let state = Arc::new(AppState {
        config: config.clone(),
        items: Arc::new(PgItemRepository::new(pool.clone())),
        files: Arc::new(files),
    });

    // Build and start the HTTP server
    let app = api::create_router(Arc::clone(&state));
    let listener = tokio::net::TcpListener::bind(config.server.bind_address()).await?;
    info!(
        "Server running at http://{}:{}",
        config.server.host, config.server.port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
