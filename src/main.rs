use anyhow::Context;
use tracing::info;

use kinodex::config::Settings;
use kinodex::database::{MovieStore, UserStore};
use kinodex::{create_app, db, storage, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "kinodex=info,tower_http=debug".into()),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let settings = Settings::load().context("Failed to load application settings")?;

    let database = db::connect(&settings)
        .await
        .context("Failed to connect to MongoDB")?;
    info!("database connection established");

    let movies = MovieStore::new(&database);
    let users = UserStore::new(&database);
    users
        .ensure_indexes()
        .await
        .context("Failed to create database indexes")?;

    let storage = storage::from_settings(&settings.storage)
        .await
        .context("Failed to initialize blob storage")?;
    if let Err(e) = storage.health_check().await {
        tracing::warn!("storage health check failed: {e:#}");
    }

    let state = AppState {
        movies,
        users,
        config: settings.clone(),
        storage,
    };

    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(settings.server.address())
        .await
        .context("Failed to bind to server address")?;
    info!("listening on {}", settings.server.address());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("shutdown completed");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("received terminate signal, starting graceful shutdown");
        },
    }
}
