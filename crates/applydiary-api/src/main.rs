//! applydiary-api - HTTP API server for ApplyDiary

use std::sync::Arc;

use tracing::{info, warn};

use applydiary_api::{build_router, init_tracing, AppState, Backends, ServerConfig};
use applydiary_core::GenerationBackend;
use applydiary_db::{Database, FilesystemBackend, PoolConfig};
use applydiary_inference::OpenAIBackend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let _log_guard = init_tracing();

    let config = ServerConfig::from_env()?;
    info!(
        subsystem = "api",
        app_env = ?config.app_env,
        upload_dir = %config.upload_dir.display(),
        max_upload_bytes = config.max_upload_bytes,
        "Configuration loaded"
    );

    info!("Connecting to database...");
    let db = Database::connect_with_config(&config.database_url, PoolConfig::from_env()).await?;
    info!("Running database migrations...");
    db.migrate().await?;
    info!("Database ready");

    let blobs = FilesystemBackend::new(&config.upload_dir);
    blobs.ensure_dir().await?;

    let generator: Option<Arc<dyn GenerationBackend>> = match config.openai.clone() {
        Some(openai) => {
            let backend = OpenAIBackend::new(openai)?;
            info!(model = backend.model_name(), "Generation backend configured");
            Some(Arc::new(backend))
        }
        None => {
            warn!("OPENAI_API_KEY not set, follow-up drafts are disabled");
            None
        }
    };

    let state = AppState::new(
        &config,
        Backends {
            repos: db.repositories(),
            blobs: Arc::new(blobs),
            generator,
        },
    )?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("Starting server on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Shut down cleanly");
    Ok(())
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C signal, initiating shutdown"),
        _ = terminate => info!("Received SIGTERM signal, initiating shutdown"),
    }
}
