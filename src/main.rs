//! MDB Ingest Server - Binary Entry Point

use std::sync::Arc;

use mdb_ingest::{create_router, AppState, EventStore, ServerConfig, VERSION};
use tracing::info;
use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    init_tracing();

    let config = ServerConfig::from_env()?;
    let store = Arc::new(EventStore::open(config.store_config())?);
    let static_dir = config.static_dir();

    let state = Arc::new(AppState::new(Arc::clone(&store), config.server_name.clone()));
    let app = create_router(state, static_dir.clone());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("{} v{} listening on http://{}", config.server_name, VERSION, addr);
    info!("Data file: {} ({} records)", store.path().display(), store.count());
    match &static_dir {
        Some(dir) => info!("Static files: {}", dir.display()),
        None => info!("Static files: disabled ({} not found)", config.static_dir.display()),
    }
    info!("Endpoints:");
    info!("  GET    /api/health");
    info!("  POST   /automation");
    info!("  POST   /account");
    info!("  POST   /api/mdb/receive");
    info!("  GET    /api/mdb/data");
    info!("  GET    /api/mdb/data/latest");
    info!("  GET    /api/mdb/export");
    info!("  DELETE /api/mdb/data");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mdb_ingest=info,mdb_server=info,tower_http=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Resolves on Ctrl+C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
