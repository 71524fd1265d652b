//! Server bootstrap: database connection, migrations, router, and
//! graceful shutdown.

use surrealdb::engine::remote::ws::Client;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use credvault_db::DbManager;

use crate::config::WebConfig;
use crate::routes::all_routes;
use crate::state::AppState;

/// Connect, migrate, and serve until shutdown.
pub async fn run(config: WebConfig) -> Result<(), Box<dyn std::error::Error>> {
    let manager = DbManager::connect(&config.db).await?;
    credvault_db::run_migrations(manager.client()).await?;

    let state: AppState<Client> = AppState::new(manager.client().clone(), config.auth.clone());

    let app = all_routes()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "CredVault server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("CredVault server stopped");
    Ok(())
}

async fn shutdown_signal() {
    // Shut down cleanly on Ctrl-C; errors installing the handler are
    // unrecoverable at this point.
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install shutdown signal handler");
    }
}
