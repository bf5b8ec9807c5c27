//! Application startup and server initialization.
//!
//! Builds the token verifier from the identity settings, wires up the routes and
//! serves them on the configured address.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ConfigV1;
use crate::routes;
use crate::state::AppState;

/// Initializes and runs the application server.
///
/// # Errors
///
/// Returns an error if the identity settings are unusable, the server fails to
/// bind to the configured address, or it encounters a runtime error.
pub async fn run(config: Arc<ConfigV1>) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(config.clone())?;
    info!(
        domain = %config.identity.domain,
        client_id = %config.identity.client_id,
        static_root = %config.static_files.root,
        "Token verifier ready"
    );

    let app = routes::create_router(state);

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .map_err(|e| format!("Could not bind to {}: {}", config.bind_address, e))?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
