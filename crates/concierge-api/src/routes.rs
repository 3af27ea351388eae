//! Router setup and server startup.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/webhook", post(handlers::webhook))
        .layer(DefaultBodyLimit::max(256 * 1024))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server on the configured address.
pub async fn start_server(
    config: &concierge_core::config::ServerConfig,
    state: AppState,
) -> Result<(), concierge_core::error::ConciergeError> {
    let addr = format!("{}:{}", config.host, config.port);
    let router = create_router(state);

    tracing::info!("Starting webhook server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| concierge_core::error::ConciergeError::Api(format!("Failed to bind: {}", e)))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| concierge_core::error::ConciergeError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
