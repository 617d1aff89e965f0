//! REST API over the projection engine.
//!
//! Provides two GET endpoints:
//! - `/locations`: reference table with derived site metrics
//! - `/projection`: a fresh projection for one location and parameter set

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::projection::ProjectParameters;
use crate::site::LocationTable;

pub use types::{ErrorResponse, LocationsResponse, ProjectionQuery, ProjectionResponse};

/// Immutable application state shared across all request handlers.
///
/// Every request computes its own projection from this read-only data, so
/// no locks are needed.
pub struct AppState {
    /// Reference location table.
    pub table: LocationTable,
    /// Parameters used for anything a request does not override.
    pub defaults: ProjectParameters,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/locations", get(handlers::get_locations))
        .route("/projection", get(handlers::get_projection))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
