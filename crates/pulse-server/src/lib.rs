//! HTTP reporter for pulse snapshots.
//!
//! A small JSON API over a shared [`AppState`]:
//!
//! - `GET /api/roster` lists the configured identities.
//! - `POST /api/check` runs a check and stores the snapshot.
//! - `GET /api/snapshot` returns the most recent snapshot.
//!
//! The server never checks on its own schedule. Every snapshot is the
//! result of an explicit `POST /api/check`.

pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Builds the reporter router over the given state.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/roster", get(routes::roster::get_roster))
        .route("/api/snapshot", get(routes::snapshot::get_snapshot))
        .route("/api/check", post(routes::snapshot::run_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Binds `0.0.0.0:port` and serves until the process exits.
pub async fn serve(state: AppState, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    serve_on(state, listener).await
}

/// Serves on an already-bound listener. Useful when the caller wants
/// an ephemeral port.
pub async fn serve_on(state: AppState, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let port = listener.local_addr()?.port();
    tracing::info!("pulse reporter listening on http://localhost:{port}");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
