use axum::extract::State;
use axum::{routing::get, Json, Router};
use satchel_store::ConnectionState;
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status: `"ok"` once the store is connected and
    /// answering, `"degraded"` otherwise.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the store answered a trivial query.
    pub db_healthy: bool,
    /// Current store connection lifecycle state.
    pub store_state: ConnectionState,
}

/// GET /health -- returns service and store health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_state = state.store.state();

    let db_healthy = match state.store.pool().await {
        Ok(pool) => satchel_db::health_check(&pool).await.is_ok(),
        Err(_) => false,
    };

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        store_state,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
