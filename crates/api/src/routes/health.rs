use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Body of `GET /health`.
///
/// `status` is `"ok"` only when the store probe passes; a reachable process
/// with an unreachable store reports `"degraded"` rather than failing the
/// request outright.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Version of this crate, straight from Cargo.toml.
    pub version: &'static str,
    pub store_healthy: bool,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_healthy = state.store.health_check().await.is_ok();

    Json(HealthResponse {
        status: if store_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        store_healthy,
    })
}

/// Routes mounted at the root, outside the `/api/v1` prefix, so load
/// balancers can probe without a versioned path.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
