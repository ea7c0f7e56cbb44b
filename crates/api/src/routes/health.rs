//! Liveness endpoint for load balancers and deploy checks.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when Postgres cannot be reached.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Username rule set in force (`strict`, `legacy` or `custom`).
    pub username_policy: &'static str,
}

/// GET /health
///
/// Always answers 200; an unreachable database is reported in the body.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = presently_db::health_check(&state.pool).await.is_ok();
    if !db_healthy {
        tracing::warn!("Health check: database unreachable");
    }

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        username_policy: state.config.username_policy.name(),
    })
}

/// Mounted at the root, outside the versioned `/api/v1` tree.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
