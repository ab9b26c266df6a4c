use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Whether a dispatcher is listening for purchase notices. Purchases still
    /// succeed without one; the buyer and owner emails are simply not sent.
    pub notifications_attached: bool,
    /// Seconds between drift sweeps, `0` when the background job is disabled.
    pub reconcile_interval_secs: u64,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = cradle_db::health_check(&state.pool).await.is_ok();
    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        notifications_attached: state.event_bus.subscriber_count() > 0,
        reconcile_interval_secs: state.config.reconcile_interval_secs,
    })
}

/// Mount at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
