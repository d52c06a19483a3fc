//! Liveness and readiness probes.

use crate::models::ReadinessResponse;
use crate::routes::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

/// Liveness probe. Checks nothing beyond the process answering.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Readiness probe.
///
/// Returns 200 if the account store answers, 503 otherwise. The store error
/// is logged, never returned.
#[tracing::instrument(skip_all, name = "lms.health.readiness")]
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready".to_string(),
                database: "healthy".to_string(),
            }),
        ),
        Err(e) => {
            tracing::warn!(target: "lms.health", error = %e, "Readiness check failed: database error");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse {
                    status: "not_ready".to_string(),
                    database: "unhealthy".to_string(),
                }),
            )
        }
    }
}
