//! Liveness and storage health.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{HealthChecks, HealthResponse, StorageProbe};
use crate::state::AppState;

/// `GET /health`
///
/// 200 with `status: "healthy"` when the mapping store answers a ping,
/// otherwise 503 with `status: "degraded"` and the store error.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = match state.mapping_service.check_storage().await {
        Ok(()) => StorageProbe::ok(),
        Err(e) => {
            tracing::warn!(error = %e, "Storage health check failed");
            StorageProbe::failed(e)
        }
    };

    let response = HealthResponse::from_checks(HealthChecks { database });
    let status = if response.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
