//! Handler for mapping statistics.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns statistics for a mapping without counting a click.
///
/// # Endpoint
///
/// `GET /api/stats/{code}`
///
/// # Response
///
/// ```json
/// {
///   "long_url": "https://example.com/a",
///   "short_code": "aZ3x9Q",
///   "clicks": 12,
///   "created_at": "2025-01-01T00:00:00Z",
///   "expires_at": null,
///   "status": "active"
/// }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if the code doesn't exist. Expired mappings are
/// still reported.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let mapping = state.mapping_service.get_stats(&code).await?;

    Ok(Json(StatsResponse::from_mapping(mapping, Utc::now())))
}
