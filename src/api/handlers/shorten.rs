//! Handler for link shortening endpoint.

use axum::{Json, extract::State};
use chrono::TimeDelta;
use serde_json::json;
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "long_url": "https://example.com/a",
///   "expires_in_seconds": 3600,   // optional
///   "custom_alias": "my-link"     // optional
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "short_code": "my-link",
///   "short_url": "http://localhost:3000/my-link",
///   "long_url": "https://example.com/a",
///   "created_at": "2025-01-01T00:00:00Z",
///   "expires_at": "2025-01-01T01:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails.
/// Returns 409 Conflict if the custom alias is already in use.
/// Returns 503 Service Unavailable if no free code could be allocated.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(mut payload): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.custom_alias = payload.custom_alias.filter(|alias| !alias.is_empty());
    payload.validate()?;

    let ttl = payload
        .expires_in_seconds
        .map(|seconds| {
            TimeDelta::try_seconds(seconds).ok_or_else(|| {
                AppError::bad_request(
                    "Expiry is out of range",
                    json!({ "expires_in_seconds": seconds }),
                )
            })
        })
        .transpose()?;

    let mapping = state
        .mapping_service
        .create(payload.long_url, ttl, payload.custom_alias)
        .await?;

    let short_url = state.mapping_service.short_url(&mapping.code);

    Ok(Json(ShortenResponse::new(mapping, short_url)))
}
