//! Handler for the service banner.

use axum::Json;

use crate::api::dto::root::RootResponse;

/// `GET /` - confirms the service is up.
pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: "URL Shortener API is running".to_string(),
    })
}
