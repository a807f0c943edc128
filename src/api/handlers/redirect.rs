//! `GET /{code}`: resolve a short code and redirect.

use axum::extract::{Path, State};
use axum::response::Redirect;

use crate::error::AppError;
use crate::state::AppState;

/// Answers `307 Temporary Redirect` to the stored target.
///
/// The click is counted by the same statement that checks expiry, so the
/// redirect is only sent once the increment is stored. Unknown codes give
/// 404 and expired ones 410. Neither is counted.
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Redirect, AppError> {
    let target = state.mapping_service.resolve(&code).await?;
    tracing::debug!(%code, %target, "Redirecting");

    Ok(Redirect::temporary(&target))
}
