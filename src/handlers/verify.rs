use crate::models::VerifyResponse;
use crate::routes;
use axum::{http::StatusCode, Json};

/// GET /auth/verify handler - Verify the bearer token
///
/// The auth middleware has already checked the token by the time this handler
/// runs, so reaching it at all means the token is valid.
#[utoipa::path(
    get,
    path = routes::AUTH_VERIFY,
    responses(
        (status = 200, description = "Token is valid", body = VerifyResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "auth"
)]
pub async fn verify_handler() -> (StatusCode, Json<VerifyResponse>) {
    tracing::debug!("Token verified");
    (StatusCode::OK, Json(VerifyResponse { valid: true }))
}
