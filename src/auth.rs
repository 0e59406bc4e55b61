use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::config::Config;

/// Bearer-token authentication middleware for guarded routes.
///
/// Extracts the token from the `Authorization: Bearer` header and compares it
/// against the configured API token. Requests proceed only on an exact match;
/// everything else is rejected before the handler runs.
///
/// Takes `Arc<Config>` rather than the full application state so it has no
/// dependency on the store client.
pub async fn require_bearer_token(
    State(config): State<Arc<Config>>,
    request: Request,
    next: Next,
) -> Response {
    // Extract Authorization header
    let auth_header = match request.headers().get("authorization") {
        Some(header) => match header.to_str() {
            Ok(s) => s,
            Err(_) => {
                return error_response(StatusCode::BAD_REQUEST, "Invalid Authorization header");
            }
        },
        None => {
            return error_response(StatusCode::UNAUTHORIZED, "Missing Authorization header");
        }
    };

    // Extract Bearer token
    let token = match auth_header.strip_prefix("Bearer ") {
        Some(t) => t,
        None => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Authorization header must be in format: Bearer <token>",
            );
        }
    };

    if token != config.api_token {
        tracing::warn!("Rejected request with invalid bearer token");
        return error_response(StatusCode::UNAUTHORIZED, "Invalid token");
    }

    next.run(request).await
}

/// Helper to create error response.
fn error_response(status: StatusCode, message: &str) -> Response {
    let body = Json(json!({
        "error": message,
    }));

    (status, body).into_response()
}
