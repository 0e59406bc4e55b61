use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Request header naming which configured store a request targets
pub const STORE_HEADER: &str = "x-kv-store";

/// Extractor for the store selector header.
///
/// Store-scoped routes take this as an argument; a request without the header
/// is rejected with 400 before the handler body runs. The value is resolved
/// against the configured stores by the handler, since resolution needs the
/// store client.
pub struct StoreSelector(pub String);

impl<S> FromRequestParts<S> for StoreSelector
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(STORE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        match value {
            Some(name) => Ok(StoreSelector(name.to_string())),
            None => {
                let body = Json(json!({
                    "error": format!("Missing required header: {}", STORE_HEADER),
                }));
                Err((StatusCode::BAD_REQUEST, body).into_response())
            }
        }
    }
}
