use crate::error::{ApiError, ErrorResponse};
use crate::handlers::resolve_table;
use crate::routes;
use crate::selector::StoreSelector;
use crate::state::AppState;
use crate::store::ValueType;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

/// GET /files/:key handler - Download a value as a byte stream
///
/// Returns the raw stored bytes. The Content-Type follows the entry's
/// value-type metadata: text/plain for TEXT, application/octet-stream for
/// STREAM.
#[utoipa::path(
    get,
    path = routes::FILE_ITEM,
    params(
        ("key" = String, Path, description = "File key"),
        ("x-kv-store" = String, Header, description = "Target store name")
    ),
    responses(
        (status = 200, description = "Raw value bytes"),
        (status = 400, description = "Missing selector header or unknown store", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Key not found", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "files"
)]
pub async fn download_handler(
    State(state): State<AppState>,
    StoreSelector(store): StoreSelector,
    Path(key): Path<String>,
) -> Result<Response, ApiError> {
    let table = resolve_table(&state, &store)?;

    match state.store_client.get(&table, &key).await? {
        Some(entry) => {
            let content_type = match entry.value_type {
                ValueType::Text => "text/plain; charset=utf-8",
                ValueType::Stream => "application/octet-stream",
            };
            tracing::info!(
                "Downloaded '{}' ({} bytes) from store '{}'",
                key,
                entry.value.len(),
                store
            );
            Ok((
                StatusCode::OK,
                [(header::CONTENT_TYPE, content_type)],
                entry.value,
            )
                .into_response())
        }
        None => {
            tracing::info!("Download '{}' not found in store '{}'", key, store);
            Err(ApiError::KeyNotFound(key))
        }
    }
}
