use crate::error::{ApiError, ErrorResponse};
use crate::handlers::resolve_table;
use crate::models::{WriteRequest, WriteResponse};
use crate::routes;
use crate::selector::StoreSelector;
use crate::state::AppState;
use axum::{extract::Path, extract::State, http::StatusCode, Json};

/// PUT /kv/:key handler - Update an existing entry
///
/// Replaces the value and its value-type metadata; fails when the key does
/// not exist. `created_at` is preserved.
#[utoipa::path(
    put,
    path = routes::KV_ITEM,
    params(
        ("key" = String, Path, description = "Entry key"),
        ("x-kv-store" = String, Header, description = "Target store name")
    ),
    request_body = WriteRequest,
    responses(
        (status = 200, description = "Entry updated", body = WriteResponse),
        (status = 400, description = "Bad value or bad store selection", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Key not found", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "kv"
)]
pub async fn update_handler(
    State(state): State<AppState>,
    StoreSelector(store): StoreSelector,
    Path(key): Path<String>,
    Json(request): Json<WriteRequest>,
) -> Result<(StatusCode, Json<WriteResponse>), ApiError> {
    let table = resolve_table(&state, &store)?;
    let (value, value_type) = request.into_value()?;

    let updated = state
        .store_client
        .update(&table, &key, value, value_type)
        .await?;
    if !updated {
        tracing::info!("Update rejected, entry '{}' not found in store '{}'", key, store);
        return Err(ApiError::KeyNotFound(key));
    }

    tracing::info!("Updated entry '{}' in store '{}'", key, store);
    Ok((StatusCode::OK, Json(WriteResponse { key })))
}
