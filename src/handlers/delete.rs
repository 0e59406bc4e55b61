use crate::error::{ApiError, ErrorResponse};
use crate::handlers::resolve_table;
use crate::models::{ClearResponse, DeleteResponse};
use crate::routes;
use crate::selector::StoreSelector;
use crate::state::AppState;
use axum::{extract::Path, extract::State, http::StatusCode, Json};

/// DELETE /kv/:key handler - Delete an entry
#[utoipa::path(
    delete,
    path = routes::KV_ITEM,
    params(
        ("key" = String, Path, description = "Entry key"),
        ("x-kv-store" = String, Header, description = "Target store name")
    ),
    responses(
        (status = 200, description = "Entry deleted", body = DeleteResponse),
        (status = 400, description = "Missing selector header or unknown store", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Key not found", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "kv"
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    StoreSelector(store): StoreSelector,
    Path(key): Path<String>,
) -> Result<(StatusCode, Json<DeleteResponse>), ApiError> {
    let table = resolve_table(&state, &store)?;

    let deleted = state.store_client.delete(&table, &key).await?;
    if !deleted {
        tracing::info!("Delete rejected, entry '{}' not found in store '{}'", key, store);
        return Err(ApiError::KeyNotFound(key));
    }

    tracing::info!("Deleted entry '{}' from store '{}'", key, store);
    Ok((StatusCode::OK, Json(DeleteResponse { key })))
}

/// DELETE /kv handler - Clear the selected store
///
/// Lists all keys then deletes each one; no atomicity across the batch.
#[utoipa::path(
    delete,
    path = routes::KV_LIST,
    params(
        ("x-kv-store" = String, Header, description = "Target store name")
    ),
    responses(
        (status = 200, description = "Store cleared", body = ClearResponse),
        (status = 400, description = "Missing selector header or unknown store", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "kv"
)]
pub async fn clear_handler(
    State(state): State<AppState>,
    StoreSelector(store): StoreSelector,
) -> Result<(StatusCode, Json<ClearResponse>), ApiError> {
    let table = resolve_table(&state, &store)?;

    let deleted = state.store_client.clear(&table).await?;

    tracing::info!("Cleared store '{}' ({} entries)", store, deleted);
    Ok((StatusCode::OK, Json(ClearResponse { deleted })))
}
