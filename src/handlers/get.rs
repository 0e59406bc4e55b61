use crate::error::{ApiError, ErrorResponse};
use crate::handlers::resolve_table;
use crate::models::EntryResponse;
use crate::routes;
use crate::selector::StoreSelector;
use crate::state::AppState;
use axum::{extract::Path, extract::State, http::StatusCode, Json};

/// GET /kv/:key handler - Retrieve an entry
#[utoipa::path(
    get,
    path = routes::KV_ITEM,
    params(
        ("key" = String, Path, description = "Entry key"),
        ("x-kv-store" = String, Header, description = "Target store name")
    ),
    responses(
        (status = 200, description = "Entry found", body = EntryResponse),
        (status = 400, description = "Missing selector header or unknown store", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Key not found", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "kv"
)]
pub async fn get_handler(
    State(state): State<AppState>,
    StoreSelector(store): StoreSelector,
    Path(key): Path<String>,
) -> Result<(StatusCode, Json<EntryResponse>), ApiError> {
    let table = resolve_table(&state, &store)?;

    match state.store_client.get(&table, &key).await? {
        Some(entry) => {
            tracing::info!("Retrieved entry '{}' from store '{}'", key, store);
            Ok((StatusCode::OK, Json(EntryResponse::from_entry(entry)?)))
        }
        None => {
            tracing::info!("Entry '{}' not found in store '{}'", key, store);
            Err(ApiError::KeyNotFound(key))
        }
    }
}
