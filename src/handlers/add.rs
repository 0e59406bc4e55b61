use crate::error::{ApiError, ErrorResponse};
use crate::handlers::resolve_table;
use crate::models::{WriteRequest, WriteResponse};
use crate::routes;
use crate::selector::StoreSelector;
use crate::state::AppState;
use axum::{extract::Path, extract::State, http::StatusCode, Json};

/// POST /kv/:key handler - Add a new entry
///
/// Fails when the key already exists. The duplicate check is read-then-write,
/// so concurrent adds of the same key are not serialized.
#[utoipa::path(
    post,
    path = routes::KV_ITEM,
    params(
        ("key" = String, Path, description = "Entry key"),
        ("x-kv-store" = String, Header, description = "Target store name")
    ),
    request_body = WriteRequest,
    responses(
        (status = 201, description = "Entry created", body = WriteResponse),
        (status = 400, description = "Duplicate key, bad value, or bad store selection", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "kv"
)]
pub async fn add_handler(
    State(state): State<AppState>,
    StoreSelector(store): StoreSelector,
    Path(key): Path<String>,
    Json(request): Json<WriteRequest>,
) -> Result<(StatusCode, Json<WriteResponse>), ApiError> {
    let table = resolve_table(&state, &store)?;
    let (value, value_type) = request.into_value()?;

    let added = state
        .store_client
        .add(&table, &key, value, value_type)
        .await?;
    if !added {
        tracing::info!("Add rejected, entry '{}' already exists in store '{}'", key, store);
        return Err(ApiError::KeyExists(key));
    }

    tracing::info!("Added entry '{}' to store '{}'", key, store);
    Ok((StatusCode::CREATED, Json(WriteResponse { key })))
}
