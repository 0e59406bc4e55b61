use crate::models::StoresResponse;
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// GET /stores handler - List the configured stores
///
/// Returns the store names accepted by the store selector header.
#[utoipa::path(
    get,
    path = routes::STORES,
    responses(
        (status = 200, description = "Configured store names", body = StoresResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "stores"
)]
pub async fn stores_handler(State(state): State<AppState>) -> (StatusCode, Json<StoresResponse>) {
    let stores = state.config.stores.clone();
    tracing::debug!("Listed {} configured stores", stores.len());
    (StatusCode::OK, Json(StoresResponse { stores }))
}
