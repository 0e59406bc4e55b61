// Route path constants - single source of truth for all API paths

use axum::{
    middleware,
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::auth::require_bearer_token;
use crate::handlers;
use crate::state::AppState;

pub const HEALTH: &str = "/health";
pub const AUTH_VERIFY: &str = "/auth/verify";
pub const STORES: &str = "/stores";
pub const KV_LIST: &str = "/kv";
pub const KV_KEYS: &str = "/kv/keys";
pub const KV_ITEM: &str = "/kv/{key}";
pub const FILE_ITEM: &str = "/files/{key}";

/// Build the application router
///
/// Guard evaluation is first-rejection-wins: the bearer-token middleware runs
/// first on protected routes (401), then the method router rejects unmatched
/// methods (405), then the store selector extractor (400) on store-scoped
/// routes. Health and the swagger UI are unguarded.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route(AUTH_VERIFY, get(handlers::verify_handler))
        .route(STORES, get(handlers::stores_handler))
        .route(
            KV_LIST,
            get(handlers::list_handler).delete(handlers::clear_handler),
        )
        .route(KV_KEYS, get(handlers::keys_handler))
        .route(
            KV_ITEM,
            get(handlers::get_handler)
                .post(handlers::add_handler)
                .put(handlers::update_handler)
                .delete(handlers::delete_handler),
        )
        .route(
            FILE_ITEM,
            get(handlers::download_handler).post(handlers::upload_handler),
        )
        .layer(middleware::from_fn_with_state(
            state.config.clone(),
            require_bearer_token,
        ));

    Router::new()
        .route(HEALTH, get(handlers::health_handler))
        .merge(protected)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
