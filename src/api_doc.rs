use utoipa::OpenApi;

use crate::error::{ErrorResponse, HealthResponse, UnhealthyResponse};
use crate::handlers;
use crate::models::{
    ClearResponse, DeleteResponse, EntryResponse, KeysResponse, ListResponse, StoresResponse,
    UploadResponse, VerifyResponse, WriteRequest, WriteResponse,
};
use crate::store::ValueType;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "kv-gateway API",
        version = "1.0.0",
        description = "A bearer-token guarded key-value and file storage API backed by Google Cloud Spanner"
    ),
    paths(
        handlers::health::health_handler,
        handlers::verify::verify_handler,
        handlers::stores::stores_handler,
        handlers::get::get_handler,
        handlers::add::add_handler,
        handlers::update::update_handler,
        handlers::delete::delete_handler,
        handlers::delete::clear_handler,
        handlers::list::list_handler,
        handlers::list::keys_handler,
        handlers::upload::upload_handler,
        handlers::download::download_handler
    ),
    components(
        schemas(
            WriteRequest,
            WriteResponse,
            DeleteResponse,
            ClearResponse,
            UploadResponse,
            VerifyResponse,
            StoresResponse,
            EntryResponse,
            ListResponse,
            KeysResponse,
            ValueType,
            ErrorResponse,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "auth", description = "Token verification"),
        (name = "stores", description = "Configured store discovery"),
        (name = "kv", description = "Key-value store operations"),
        (name = "files", description = "File upload and download")
    )
)]
pub struct ApiDoc;
