use crate::error::{ApiError, ErrorResponse};
use crate::handlers::resolve_table;
use crate::models::UploadResponse;
use crate::routes;
use crate::selector::StoreSelector;
use crate::state::AppState;
use crate::store::ValueType;
use axum::{body::Bytes, extract::Path, extract::State, http::StatusCode, Json};

/// POST /files/:key handler - Upload a file
///
/// Stores the raw request body as a STREAM entry in the selected store.
/// Like add, the key must not already exist.
#[utoipa::path(
    post,
    path = routes::FILE_ITEM,
    params(
        ("key" = String, Path, description = "File key"),
        ("x-kv-store" = String, Header, description = "Target store name")
    ),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 201, description = "File stored", body = UploadResponse),
        (status = 400, description = "Duplicate key or bad store selection", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "files"
)]
pub async fn upload_handler(
    State(state): State<AppState>,
    StoreSelector(store): StoreSelector,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let table = resolve_table(&state, &store)?;
    let size = body.len() as u64;

    let added = state
        .store_client
        .add(&table, &key, body.to_vec(), ValueType::Stream)
        .await?;
    if !added {
        tracing::info!("Upload rejected, file '{}' already exists in store '{}'", key, store);
        return Err(ApiError::KeyExists(key));
    }

    tracing::info!("Uploaded file '{}' ({} bytes) to store '{}'", key, size, store);
    Ok((StatusCode::CREATED, Json(UploadResponse { key, size })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::emulator_app;
    use crate::selector::STORE_HEADER;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_upload_endpoint_stores_raw_bytes() {
        let Some(app) = emulator_app("upload-endpoint-test", "upload-endpoint-test-db").await
        else {
            return;
        };

        let key = format!("file-{}", Uuid::new_v4());
        let payload: Vec<u8> = (0..64).collect();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/files/{}", key))
                    .header("authorization", "Bearer test-token")
                    .header(STORE_HEADER, "main")
                    .header("content-type", "application/octet-stream")
                    .body(Body::from(payload.clone()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let response_json: UploadResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response_json.key, key);
        assert_eq!(response_json.size, payload.len() as u64);
    }

    #[tokio::test]
    async fn test_upload_endpoint_rejects_duplicate_key() {
        let Some(app) = emulator_app("upload-endpoint-test", "upload-endpoint-test-db").await
        else {
            return;
        };

        let key = format!("dup-file-{}", Uuid::new_v4());
        for expected in [StatusCode::CREATED, StatusCode::BAD_REQUEST] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri(format!("/files/{}", key))
                        .header("authorization", "Bearer test-token")
                        .header(STORE_HEADER, "main")
                        .body(Body::from(vec![1, 2, 3]))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), expected);
        }
    }

    #[tokio::test]
    async fn test_upload_endpoint_requires_selector() {
        let Some(app) = emulator_app("upload-endpoint-test", "upload-endpoint-test-db").await
        else {
            return;
        };

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/files/some-file")
                    .header("authorization", "Bearer test-token")
                    .body(Body::from(vec![1]))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
