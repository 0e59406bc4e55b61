use crate::error::{ApiError, ErrorResponse};
use crate::handlers::resolve_table;
use crate::models::{EntryResponse, KeysResponse, ListQuery, ListResponse};
use crate::routes;
use crate::selector::StoreSelector;
use crate::state::AppState;
use crate::store::SortOrder;
use axum::{extract::Query, extract::State, http::StatusCode, Json};

/// GET /kv handler - List entries in the selected store
///
/// Returns a paginated, filterable, and sortable list of entries.
/// Query parameters:
/// - limit: Maximum number of results to return (optional)
/// - offset: Number of results to skip (optional, default: 0)
/// - prefix: Filter keys starting with this value (optional)
/// - sort: Sort order - one of: key_asc, key_desc, created_asc, created_desc, updated_asc, updated_desc (optional, default: key_asc)
#[utoipa::path(
    get,
    path = routes::KV_LIST,
    params(
        ("x-kv-store" = String, Header, description = "Target store name"),
        ("limit" = Option<u32>, Query, description = "Maximum number of results to return"),
        ("offset" = Option<u32>, Query, description = "Number of results to skip"),
        ("prefix" = Option<String>, Query, description = "Filter keys starting with this value"),
        ("sort" = Option<String>, Query, description = "Sort order: key_asc, key_desc, created_asc, created_desc, updated_asc, updated_desc")
    ),
    responses(
        (status = 200, description = "List of entries", body = ListResponse),
        (status = 400, description = "Invalid query parameter or bad store selection", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "kv"
)]
pub async fn list_handler(
    State(state): State<AppState>,
    StoreSelector(store): StoreSelector,
    Query(query): Query<ListQuery>,
) -> Result<(StatusCode, Json<ListResponse>), ApiError> {
    let table = resolve_table(&state, &store)?;

    // Parse and validate sort parameter
    let sort = if let Some(sort_str) = &query.sort {
        match sort_str.as_str() {
            "key_asc" => SortOrder::KeyAsc,
            "key_desc" => SortOrder::KeyDesc,
            "created_asc" => SortOrder::CreatedAsc,
            "created_desc" => SortOrder::CreatedDesc,
            "updated_asc" => SortOrder::UpdatedAsc,
            "updated_desc" => SortOrder::UpdatedDesc,
            _ => {
                return Err(ApiError::InvalidQueryParam(format!(
                    "sort must be one of: key_asc, key_desc, created_asc, created_desc, updated_asc, updated_desc, got '{}'",
                    sort_str
                )))
            }
        }
    } else {
        SortOrder::KeyAsc // default
    };

    // Convert limit and offset to i64
    let limit = query.limit.map(|l| l as i64);
    let offset = query.offset.unwrap_or(0) as i64;

    // Query the store
    let result = state
        .store_client
        .list(&table, query.prefix.as_deref(), sort, limit, offset)
        .await?;

    // Convert to response format with ISO 8601 timestamps
    let data: Vec<EntryResponse> = result
        .entries
        .into_iter()
        .map(EntryResponse::from_entry)
        .collect::<Result<_, _>>()?;

    let response = ListResponse {
        data,
        total_count: result.total_count,
    };

    tracing::info!(
        "Listed {} entries from store '{}' (total: {}, prefix: {:?}, sort: {:?}, limit: {:?}, offset: {})",
        response.data.len(),
        store,
        response.total_count,
        query.prefix,
        sort,
        limit,
        offset
    );

    Ok((StatusCode::OK, Json(response)))
}

/// GET /kv/keys handler - List keys in the selected store
#[utoipa::path(
    get,
    path = routes::KV_KEYS,
    params(
        ("x-kv-store" = String, Header, description = "Target store name")
    ),
    responses(
        (status = 200, description = "All keys in the store", body = KeysResponse),
        (status = 400, description = "Missing selector header or unknown store", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "kv"
)]
pub async fn keys_handler(
    State(state): State<AppState>,
    StoreSelector(store): StoreSelector,
) -> Result<(StatusCode, Json<KeysResponse>), ApiError> {
    let table = resolve_table(&state, &store)?;

    let keys = state.store_client.keys(&table).await?;
    let total_count = keys.len() as i64;

    tracing::info!("Listed {} keys from store '{}'", total_count, store);
    Ok((StatusCode::OK, Json(KeysResponse { keys, total_count })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::emulator_app;
    use crate::selector::STORE_HEADER;
    use axum::{body::Body, http::Request, Router};
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn add_entry(app: &Router, store: &str, key: &str, value: &str) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/kv/{}", key))
                    .header("authorization", "Bearer test-token")
                    .header(STORE_HEADER, store)
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::json!({"value": value}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    async fn get_json<T: serde::de::DeserializeOwned>(app: &Router, uri: &str) -> (StatusCode, Option<T>) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .header("authorization", "Bearer test-token")
                    .header(STORE_HEADER, "main")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).ok())
    }

    #[tokio::test]
    async fn test_list_endpoint_prefix_and_pagination() {
        let Some(app) = emulator_app("list-endpoint-test", "list-endpoint-test-db").await else {
            return;
        };

        let prefix = format!("list-{}-", Uuid::new_v4());
        for i in 0..4 {
            add_entry(&app, "main", &format!("{}{}", prefix, i), "v").await;
        }

        let (status, body) = get_json::<ListResponse>(&app, &format!("/kv?prefix={}", prefix)).await;
        assert_eq!(status, StatusCode::OK);
        let body = body.unwrap();
        assert_eq!(body.data.len(), 4);
        assert_eq!(body.total_count, 4);
        assert_eq!(body.data[0].key, format!("{}0", prefix));

        let (status, body) =
            get_json::<ListResponse>(&app, &format!("/kv?prefix={}&limit=2&offset=1", prefix)).await;
        assert_eq!(status, StatusCode::OK);
        let body = body.unwrap();
        assert_eq!(body.data.len(), 2);
        assert_eq!(body.total_count, 4);
        assert_eq!(body.data[0].key, format!("{}1", prefix));

        let (status, body) =
            get_json::<ListResponse>(&app, &format!("/kv?prefix={}&sort=key_desc", prefix)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.unwrap().data[0].key, format!("{}3", prefix));
    }

    #[tokio::test]
    async fn test_list_endpoint_invalid_sort() {
        let Some(app) = emulator_app("list-endpoint-test", "list-endpoint-test-db").await else {
            return;
        };

        let (status, body) = get_json::<crate::error::ErrorResponse>(&app, "/kv?sort=sideways").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.unwrap().error.contains("sort must be one of"));
    }

    #[tokio::test]
    async fn test_keys_endpoint_returns_added_keys() {
        let Some(app) = emulator_app("keys-endpoint-test", "keys-endpoint-test-db").await else {
            return;
        };

        let prefix = format!("keys-{}-", Uuid::new_v4());
        add_entry(&app, "main", &format!("{}a", prefix), "1").await;
        add_entry(&app, "main", &format!("{}b", prefix), "2").await;

        let (status, body) = get_json::<KeysResponse>(&app, "/kv/keys").await;
        assert_eq!(status, StatusCode::OK);
        let body = body.unwrap();
        assert!(body.keys.contains(&format!("{}a", prefix)));
        assert!(body.keys.contains(&format!("{}b", prefix)));
        assert_eq!(body.total_count, body.keys.len() as i64);
    }
}
