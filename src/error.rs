use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error response type
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub error: String,
}

/// Custom error type for API endpoints
///
/// This error type provides consistent error handling across all endpoints,
/// automatically mapping different error types to appropriate HTTP status codes
/// and formatting them as JSON responses.
#[derive(Debug)]
pub enum ApiError {
    /// Key not found in the selected store
    KeyNotFound(String),
    /// Add rejected because the key already exists
    KeyExists(String),
    /// Store selector header named a store that is not configured
    UnknownStore(String),
    /// Request value could not be decoded (bad base64, invalid UTF-8)
    InvalidValue(String),
    /// Invalid query parameter
    InvalidQueryParam(String),
    /// Backing store operation error
    StoreError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::KeyNotFound(key) => (
                StatusCode::NOT_FOUND,
                format!("Key not found: {}", key),
            ),
            ApiError::KeyExists(key) => (
                StatusCode::BAD_REQUEST,
                format!("Key already exists: {}", key),
            ),
            ApiError::UnknownStore(name) => (
                StatusCode::BAD_REQUEST,
                format!("Unknown store: '{}' is not configured", name),
            ),
            ApiError::InvalidValue(msg) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid value: {}", msg),
            ),
            ApiError::InvalidQueryParam(msg) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid query parameter: {}", msg),
            ),
            ApiError::StoreError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Store error: {}", err),
            ),
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::StoreError(err)
    }
}
