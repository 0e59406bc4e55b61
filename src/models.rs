use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::store::{Entry, ValueType};

/// Response type for successful add/update operations
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct WriteResponse {
    pub key: String,
}

/// Response type for successful delete operations
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct DeleteResponse {
    pub key: String,
}

/// Response type for clear-all operations
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ClearResponse {
    pub deleted: u64,
}

/// Response type for successful uploads
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UploadResponse {
    pub key: String,
    pub size: u64,
}

/// Response type for the token verification endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct VerifyResponse {
    pub valid: bool,
}

/// Response type listing the configured stores
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct StoresResponse {
    pub stores: Vec<String>,
}

/// Request body for add and update operations
///
/// `value` holds the text itself for TEXT entries and standard base64 for
/// STREAM entries. `value_type` defaults to TEXT.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct WriteRequest {
    pub value: String,
    pub value_type: Option<ValueType>,
}

/// Query parameters for list endpoint
#[derive(Deserialize, utoipa::ToSchema)]
pub struct ListQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub prefix: Option<String>,
    pub sort: Option<String>,
}

/// Individual key-value entry in responses
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct EntryResponse {
    pub key: String,
    pub value: String,
    pub value_type: ValueType,
    pub created_at: String,
    pub updated_at: String,
}

/// Response type for list endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ListResponse {
    pub data: Vec<EntryResponse>,
    pub total_count: i64,
}

/// Response type for the keys endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct KeysResponse {
    pub keys: Vec<String>,
    pub total_count: i64,
}

impl WriteRequest {
    /// Decode the request into raw value bytes and a value type
    ///
    /// TEXT values pass through as UTF-8; STREAM values must be valid
    /// standard base64.
    pub fn into_value(self) -> Result<(Vec<u8>, ValueType), ApiError> {
        let value_type = self.value_type.unwrap_or(ValueType::Text);
        let value = match value_type {
            ValueType::Text => self.value.into_bytes(),
            ValueType::Stream => base64::engine::general_purpose::STANDARD
                .decode(self.value.as_bytes())
                .map_err(|e| ApiError::InvalidValue(format!("STREAM value is not valid base64: {}", e)))?,
        };
        Ok((value, value_type))
    }
}

impl EntryResponse {
    /// Render a store entry for the JSON API
    ///
    /// TEXT values are returned as the stored text; STREAM values are
    /// base64-encoded. A TEXT entry whose bytes are not valid UTF-8 means the
    /// stored data and its metadata disagree, which surfaces as a store error.
    pub fn from_entry(entry: Entry) -> Result<Self, ApiError> {
        let value = match entry.value_type {
            ValueType::Text => String::from_utf8(entry.value).map_err(|_| {
                ApiError::StoreError(anyhow::anyhow!(
                    "stored TEXT value for key '{}' is not valid UTF-8",
                    entry.key
                ))
            })?,
            ValueType::Stream => base64::engine::general_purpose::STANDARD.encode(&entry.value),
        };

        Ok(EntryResponse {
            key: entry.key,
            value,
            value_type: entry.value_type,
            created_at: entry.created_at.to_rfc3339(),
            updated_at: entry.updated_at.to_rfc3339(),
        })
    }
}
