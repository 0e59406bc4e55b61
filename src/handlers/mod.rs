pub mod add;
pub mod delete;
pub mod download;
pub mod get;
pub mod health;
pub mod list;
pub mod stores;
pub mod update;
pub mod upload;
pub mod verify;

pub use add::add_handler;
pub use delete::{clear_handler, delete_handler};
pub use download::download_handler;
pub use get::get_handler;
pub use health::health_handler;
pub use list::{keys_handler, list_handler};
pub use stores::stores_handler;
pub use update::update_handler;
pub use upload::upload_handler;
pub use verify::verify_handler;

use crate::error::ApiError;
use crate::state::AppState;

/// Resolve the store selector value to its backing table, or 400
pub(crate) fn resolve_table(state: &AppState, store: &str) -> Result<String, ApiError> {
    state
        .store_client
        .table_for(store)
        .map(str::to_string)
        .ok_or_else(|| ApiError::UnknownStore(store.to_string()))
}
