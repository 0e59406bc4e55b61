use crate::config::Config;
use crate::store::StoreClient;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store_client: StoreClient,
    pub config: Arc<Config>,
}
