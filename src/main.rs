mod api_doc;
mod auth;
mod config;
mod error;
mod handlers;
mod models;
mod routes;
mod selector;
mod state;
mod store;

use std::sync::Arc;

use config::Config;
use state::AppState;
use store::StoreClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    tracing::info!("kv-gateway starting");

    let config = Config::from_env()?;
    config.log_startup();

    let store_client = StoreClient::from_config(&config).await?;

    let addr = format!("{}:{}", config.service_host, config.service_port);
    let state = AppState {
        store_client,
        config: Arc::new(config),
    };

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("HTTP server listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
