use std::env;
use anyhow::{bail, Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub spanner_emulator_host: Option<String>,
    pub spanner_project: String,
    pub spanner_instance: String,
    pub spanner_database: String,
    pub stores: Vec<String>,
    pub api_token: String,
    pub service_port: u16,
    pub service_host: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let spanner_emulator_host = env::var("SPANNER_EMULATOR_HOST").ok();

        let spanner_project = env::var("SPANNER_PROJECT")
            .context("SPANNER_PROJECT environment variable is required")?;

        let spanner_instance = env::var("SPANNER_INSTANCE")
            .context("SPANNER_INSTANCE environment variable is required")?;

        let spanner_database = env::var("SPANNER_DATABASE")
            .context("SPANNER_DATABASE environment variable is required")?;

        let stores_raw = env::var("KV_STORES")
            .context("KV_STORES environment variable is required (comma-separated store names)")?;
        let stores = parse_store_names(&stores_raw)?;

        let api_token = env::var("API_TOKEN")
            .context("API_TOKEN environment variable is required")?;
        if api_token.is_empty() {
            bail!("API_TOKEN must not be empty");
        }

        let service_port = env::var("SERVICE_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = env::var("SERVICE_HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string());

        Ok(Config {
            spanner_emulator_host,
            spanner_project,
            spanner_instance,
            spanner_database,
            stores,
            api_token,
            service_port,
            service_host,
        })
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Spanner emulator: {}",
            self.spanner_emulator_host.as_deref().unwrap_or("disabled (using production)"));
        tracing::info!("  Spanner project: {}", self.spanner_project);
        tracing::info!("  Spanner instance: {}", self.spanner_instance);
        tracing::info!("  Spanner database: {}", self.spanner_database);
        tracing::info!("  Configured stores: {}", self.stores.join(", "));
        tracing::info!("  Service listening on: {}:{}", self.service_host, self.service_port);
    }
}

/// Parse and validate the comma-separated store list.
///
/// Store names become part of Spanner table names, so they are restricted to
/// lowercase alphanumerics and underscores.
fn parse_store_names(raw: &str) -> Result<Vec<String>> {
    let mut stores = Vec::new();
    for name in raw.split(',') {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        if !name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
            bail!(
                "KV_STORES contains invalid store name '{}' (allowed: a-z, 0-9, _)",
                name
            );
        }
        if !stores.contains(&name.to_string()) {
            stores.push(name.to_string());
        }
    }
    if stores.is_empty() {
        bail!("KV_STORES must name at least one store");
    }
    Ok(stores)
}
