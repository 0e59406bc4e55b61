use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use gcloud_gax::grpc::Code;
use gcloud_googleapis::spanner::admin::database::v1::{
    CreateDatabaseRequest, GetDatabaseDdlRequest, GetDatabaseRequest, UpdateDatabaseDdlRequest,
};
use gcloud_googleapis::spanner::admin::instance::v1::{
    CreateInstanceRequest, GetInstanceRequest, Instance,
};
use gcloud_spanner::admin::client::Client as AdminClient;
use gcloud_spanner::admin::AdminClientConfig;
use gcloud_spanner::client::{Client, ClientConfig};
use gcloud_spanner::key::Key;
use gcloud_spanner::mutation;
use gcloud_spanner::row::Row;
use gcloud_spanner::statement::Statement;
use gcloud_spanner::value::CommitTimestamp;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::Config;

/// Metadata tag distinguishing textual values from binary/stream values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValueType {
    Text,
    Stream,
}

impl ValueType {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::Text => "TEXT",
            ValueType::Stream => "STREAM",
        }
    }

    fn from_column(s: &str) -> Result<Self> {
        match s {
            "TEXT" => Ok(ValueType::Text),
            "STREAM" => Ok(ValueType::Stream),
            other => Err(anyhow::anyhow!("unknown value type in store: '{}'", other)),
        }
    }
}

/// A single key-value entry with metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub key: String,
    pub value: Vec<u8>,
    pub value_type: ValueType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of a list query with pagination info
#[derive(Debug, Clone)]
pub struct ListResult {
    pub entries: Vec<Entry>,
    pub total_count: i64,
}

/// Sort order options for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    KeyAsc,
    KeyDesc,
    CreatedAsc,
    CreatedDesc,
    UpdatedAsc,
    UpdatedDesc,
}

impl SortOrder {
    /// Convert to SQL ORDER BY clause
    fn to_sql(self) -> &'static str {
        match self {
            SortOrder::KeyAsc => "key ASC",
            SortOrder::KeyDesc => "key DESC",
            SortOrder::CreatedAsc => "created_at ASC",
            SortOrder::CreatedDesc => "created_at DESC",
            SortOrder::UpdatedAsc => "updated_at ASC",
            SortOrder::UpdatedDesc => "updated_at DESC",
        }
    }
}

const ENTRY_COLUMNS: [&str; 5] = ["key", "value", "value_type", "created_at", "updated_at"];

/// Shareable store client for use across async handlers
///
/// Wraps the Spanner client and the mapping from configured store names to
/// their backing tables. All consistency and durability guarantees are
/// whatever Spanner provides; this client adds no retries or batching.
#[derive(Clone)]
pub struct StoreClient {
    inner: Arc<Client>,
    tables: Arc<HashMap<String, String>>,
}

impl StoreClient {
    /// Create a new store client from configuration
    ///
    /// This creates a connection to Spanner using the provided config.
    /// The gcloud-spanner library automatically detects the
    /// SPANNER_EMULATOR_HOST environment variable and connects to
    /// the emulator when set, or production Spanner otherwise.
    ///
    /// This function also performs auto-provisioning: it will automatically
    /// create the instance, the database, and one table per configured store
    /// if they don't exist.
    pub async fn from_config(config: &Config) -> Result<Self> {
        // Perform auto-provisioning first
        auto_provision(config).await?;

        let database_path = format!(
            "projects/{}/instances/{}/databases/{}",
            config.spanner_project, config.spanner_instance, config.spanner_database
        );

        // Log connection target
        if config.spanner_emulator_host.is_some() {
            tracing::info!(
                "Connecting to Spanner emulator at: {}",
                config.spanner_emulator_host.as_ref().unwrap()
            );
        } else {
            tracing::info!("Connecting to production Spanner");
        }

        // ClientConfig::default() automatically uses SPANNER_EMULATOR_HOST if set
        let client = Client::new(&database_path, ClientConfig::default())
            .await
            .context("Failed to create Spanner client")?;

        tracing::info!(
            "Successfully connected to Spanner database: {}",
            database_path
        );

        let tables = config
            .stores
            .iter()
            .map(|name| (name.clone(), table_name(name)))
            .collect();

        Ok(Self {
            inner: Arc::new(client),
            tables: Arc::new(tables),
        })
    }

    /// Resolve a store selector value to its backing table
    ///
    /// Returns `None` when the name is not one of the configured stores.
    pub fn table_for(&self, store: &str) -> Option<&str> {
        self.tables.get(store).map(String::as_str)
    }

    /// Read an entry by key
    ///
    /// # Returns
    /// * `Ok(Some(entry))` - Entry found and returned
    /// * `Ok(None)` - Entry not found
    /// * `Err(_)` - Spanner operation failed
    pub async fn get(&self, table: &str, key: &str) -> Result<Option<Entry>> {
        let mut statement = Statement::new(format!(
            "SELECT key, value, value_type, created_at, updated_at FROM {} WHERE key = @key",
            table
        ));
        statement.add_param("key", &key.to_string());

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query entry from Spanner")?;

        if let Some(row) = result_set.next().await? {
            let entry = entry_from_row(&row)?;
            tracing::debug!("Read entry with key: {}", key);
            Ok(Some(entry))
        } else {
            tracing::debug!("Entry not found with key: {}", key);
            Ok(None)
        }
    }

    /// Read every entry in the store
    pub async fn get_all(&self, table: &str) -> Result<Vec<Entry>> {
        let result = self.list(table, None, SortOrder::KeyAsc, None, 0).await?;
        Ok(result.entries)
    }

    /// Whether an entry exists for the key, derived from `get`
    pub async fn has(&self, table: &str, key: &str) -> Result<bool> {
        Ok(self.get(table, key).await?.is_some())
    }

    /// Insert a new entry, refusing keys that already exist
    ///
    /// The existence check and the insert are separate operations
    /// (read-then-write); concurrent writers racing on the same key get no
    /// uniqueness guarantee beyond what the final insert provides.
    ///
    /// # Returns
    /// * `Ok(true)` - Entry was inserted
    /// * `Ok(false)` - Key already present, nothing written
    pub async fn add(
        &self,
        table: &str,
        key: &str,
        value: Vec<u8>,
        value_type: ValueType,
    ) -> Result<bool> {
        if self.has(table, key).await? {
            tracing::debug!("Add rejected, key already exists: {}", key);
            return Ok(false);
        }

        let m = mutation::insert(
            table,
            &ENTRY_COLUMNS,
            &[
                &key.to_string(),
                &value,
                &value_type.as_str().to_string(),
                &CommitTimestamp::new(),
                &CommitTimestamp::new(),
            ],
        );

        self.inner
            .apply(vec![m])
            .await
            .context("Failed to insert entry into Spanner")?;

        tracing::debug!("Added entry with key: {}", key);
        Ok(true)
    }

    /// Rewrite an existing entry's value and value-type metadata
    ///
    /// `created_at` is left untouched; `updated_at` is set to the commit
    /// timestamp.
    ///
    /// # Returns
    /// * `Ok(true)` - Entry was updated
    /// * `Ok(false)` - Key not present, nothing written
    pub async fn update(
        &self,
        table: &str,
        key: &str,
        value: Vec<u8>,
        value_type: ValueType,
    ) -> Result<bool> {
        if !self.has(table, key).await? {
            tracing::debug!("Update rejected, key not found: {}", key);
            return Ok(false);
        }

        let m = mutation::update(
            table,
            &["key", "value", "value_type", "updated_at"],
            &[
                &key.to_string(),
                &value,
                &value_type.as_str().to_string(),
                &CommitTimestamp::new(),
            ],
        );

        self.inner
            .apply(vec![m])
            .await
            .context("Failed to update entry in Spanner")?;

        tracing::debug!("Updated entry with key: {}", key);
        Ok(true)
    }

    /// Delete an entry by key
    ///
    /// # Returns
    /// * `Ok(true)` - Entry was deleted
    /// * `Ok(false)` - Key not present
    pub async fn delete(&self, table: &str, key: &str) -> Result<bool> {
        if !self.has(table, key).await? {
            tracing::debug!("Delete skipped, key not found: {}", key);
            return Ok(false);
        }

        let m = mutation::delete(table, Key::new(&key.to_string()));

        self.inner
            .apply(vec![m])
            .await
            .context("Failed to delete entry from Spanner")?;

        tracing::debug!("Deleted entry with key: {}", key);
        Ok(true)
    }

    /// Delete a batch of keys, one commit per key
    ///
    /// Sequential, unordered with respect to other writers, and without
    /// atomicity across the batch: a failure partway leaves earlier deletes
    /// applied.
    pub async fn delete_many(&self, table: &str, keys: &[String]) -> Result<()> {
        for key in keys {
            let m = mutation::delete(table, Key::new(key));
            self.inner
                .apply(vec![m])
                .await
                .with_context(|| format!("Failed to delete key '{}' from Spanner", key))?;
        }
        tracing::debug!("Deleted {} entries", keys.len());
        Ok(())
    }

    /// Delete every entry in the store by listing all keys then deleting each
    ///
    /// Returns the number of keys that were listed and deleted.
    pub async fn clear(&self, table: &str) -> Result<u64> {
        let keys = self.keys(table).await?;
        self.delete_many(table, &keys).await?;
        tracing::debug!("Cleared store table {} ({} entries)", table, keys.len());
        Ok(keys.len() as u64)
    }

    /// List every key in the store, ascending
    pub async fn keys(&self, table: &str) -> Result<Vec<String>> {
        let statement = Statement::new(format!("SELECT key FROM {} ORDER BY key ASC", table));

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query keys from Spanner")?;

        let mut keys = Vec::new();
        while let Some(row) = result_set.next().await? {
            let key: String = row.column_by_name("key")?;
            keys.push(key);
        }

        Ok(keys)
    }

    /// Perform a health check by executing a simple query
    ///
    /// # Returns
    /// * `Ok(())` - Database is reachable and responsive
    /// * `Err(_)` - Database connection failed or query failed
    pub async fn health_check(&self) -> Result<()> {
        let statement = Statement::new("SELECT 1");

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create health check transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to execute health check query")?;

        if result_set.next().await?.is_some() {
            tracing::debug!("Health check query succeeded");
            Ok(())
        } else {
            Err(anyhow::anyhow!("Health check query returned no results"))
        }
    }

    /// List entries with optional filtering, sorting, and pagination
    ///
    /// # Arguments
    /// * `prefix` - Optional key prefix filter (e.g., "user-" to match all keys starting with "user-")
    /// * `sort` - Sort order for results (default at the API layer: KeyAsc)
    /// * `limit` - Maximum number of results to return (None = all results)
    /// * `offset` - Number of results to skip
    ///
    /// # Returns
    /// * `ListResult` - Contains the matching entries and total count
    pub async fn list(
        &self,
        table: &str,
        prefix: Option<&str>,
        sort: SortOrder,
        limit: Option<i64>,
        offset: i64,
    ) -> Result<ListResult> {
        // Build the count query
        let count_query = if prefix.is_some() {
            format!("SELECT COUNT(*) as count FROM {} WHERE key LIKE @prefix", table)
        } else {
            format!("SELECT COUNT(*) as count FROM {}", table)
        };

        let mut count_stmt = Statement::new(&count_query);
        if let Some(prefix) = prefix {
            let prefix_pattern = format!("{}%", prefix);
            count_stmt.add_param("prefix", &prefix_pattern);
        }

        // Execute count query
        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create read transaction for count")?;

        let mut count_result = tx
            .query(count_stmt)
            .await
            .context("Failed to execute count query")?;

        let total_count: i64 = if let Some(row) = count_result.next().await? {
            row.column_by_name("count")?
        } else {
            0
        };

        // Build the data query
        let mut data_query = if prefix.is_some() {
            format!(
                "SELECT key, value, value_type, created_at, updated_at FROM {} WHERE key LIKE @prefix",
                table
            )
        } else {
            format!(
                "SELECT key, value, value_type, created_at, updated_at FROM {}",
                table
            )
        };

        // Add ORDER BY clause
        data_query.push_str(&format!(" ORDER BY {}", sort.to_sql()));

        // Add LIMIT and OFFSET if specified
        // In Spanner SQL, LIMIT must come before OFFSET
        if let Some(limit_val) = limit {
            data_query.push_str(&format!(" LIMIT {}", limit_val));
            if offset > 0 {
                data_query.push_str(&format!(" OFFSET {}", offset));
            }
        } else if offset > 0 {
            // If we have offset but no limit, we need to use a large limit
            data_query.push_str(&format!(" LIMIT {} OFFSET {}", i64::MAX, offset));
        }

        let mut data_stmt = Statement::new(&data_query);
        if let Some(prefix) = prefix {
            let prefix_pattern = format!("{}%", prefix);
            data_stmt.add_param("prefix", &prefix_pattern);
        }

        // Execute data query
        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create read transaction for data")?;

        let mut data_result = tx
            .query(data_stmt)
            .await
            .context("Failed to execute data query")?;

        // Collect results
        let mut entries = Vec::new();
        while let Some(row) = data_result.next().await? {
            entries.push(entry_from_row(&row)?);
        }

        tracing::debug!(
            "Listed {} entries (total: {}, prefix: {:?}, sort: {:?}, limit: {:?}, offset: {})",
            entries.len(),
            total_count,
            prefix,
            sort,
            limit,
            offset
        );

        Ok(ListResult {
            entries,
            total_count,
        })
    }
}

/// Backing table for a configured store name
fn table_name(store: &str) -> String {
    format!("kv_{}", store)
}

/// Decode one result row into an Entry
fn entry_from_row(row: &Row) -> Result<Entry> {
    let key: String = row.column_by_name("key")?;
    let value: Vec<u8> = row.column_by_name("value")?;
    let value_type_str: String = row.column_by_name("value_type")?;
    let value_type = ValueType::from_column(&value_type_str)?;

    // Timestamps come back as RFC 3339 strings
    let created_at_str: String = row.column_by_name("created_at")?;
    let updated_at_str: String = row.column_by_name("updated_at")?;

    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .context("Failed to parse created_at timestamp")?
        .with_timezone(&Utc);
    let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
        .context("Failed to parse updated_at timestamp")?
        .with_timezone(&Utc);

    Ok(Entry {
        key,
        value,
        value_type,
        created_at,
        updated_at,
    })
}

/// Automatically provision the Spanner instance, database, and store tables
///
/// This function checks if the configured resources exist and creates them if
/// needed. It's designed to enable zero-setup local development with the
/// emulator.
async fn auto_provision(config: &Config) -> Result<()> {
    tracing::info!("Starting auto-provisioning checks...");

    // Create admin client
    let admin_client = AdminClient::new(AdminClientConfig::default())
        .await
        .context("Failed to create Spanner admin client")?;

    let project_path = format!("projects/{}", config.spanner_project);
    let instance_path = format!("{}/instances/{}", project_path, config.spanner_instance);
    let database_path = format!("{}/databases/{}", instance_path, config.spanner_database);

    // Check and create instance if needed
    ensure_instance_exists(&admin_client, config, &project_path, &instance_path).await?;

    // Check and create database if needed
    ensure_database_exists(&admin_client, &instance_path, &database_path).await?;

    // Check and create one table per configured store if needed
    for store in &config.stores {
        ensure_table_exists(&admin_client, &database_path, &table_name(store)).await?;
    }

    tracing::info!("Auto-provisioning complete");
    Ok(())
}

/// Ensure the Spanner instance exists, creating it if necessary
async fn ensure_instance_exists(
    admin_client: &AdminClient,
    config: &Config,
    project_path: &str,
    instance_path: &str,
) -> Result<()> {
    let get_request = GetInstanceRequest {
        name: instance_path.to_string(),
        field_mask: None,
    };

    match admin_client.instance().get_instance(get_request, None).await {
        Ok(_) => {
            tracing::info!("Instance already exists: {}", instance_path);
            Ok(())
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("Instance not found, creating: {}", instance_path);

            // For emulator, use a simple config
            let instance_config = if config.spanner_emulator_host.is_some() {
                format!("{}/instanceConfigs/emulator-config", project_path)
            } else {
                // For production, use a default config (regional-us-central1)
                format!("{}/instanceConfigs/regional-us-central1", project_path)
            };

            let create_request = CreateInstanceRequest {
                parent: project_path.to_string(),
                instance_id: config.spanner_instance.clone(),
                instance: Some(Instance {
                    name: instance_path.to_string(),
                    config: instance_config,
                    display_name: format!("{} instance", config.spanner_instance),
                    node_count: 1,
                    ..Default::default()
                }),
            };

            let mut operation = admin_client
                .instance()
                .create_instance(create_request, None)
                .await
                .context("Failed to start instance creation")?;

            // Wait for the operation to complete
            operation
                .wait(None)
                .await
                .context("Failed to create instance")?;

            tracing::info!("Instance created successfully: {}", instance_path);
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(
            "Failed to check instance existence: {}",
            e.message()
        )),
    }
}

/// Ensure the Spanner database exists, creating it if necessary
async fn ensure_database_exists(
    admin_client: &AdminClient,
    instance_path: &str,
    database_path: &str,
) -> Result<()> {
    let get_request = GetDatabaseRequest {
        name: database_path.to_string(),
    };

    match admin_client
        .database()
        .get_database(get_request, None)
        .await
    {
        Ok(_) => {
            tracing::info!("Database already exists: {}", database_path);
            Ok(())
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("Database not found, creating: {}", database_path);

            let database_id = database_path
                .split('/')
                .next_back()
                .context("Invalid database path")?;

            let create_request = CreateDatabaseRequest {
                parent: instance_path.to_string(),
                create_statement: format!("CREATE DATABASE `{}`", database_id),
                extra_statements: vec![],
                encryption_config: None,
                database_dialect: 1, // Google Standard SQL
                proto_descriptors: vec![],
            };

            let mut operation = admin_client
                .database()
                .create_database(create_request, None)
                .await
                .context("Failed to start database creation")?;

            // Wait for the operation to complete
            operation
                .wait(None)
                .await
                .context("Failed to create database")?;

            tracing::info!("Database created successfully: {}", database_path);
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(
            "Failed to check database existence: {}",
            e.message()
        )),
    }
}

/// Ensure a store table exists, creating it if necessary
async fn ensure_table_exists(
    admin_client: &AdminClient,
    database_path: &str,
    table: &str,
) -> Result<()> {
    let get_ddl_request = GetDatabaseDdlRequest {
        database: database_path.to_string(),
    };

    let ddl_response = admin_client
        .database()
        .get_database_ddl(get_ddl_request, None)
        .await
        .context("Failed to get database DDL")?;

    // Check if the table exists in the DDL statements. The name must be
    // followed by a delimiter so kv_main does not match kv_main2.
    let table_exists = ddl_response.into_inner().statements.iter().any(|stmt| {
        stmt.contains(&format!("CREATE TABLE {} ", table))
            || stmt.contains(&format!("CREATE TABLE {}(", table))
            || stmt.contains(&format!("CREATE TABLE `{}`", table))
    });

    if table_exists {
        tracing::info!("Table '{}' already exists", table);
        Ok(())
    } else {
        tracing::info!("Table '{}' not found, creating...", table);

        let create_table_ddl = format!(
            r#"
CREATE TABLE {} (
    key STRING(MAX) NOT NULL,
    value BYTES(MAX) NOT NULL,
    value_type STRING(16) NOT NULL,
    created_at TIMESTAMP NOT NULL OPTIONS (allow_commit_timestamp=true),
    updated_at TIMESTAMP NOT NULL OPTIONS (allow_commit_timestamp=true),
) PRIMARY KEY (key)
"#,
            table
        )
        .trim()
        .to_string();

        let update_request = UpdateDatabaseDdlRequest {
            database: database_path.to_string(),
            statements: vec![create_table_ddl],
            operation_id: String::new(),
            proto_descriptors: vec![],
            throughput_mode: false,
        };

        let mut operation = admin_client
            .database()
            .update_database_ddl(update_request, None)
            .await
            .context("Failed to start table creation")?;

        // Wait for the DDL operation to complete
        operation
            .wait(None)
            .await
            .context("Failed to create table")?;

        tracing::info!("Table '{}' created successfully", table);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a config pointing at the emulator, or None when
    /// SPANNER_EMULATOR_HOST is not set (tests skip in that case).
    fn emulator_config(instance: &str, database: &str) -> Option<Config> {
        let host = std::env::var("SPANNER_EMULATOR_HOST").ok()?;
        Some(Config {
            spanner_emulator_host: Some(host),
            spanner_project: "test-project".to_string(),
            spanner_instance: instance.to_string(),
            spanner_database: database.to_string(),
            stores: vec!["main".to_string(), "cache".to_string()],
            api_token: "test-token".to_string(),
            service_port: 3000,
            service_host: "0.0.0.0".to_string(),
        })
    }

    async fn emulator_client(instance: &str, database: &str) -> Option<StoreClient> {
        let config = emulator_config(instance, database)?;
        match StoreClient::from_config(&config).await {
            Ok(client) => Some(client),
            Err(e) => {
                println!("Store test skipped (emulator may not be running): {}", e);
                None
            }
        }
    }

    #[test]
    fn test_value_type_round_trip() {
        assert_eq!(ValueType::Text.as_str(), "TEXT");
        assert_eq!(ValueType::Stream.as_str(), "STREAM");
        assert_eq!(ValueType::from_column("TEXT").unwrap(), ValueType::Text);
        assert_eq!(ValueType::from_column("STREAM").unwrap(), ValueType::Stream);
        assert!(ValueType::from_column("BLOB").is_err());
    }

    #[test]
    fn test_value_type_serde_names() {
        assert_eq!(serde_json::to_string(&ValueType::Text).unwrap(), "\"TEXT\"");
        assert_eq!(serde_json::to_string(&ValueType::Stream).unwrap(), "\"STREAM\"");
        let parsed: ValueType = serde_json::from_str("\"STREAM\"").unwrap();
        assert_eq!(parsed, ValueType::Stream);
    }

    #[test]
    fn test_table_name_mapping() {
        assert_eq!(table_name("main"), "kv_main");
        assert_eq!(table_name("archive_2024"), "kv_archive_2024");
    }

    #[test]
    fn test_client_is_clonable() {
        // StoreClient must be Clone to be shared across Axum handlers
        fn assert_clone<T: Clone>() {}
        assert_clone::<StoreClient>();
    }

    #[test]
    fn test_client_is_send_sync() {
        // StoreClient must be Send + Sync for use in async handlers
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StoreClient>();
    }

    #[tokio::test]
    async fn test_table_for_resolution() {
        let Some(client) = emulator_client("store-resolve-instance", "store-resolve-db").await
        else {
            return;
        };

        assert_eq!(client.table_for("main"), Some("kv_main"));
        assert_eq!(client.table_for("cache"), Some("kv_cache"));
        assert_eq!(client.table_for("missing"), None);
    }

    #[tokio::test]
    async fn test_add_get_and_has() {
        let Some(client) = emulator_client("store-crud-instance", "store-crud-db").await else {
            return;
        };
        let table = client.table_for("main").unwrap().to_string();

        let key = format!("add-{}", uuid::Uuid::new_v4());
        assert!(!client.has(&table, &key).await.unwrap());

        let added = client
            .add(&table, &key, b"hello world".to_vec(), ValueType::Text)
            .await
            .unwrap();
        assert!(added, "First add should insert");

        let entry = client.get(&table, &key).await.unwrap().unwrap();
        assert_eq!(entry.key, key);
        assert_eq!(entry.value, b"hello world".to_vec());
        assert_eq!(entry.value_type, ValueType::Text);

        assert!(client.has(&table, &key).await.unwrap());
    }

    #[tokio::test]
    async fn test_add_duplicate_key_fails() {
        let Some(client) = emulator_client("store-crud-instance", "store-crud-db").await else {
            return;
        };
        let table = client.table_for("main").unwrap().to_string();

        let key = format!("dup-{}", uuid::Uuid::new_v4());
        let first = client
            .add(&table, &key, b"first".to_vec(), ValueType::Text)
            .await
            .unwrap();
        assert!(first);

        let second = client
            .add(&table, &key, b"second".to_vec(), ValueType::Text)
            .await
            .unwrap();
        assert!(!second, "Duplicate add must be rejected");

        // The original value survives
        let entry = client.get(&table, &key).await.unwrap().unwrap();
        assert_eq!(entry.value, b"first".to_vec());
    }

    #[tokio::test]
    async fn test_update_existing_and_missing() {
        let Some(client) = emulator_client("store-crud-instance", "store-crud-db").await else {
            return;
        };
        let table = client.table_for("main").unwrap().to_string();

        let key = format!("upd-{}", uuid::Uuid::new_v4());
        let missing = client
            .update(&table, &key, b"x".to_vec(), ValueType::Text)
            .await
            .unwrap();
        assert!(!missing, "Update of a missing key must be rejected");

        client
            .add(&table, &key, b"v1".to_vec(), ValueType::Text)
            .await
            .unwrap();
        let before = client.get(&table, &key).await.unwrap().unwrap();

        let updated = client
            .update(&table, &key, vec![0, 159, 146, 150], ValueType::Stream)
            .await
            .unwrap();
        assert!(updated);

        let after = client.get(&table, &key).await.unwrap().unwrap();
        assert_eq!(after.value, vec![0, 159, 146, 150]);
        assert_eq!(after.value_type, ValueType::Stream);
        assert_eq!(after.created_at, before.created_at, "created_at is preserved");
        assert!(after.updated_at >= before.updated_at);
    }

    #[tokio::test]
    async fn test_delete_existing_and_missing() {
        let Some(client) = emulator_client("store-crud-instance", "store-crud-db").await else {
            return;
        };
        let table = client.table_for("main").unwrap().to_string();

        let key = format!("del-{}", uuid::Uuid::new_v4());
        assert!(!client.delete(&table, &key).await.unwrap());

        client
            .add(&table, &key, b"bye".to_vec(), ValueType::Text)
            .await
            .unwrap();
        assert!(client.delete(&table, &key).await.unwrap());
        assert!(client.get(&table, &key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_removes_every_listed_key() {
        // Use a dedicated database so clear() sees only this test's data
        let Some(client) = emulator_client("store-clear-instance", "store-clear-db").await else {
            return;
        };
        let table = client.table_for("cache").unwrap().to_string();

        for i in 0..4 {
            client
                .add(
                    &table,
                    &format!("clear-{:02}", i),
                    format!("value-{}", i).into_bytes(),
                    ValueType::Text,
                )
                .await
                .unwrap();
        }
        assert_eq!(client.keys(&table).await.unwrap().len(), 4);

        let deleted = client.clear(&table).await.unwrap();
        assert_eq!(deleted, 4);
        assert!(client.keys(&table).await.unwrap().is_empty());
        assert_eq!(client.get_all(&table).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_stores_are_isolated() {
        let Some(client) = emulator_client("store-isolate-instance", "store-isolate-db").await
        else {
            return;
        };
        let main = client.table_for("main").unwrap().to_string();
        let cache = client.table_for("cache").unwrap().to_string();

        let key = format!("iso-{}", uuid::Uuid::new_v4());
        client
            .add(&main, &key, b"only in main".to_vec(), ValueType::Text)
            .await
            .unwrap();

        assert!(client.has(&main, &key).await.unwrap());
        assert!(!client.has(&cache, &key).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_prefix_and_pagination() {
        let Some(client) = emulator_client("store-list-instance", "store-list-db").await else {
            return;
        };
        let table = client.table_for("main").unwrap().to_string();

        let prefix = format!("list-{}-", uuid::Uuid::new_v4());
        for i in 0..5 {
            client
                .add(
                    &table,
                    &format!("{}{}", prefix, i),
                    format!("{}", i).into_bytes(),
                    ValueType::Text,
                )
                .await
                .unwrap();
        }

        // Prefix filter
        let result = client
            .list(&table, Some(&prefix), SortOrder::KeyAsc, None, 0)
            .await
            .unwrap();
        assert_eq!(result.entries.len(), 5);
        assert_eq!(result.total_count, 5);
        assert_eq!(result.entries[0].key, format!("{}0", prefix));

        // Limit
        let result = client
            .list(&table, Some(&prefix), SortOrder::KeyAsc, Some(2), 0)
            .await
            .unwrap();
        assert_eq!(result.entries.len(), 2);
        assert_eq!(result.total_count, 5, "total_count ignores the limit");

        // Limit + offset
        let result = client
            .list(&table, Some(&prefix), SortOrder::KeyAsc, Some(2), 2)
            .await
            .unwrap();
        assert_eq!(result.entries.len(), 2);
        assert_eq!(result.entries[0].key, format!("{}2", prefix));

        // Descending
        let result = client
            .list(&table, Some(&prefix), SortOrder::KeyDesc, None, 0)
            .await
            .unwrap();
        assert_eq!(result.entries[0].key, format!("{}4", prefix));

        // Non-matching prefix
        let result = client
            .list(&table, Some("list-nothing-"), SortOrder::KeyAsc, None, 0)
            .await
            .unwrap();
        assert_eq!(result.entries.len(), 0);
        assert_eq!(result.total_count, 0);
    }

    #[tokio::test]
    async fn test_stream_value_round_trip() {
        let Some(client) = emulator_client("store-bytes-instance", "store-bytes-db").await else {
            return;
        };
        let table = client.table_for("main").unwrap().to_string();

        let key = format!("bin-{}", uuid::Uuid::new_v4());
        let payload: Vec<u8> = (0..=255).collect();
        client
            .add(&table, &key, payload.clone(), ValueType::Stream)
            .await
            .unwrap();

        let entry = client.get(&table, &key).await.unwrap().unwrap();
        assert_eq!(entry.value, payload, "Binary values must be byte-identical");
        assert_eq!(entry.value_type, ValueType::Stream);
    }
}
