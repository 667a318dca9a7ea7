//! The single-connection database manager.
//!
//! A [`DatabaseManager`] owns at most one `tokio_postgres::Client` plus the
//! spawned task that drives its socket. It is the entry point for every
//! statement builder.
//!
//! # Concurrency
//!
//! There is no pool and no internal locking. Lifecycle methods take
//! `&mut self`; statements take `&self` and are pipelined by the driver when
//! issued concurrently on one manager. Independent managers share nothing
//! and may connect or disconnect from separate tasks at the same time.
//!
//! # Example
//!
//! ```ignore
//! use pgchain::prelude::*;
//!
//! let mut db = DatabaseManager::new(ManagerConfig::from_env()?);
//! db.connect().await?;
//! let rows = db.select_all().from("users").where_("age").greater_than(18).execute().await?;
//! db.disconnect().await;
//! ```

use crate::aggregate::SelectField;
use crate::builder::{DeleteQuery, InsertQuery, SelectQuery, UpdateQuery};
use crate::config::ManagerConfig;
use crate::ddl::{AlterTable, CreateTable, DropTable, TruncateTable};
use crate::error::{DbError, DbResult};
use crate::param::ParamList;
use crate::record::Record;
use crate::value::Value;
use tokio::task::JoinHandle;
use tokio_postgres::{Client, NoTls};
use tracing::{debug, error, info};

struct Connection {
    client: Client,
    driver: JoinHandle<()>,
}

/// Owns one lazily established Postgres connection.
pub struct DatabaseManager {
    config: ManagerConfig,
    connection: Option<Connection>,
}

impl DatabaseManager {
    /// Create a disconnected manager.
    pub fn new(config: ManagerConfig) -> Self {
        Self {
            config,
            connection: None,
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Open the connection. Calling it while connected is a no-op.
    pub async fn connect(&mut self) -> DbResult<()> {
        let name = self.config.name.clone();
        if self.connection.is_some() {
            debug!(database = %name, "already connected");
            return Ok(());
        }

        let pg_config = match self.config.to_pg_config() {
            Ok(c) => c,
            Err(err) => {
                error!(database = %name, error = %err, "failed to connect to database");
                return Err(err);
            }
        };

        let (client, connection) = match pg_config.connect(NoTls).await {
            Ok(pair) => pair,
            Err(err) => {
                error!(database = %name, error = %err, "failed to connect to database");
                return Err(DbError::Connection(err.to_string()));
            }
        };

        let driver_name = name.clone();
        let driver = tokio::spawn(async move {
            if let Err(err) = connection.await {
                error!(database = %driver_name, error = %err, "connection driver stopped with an error");
            }
        });

        self.connection = Some(Connection { client, driver });
        info!(database = %name, "connected to database");
        Ok(())
    }

    /// Close the connection. Always leaves the manager disconnected; failures
    /// are logged, not returned.
    pub async fn disconnect(&mut self) {
        let name = &self.config.name;
        let Some(Connection { client, driver }) = self.connection.take() else {
            debug!(database = %name, "already disconnected");
            return;
        };

        // Dropping the last client handle ends the driver future.
        drop(client);
        match driver.await {
            Ok(()) => info!(database = %name, "disconnected from database"),
            Err(err) => error!(database = %name, error = %err, "error while disconnecting"),
        }
    }

    fn client(&self) -> DbResult<&Client> {
        let connection = self.connection.as_ref().ok_or(DbError::NotConnected)?;
        if connection.client.is_closed() {
            return Err(DbError::ConnectionClosed);
        }
        Ok(&connection.client)
    }

    /// Log a failed statement with its table, SQL and parameters.
    fn failure(&self, table: &str, sql: &str, params: &ParamList, err: DbError) -> DbError {
        error!(
            database = %self.config.name,
            table,
            sql,
            params = ?params.as_slice(),
            error = %err,
            "statement failed"
        );
        err
    }

    /// Run a row-producing statement and normalize every row.
    pub async fn fetch(&self, table: &str, sql: &str, params: &ParamList) -> DbResult<Vec<Record>> {
        debug!(database = %self.config.name, table, sql, params = params.len(), "query");
        self.try_fetch(sql, params)
            .await
            .map_err(|e| self.failure(table, sql, params, e))
    }

    /// Run a statement and return the affected row count (0 when unreported).
    pub async fn execute(&self, table: &str, sql: &str, params: &ParamList) -> DbResult<u64> {
        debug!(database = %self.config.name, table, sql, params = params.len(), "execute");
        self.try_execute(sql, params)
            .await
            .map_err(|e| self.failure(table, sql, params, e))
    }

    async fn try_fetch(&self, sql: &str, params: &ParamList) -> DbResult<Vec<Record>> {
        let rows = self
            .client()?
            .query(sql, &params.as_refs())
            .await
            .map_err(from_driver)?;
        rows.iter().map(Record::from_row).collect()
    }

    async fn try_execute(&self, sql: &str, params: &ParamList) -> DbResult<u64> {
        self.client()?
            .execute(sql, &params.as_refs())
            .await
            .map_err(from_driver)
    }

    // ==================== Statement entry points ====================

    /// `SELECT fields ...`. An empty field list selects `*`.
    pub fn select<I, F>(&self, fields: I) -> SelectQuery<'_>
    where
        I: IntoIterator<Item = F>,
        F: Into<SelectField>,
    {
        SelectQuery::new(self, fields)
    }

    /// `SELECT * ...`
    pub fn select_all(&self) -> SelectQuery<'_> {
        SelectQuery::new(self, std::iter::empty::<SelectField>())
    }

    pub fn insert(&self) -> InsertQuery<'_> {
        InsertQuery::new(self)
    }

    pub fn insert_into(&self, table: impl Into<String>) -> InsertQuery<'_> {
        InsertQuery::new(self).into(table)
    }

    pub fn update(&self, table: impl Into<String>) -> UpdateQuery<'_> {
        UpdateQuery::new(self, table)
    }

    pub fn delete(&self) -> DeleteQuery<'_> {
        DeleteQuery::new(self)
    }

    pub fn delete_from(&self, table: impl Into<String>) -> DeleteQuery<'_> {
        DeleteQuery::new(self).from(table)
    }

    pub fn create_table(&self, name: impl Into<String>) -> CreateTable<'_> {
        CreateTable::new(self, name)
    }

    pub fn alter_table(&self, name: impl Into<String>) -> AlterTable<'_> {
        AlterTable::new(self, name)
    }

    pub fn drop_table(&self, name: impl Into<String>) -> DropTable<'_> {
        DropTable::new(self, name)
    }

    pub fn truncate_table(&self, name: impl Into<String>) -> TruncateTable<'_> {
        TruncateTable::new(self, name)
    }

    /// Names of the base tables in `schema`, sorted.
    pub async fn list_tables(&self, schema: &str) -> DbResult<Vec<String>> {
        let rows = self
            .select(["table_name"])
            .from("information_schema.tables")
            .where_("table_schema")
            .equals(schema)
            .and_where("table_type")
            .equals("BASE TABLE")
            .order_by("table_name")
            .execute()
            .await?;

        Ok(rows
            .iter()
            .filter_map(|row| row.get("table_name").and_then(Value::as_str))
            .map(str::to_string)
            .collect())
    }
}

/// A driver error on a connection that has gone away is `ConnectionClosed`.
fn from_driver(err: tokio_postgres::Error) -> DbError {
    if err.is_closed() {
        DbError::ConnectionClosed
    } else {
        DbError::Backend(err)
    }
}

impl std::fmt::Debug for DatabaseManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseManager")
            .field("config", &self.config)
            .field("connected", &self.is_connected())
            .finish()
    }
}
