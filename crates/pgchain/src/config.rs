use crate::error::{DbError, DbResult};
use std::time::Duration;

/// Environment variable read by [`ManagerConfig::from_env`].
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Configuration for a [`DatabaseManager`](crate::DatabaseManager).
#[derive(Clone)]
pub struct ManagerConfig {
    /// Postgres connection URL or key/value string.
    pub database_url: String,
    /// Label attached to log events.
    pub name: String,
    /// Connect timeout passed to the driver.
    pub connect_timeout: Option<Duration>,
    /// `application_name` reported to the server.
    pub application_name: Option<String>,
}

impl ManagerConfig {
    /// Create a configuration with defaults.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            name: "default".to_string(),
            connect_timeout: None,
            application_name: None,
        }
    }

    /// Read the connection URL from `DATABASE_URL`.
    pub fn from_env() -> DbResult<Self> {
        let url = std::env::var(DATABASE_URL_ENV)
            .map_err(|_| DbError::configuration(format!("{DATABASE_URL_ENV} is not set")))?;
        Ok(Self::new(url))
    }

    /// Set the log label.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set `application_name`.
    pub fn application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = Some(name.into());
        self
    }

    /// Parse the URL and apply the optional settings.
    pub(crate) fn to_pg_config(&self) -> DbResult<tokio_postgres::Config> {
        let mut pg_config: tokio_postgres::Config = self
            .database_url
            .parse()
            .map_err(|e: tokio_postgres::Error| {
                DbError::configuration(format!("invalid database URL: {e}"))
            })?;
        if let Some(timeout) = self.connect_timeout {
            pg_config.connect_timeout(timeout);
        }
        if let Some(name) = &self.application_name {
            pg_config.application_name(name);
        }
        Ok(pg_config)
    }
}

// The URL may carry a password, so it is never printed.
impl std::fmt::Debug for ManagerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagerConfig")
            .field("name", &self.name)
            .field("connect_timeout", &self.connect_timeout)
            .field("application_name", &self.application_name)
            .finish_non_exhaustive()
    }
}
