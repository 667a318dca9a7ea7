//! Error types for pgchain

use thiserror::Error;

/// Result type alias for pgchain operations
pub type DbResult<T> = Result<T, DbError>;

/// Error types for statement building and execution
#[derive(Debug, Error)]
pub enum DbError {
    /// A required clause is missing (no FROM, no SET/VALUES, no columns).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed operator input or identifier.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// UPDATE/DELETE without a WHERE clause.
    #[error("Unsafe operation: {0}")]
    UnsafeOperation(String),

    /// A statement was executed before `connect()`.
    #[error("Not connected to database. Call connect() first.")]
    NotConnected,

    /// The held connection reports closed.
    #[error("Connection is closed or invalid")]
    ConnectionClosed,

    /// Establishing the connection failed.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Any failure reported by the backend during execution.
    #[error("Backend error: {0}")]
    Backend(#[from] tokio_postgres::Error),

    /// An explicitly unfinished path.
    #[error("Not implemented: {0}")]
    NotImplemented(String),
}

impl DbError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create an unsafe operation error
    pub fn unsafe_operation(message: impl Into<String>) -> Self {
        Self::UnsafeOperation(message.into())
    }

    /// Create a not implemented error
    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::NotImplemented(message.into())
    }

    /// Check if this is an unsafe operation error
    pub fn is_unsafe_operation(&self) -> bool {
        matches!(self, Self::UnsafeOperation(_))
    }

    /// Check if this is a not connected error
    pub fn is_not_connected(&self) -> bool {
        matches!(self, Self::NotConnected)
    }

    /// SQLSTATE code of a backend error, if the server reported one.
    pub fn sqlstate(&self) -> Option<&str> {
        match self {
            Self::Backend(err) => err.as_db_error().map(|db_err| db_err.code().code()),
            _ => None,
        }
    }

    /// Check if this is a unique constraint violation (SQLSTATE 23505)
    pub fn is_unique_violation(&self) -> bool {
        self.sqlstate() == Some("23505")
    }
}
