//! Error types for sqlstmt
//!
//! Building a statement never fails. These errors come from the execution
//! layer only (see [`crate::client::Database`]).

use thiserror::Error;

/// Result type alias for sqlstmt operations
pub type StmtResult<T> = Result<T, StmtError>;

/// Error types for database operations
#[derive(Debug, Error)]
pub enum StmtError {
    /// The database handle has not been opened (or was closed)
    #[error("Database is not open")]
    NotOpen,

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error reported by SQLite
    #[cfg(feature = "sqlite")]
    #[error("Query error: {0}")]
    Query(#[from] rusqlite::Error),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// A query hook refused to let the statement run
    #[error("Query aborted: {0}")]
    Aborted(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl StmtError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Check if this error was caused by using a closed database
    pub fn is_not_open(&self) -> bool {
        matches!(self, Self::NotOpen)
    }

    /// Check if this is a constraint violation (UNIQUE, FOREIGN KEY, CHECK, ...)
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Query(rusqlite::Error::SqliteFailure(err, _)) => {
                err.code == rusqlite::ErrorCode::ConstraintViolation
            }
            _ => false,
        }
    }
}
