//! Error types for uj-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Table, view, or column not found (D003)
    #[error("[D003] Database object not found: {0}")]
    ObjectNotFound(String),

    /// Mutex poisoned (D004)
    #[error("[D004] Database mutex poisoned: {0}")]
    MutexPoisoned(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// Whether the backend reported a missing table, view, or column.
    pub fn is_object_not_found(&self) -> bool {
        matches!(self, DbError::ObjectNotFound(_))
    }
}

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        // duckdb::Error does not expose structured variants, so string
        // matching is the only reliable approach. Name patterns alone also
        // match "already exists", so a missing-object phrase is required too.
        let msg = err.to_string();
        let names_object = msg.contains("Table with name")
            || msg.contains("View with name")
            || msg.contains("Table or view with name")
            || (msg.contains("Catalog Error") && msg.contains("Table"))
            || (msg.contains("Binder Error") && msg.contains("Referenced column"));
        let reports_missing = msg.contains("does not exist") || msg.contains("not found");
        if names_object && reports_missing && !msg.contains("already exists") {
            DbError::ObjectNotFound(msg)
        } else {
            DbError::ExecutionError(msg)
        }
    }
}
