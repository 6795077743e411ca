//! Connection-executor traits
//!
//! A [`ConnectionManager`] owns connection lifetime and lends a [`Session`]
//! for the duration of one closure. Callers never hold a session across
//! operations.

use crate::error::{DbError, DbResult};
use chrono::NaiveDateTime;
use std::sync::Arc;

/// A value bound to a positional statement parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    /// Text value
    Text(String),
    /// Integer value
    Int(i64),
    /// Timestamp without time zone (UTC by convention)
    Timestamp(NaiveDateTime),
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        SqlParam::Int(value)
    }
}

impl From<NaiveDateTime> for SqlParam {
    fn from(value: NaiveDateTime) -> Self {
        SqlParam::Timestamp(value)
    }
}

/// Command surface of an open connection
pub trait Session {
    /// Execute one statement, returning affected rows
    fn execute(&self, sql: &str, params: &[SqlParam]) -> DbResult<usize>;

    /// Execute one or more statements without parameters
    fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Return the first column of every row as text
    fn query_column(&self, sql: &str, params: &[SqlParam]) -> DbResult<Vec<String>>;

    /// Return the first column of the first row as an integer
    ///
    /// `None` when the query yields no rows or a NULL.
    fn query_scalar(&self, sql: &str, params: &[SqlParam]) -> DbResult<Option<i64>>;

    /// Return every column of every row as text (`"null"` for NULL)
    fn query_rows(&self, sql: &str, params: &[SqlParam]) -> DbResult<Vec<Vec<String>>>;

    /// Run a count-style introspection query and report whether it found anything
    ///
    /// A backend "object not found" error answers `false` rather than
    /// failing; any other error propagates.
    fn probe(&self, sql: &str, params: &[SqlParam]) -> DbResult<bool> {
        match self.query_scalar(sql, params) {
            Ok(count) => Ok(count.unwrap_or(0) > 0),
            Err(DbError::ObjectNotFound(msg)) => {
                log::debug!("probe treated missing object as absent: {msg}");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

/// Owner of connection lifetime
pub trait ConnectionManager {
    /// Lend a session to `action`, releasing it on every exit path
    ///
    /// Errors acquiring the connection convert into the caller's error type.
    fn execute_with_managed_connection<T, E, F>(&self, action: F) -> Result<T, E>
    where
        F: FnOnce(&dyn Session) -> Result<T, E>,
        E: From<DbError>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}

impl<C: ConnectionManager> ConnectionManager for &C {
    fn execute_with_managed_connection<T, E, F>(&self, action: F) -> Result<T, E>
    where
        F: FnOnce(&dyn Session) -> Result<T, E>,
        E: From<DbError>,
    {
        (**self).execute_with_managed_connection(action)
    }

    fn db_type(&self) -> &'static str {
        (**self).db_type()
    }
}

impl<C: ConnectionManager> ConnectionManager for Arc<C> {
    fn execute_with_managed_connection<T, E, F>(&self, action: F) -> Result<T, E>
    where
        F: FnOnce(&dyn Session) -> Result<T, E>,
        E: From<DbError>,
    {
        (**self).execute_with_managed_connection(action)
    }

    fn db_type(&self) -> &'static str {
        (**self).db_type()
    }
}
