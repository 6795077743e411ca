//! DuckDB connection manager

use crate::error::{DbError, DbResult};
use crate::traits::{ConnectionManager, Session, SqlParam};
use duckdb::types::{ToSql, ToSqlOutput, Value};
use duckdb::{params_from_iter, Connection};
use std::path::Path;
use std::sync::Mutex;
use uj_core::DatabaseConfig;

/// Text form timestamps are bound in; DuckDB casts it back to `TIMESTAMP`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

impl ToSql for SqlParam {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlParam::Text(s) => ToSqlOutput::Owned(Value::Text(s.clone())),
            SqlParam::Int(n) => ToSqlOutput::Owned(Value::BigInt(*n)),
            SqlParam::Timestamp(ts) => {
                ToSqlOutput::Owned(Value::Text(ts.format(TIMESTAMP_FORMAT).to_string()))
            }
        })
    }
}

/// DuckDB connection manager
///
/// Holds one connection behind a mutex; each managed call locks it for the
/// duration of the closure.
pub struct DuckDbConnectionManager {
    conn: Mutex<Connection>,
}

impl DuckDbConnectionManager {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self::from_connection(conn))
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self::from_connection(conn))
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    /// Create from the `database` section of the config
    pub fn from_config(config: &DatabaseConfig) -> DbResult<Self> {
        Self::new(&config.path)
    }

    /// Wrap an already-open connection
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

impl ConnectionManager for DuckDbConnectionManager {
    fn execute_with_managed_connection<T, E, F>(&self, action: F) -> Result<T, E>
    where
        F: FnOnce(&dyn Session) -> Result<T, E>,
        E: From<DbError>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))?;
        let session = DuckDbSession { conn: &*guard };
        action(&session)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

/// Session borrowing the locked connection
struct DuckDbSession<'a> {
    conn: &'a Connection,
}

impl Session for DuckDbSession<'_> {
    fn execute(&self, sql: &str, params: &[SqlParam]) -> DbResult<usize> {
        log::debug!("execute: {sql}");
        Ok(self.conn.execute(sql, params_from_iter(params.iter()))?)
    }

    fn execute_batch(&self, sql: &str) -> DbResult<()> {
        log::debug!("execute_batch: {sql}");
        Ok(self.conn.execute_batch(sql)?)
    }

    fn query_column(&self, sql: &str, params: &[SqlParam]) -> DbResult<Vec<String>> {
        log::debug!("query_column: {sql}");
        let mut stmt = self.conn.prepare(sql)?;
        let values: Vec<String> = stmt
            .query_map(params_from_iter(params.iter()), |row| {
                Ok(get_column_as_string(row, 0))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(values)
    }

    fn query_scalar(&self, sql: &str, params: &[SqlParam]) -> DbResult<Option<i64>> {
        log::debug!("query_scalar: {sql}");
        match self.conn.query_row(sql, params_from_iter(params.iter()), |row| {
            row.get::<_, Option<i64>>(0)
        }) {
            Ok(value) => Ok(value),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn query_rows(&self, sql: &str, params: &[SqlParam]) -> DbResult<Vec<Vec<String>>> {
        log::debug!("query_rows: {sql}");
        let mut stmt = self.conn.prepare(sql)?;
        // DuckDB panics on column_count() before execution, so read the
        // count from each row instead.
        let rows: Vec<Vec<String>> = stmt
            .query_map(params_from_iter(params.iter()), |row| {
                let col_count = row.as_ref().column_count();
                Ok((0..col_count)
                    .map(|i| get_column_as_string(row, i))
                    .collect())
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

/// Read a column value as a String, trying multiple DuckDB types.
///
/// DuckDB integer columns return `None` for `Option<String>`, so we try
/// String -> i64 -> f64 -> bool -> "null".
fn get_column_as_string(row: &duckdb::Row<'_>, idx: usize) -> String {
    if let Ok(Some(s)) = row.get::<_, Option<String>>(idx) {
        return s;
    }
    if let Ok(Some(n)) = row.get::<_, Option<i64>>(idx) {
        return n.to_string();
    }
    if let Ok(Some(f)) = row.get::<_, Option<f64>>(idx) {
        return f.to_string();
    }
    if let Ok(Some(b)) = row.get::<_, Option<bool>>(idx) {
        return b.to_string();
    }
    "null".to_string()
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
