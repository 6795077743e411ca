//! uj-db - Connection layer for Upjournal
//!
//! This crate provides the `ConnectionManager` / `Session` traits the journal
//! executes through, and a DuckDB implementation of them.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use self::duckdb::DuckDbConnectionManager;
pub use error::{DbError, DbResult};
pub use traits::{ConnectionManager, Session, SqlParam};
