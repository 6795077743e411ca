//! Journal table descriptor.

use crate::dialect::{validate_identifier, Dialect};
use crate::error::CoreResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Table name used when none is configured.
pub const DEFAULT_TABLE_NAME: &str = "SchemaVersions";

/// Where the journal keeps its records: an optional schema plus a table name.
///
/// Without a schema the table lives in the connection's current schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JournalTable {
    schema: Option<String>,
    table: String,
}

impl JournalTable {
    /// Create a descriptor, validating both parts as identifiers.
    pub fn new(schema: Option<&str>, table: &str) -> CoreResult<Self> {
        if let Some(schema) = schema {
            validate_identifier(schema)?;
        }
        validate_identifier(table)?;
        Ok(Self {
            schema: schema.map(str::to_string),
            table: table.to_string(),
        })
    }

    /// Schema name, if one was configured.
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Unquoted table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Fully-qualified, dialect-quoted identifier.
    pub fn qualified_name(&self, dialect: Dialect) -> CoreResult<String> {
        dialect.quote_qualified(self.schema(), &self.table)
    }
}

impl Default for JournalTable {
    fn default() -> Self {
        Self {
            schema: None,
            table: DEFAULT_TABLE_NAME.to_string(),
        }
    }
}

impl fmt::Display for JournalTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.table),
            None => f.write_str(&self.table),
        }
    }
}
