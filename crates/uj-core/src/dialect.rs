//! Backend dialect descriptions and identifier quoting.
//!
//! A [`Dialect`] is a small description value: how identifiers are quoted,
//! how bind parameters are written, which expression names the connection's
//! current schema, and the column types the journal table is built from.
//! Statement text is assembled from these pieces by `uj-journal`.
//!
//! Identifiers cannot be bound as parameters, so every schema, table, and
//! column name is validated and quoted before it is spliced into SQL.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum identifier length accepted by every supported backend.
///
/// PostgreSQL truncates at 63 bytes, MySQL at 64 characters and SQL Server at
/// 128 characters; the journal rejects anything longer than the loosest one.
pub const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Supported journal backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Microsoft SQL Server
    SqlServer,
    /// MySQL / MariaDB
    MySql,
    /// PostgreSQL
    Postgres,
    /// DuckDB (default)
    #[default]
    DuckDb,
}

/// How a dialect delimits identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    /// `[name]`, closing bracket doubled
    Brackets,
    /// `` `name` ``, backtick doubled
    Backticks,
    /// `"name"`, double quote doubled
    DoubleQuotes,
}

/// How a dialect writes positional bind parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `@P1`, `@P2`, ...
    AtP,
    /// `?` for every parameter
    Question,
    /// `$1`, `$2`, ...
    Dollar,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::SqlServer => write!(f, "sqlserver"),
            Dialect::MySql => write!(f, "mysql"),
            Dialect::Postgres => write!(f, "postgres"),
            Dialect::DuckDb => write!(f, "duckdb"),
        }
    }
}

impl Dialect {
    /// Identifier quoting used by this backend.
    pub fn quote_style(self) -> QuoteStyle {
        match self {
            Dialect::SqlServer => QuoteStyle::Brackets,
            Dialect::MySql => QuoteStyle::Backticks,
            Dialect::Postgres | Dialect::DuckDb => QuoteStyle::DoubleQuotes,
        }
    }

    /// Bind parameter syntax used by this backend.
    pub fn placeholder_style(self) -> PlaceholderStyle {
        match self {
            Dialect::SqlServer => PlaceholderStyle::AtP,
            Dialect::MySql | Dialect::DuckDb => PlaceholderStyle::Question,
            Dialect::Postgres => PlaceholderStyle::Dollar,
        }
    }

    /// Placeholder text for the 1-based parameter `position`.
    pub fn placeholder(self, position: usize) -> String {
        match self.placeholder_style() {
            PlaceholderStyle::AtP => format!("@P{position}"),
            PlaceholderStyle::Question => "?".to_string(),
            PlaceholderStyle::Dollar => format!("${position}"),
        }
    }

    /// SQL expression naming the schema unqualified objects resolve to.
    ///
    /// Used by the introspection queries when the journal table has no
    /// explicit schema.
    pub fn current_schema_expr(self) -> &'static str {
        match self {
            Dialect::SqlServer => "SCHEMA_NAME()",
            Dialect::MySql => "DATABASE()",
            Dialect::Postgres | Dialect::DuckDb => "current_schema()",
        }
    }

    /// Whether quoted identifiers resolve regardless of case.
    ///
    /// DuckDB keeps the case it was given but matches names case-insensitively,
    /// so introspection must compare the same way or it disagrees with the
    /// statements that follow it.
    pub fn case_insensitive_identifiers(self) -> bool {
        matches!(self, Dialect::DuckDb)
    }

    /// Column type for script names.
    pub fn script_name_type(self) -> &'static str {
        match self {
            Dialect::SqlServer => "NVARCHAR(255)",
            Dialect::MySql | Dialect::Postgres | Dialect::DuckDb => "VARCHAR(255)",
        }
    }

    /// Column type for the applied timestamp.
    pub fn timestamp_type(self) -> &'static str {
        match self {
            Dialect::SqlServer => "DATETIME",
            Dialect::MySql | Dialect::Postgres | Dialect::DuckDb => "TIMESTAMP",
        }
    }

    /// Column type for batch numbers.
    pub fn integer_type(self) -> &'static str {
        match self {
            Dialect::SqlServer | Dialect::MySql => "INT",
            Dialect::Postgres | Dialect::DuckDb => "INTEGER",
        }
    }

    /// Whether `ALTER TABLE ... ADD` accepts a `NOT NULL` constraint.
    ///
    /// DuckDB refuses constraints on added columns; the `DEFAULT` still
    /// back-fills existing rows.
    pub fn supports_not_null_on_add_column(self) -> bool {
        !matches!(self, Dialect::DuckDb)
    }

    /// Keyword sequence introducing an added column.
    pub fn add_column_keyword(self) -> &'static str {
        match self {
            Dialect::SqlServer => "ADD",
            Dialect::MySql | Dialect::Postgres | Dialect::DuckDb => "ADD COLUMN",
        }
    }

    /// Render `expr` as text, for reading timestamps back portably.
    pub fn cast_to_text(self, expr: &str) -> String {
        match self {
            Dialect::SqlServer => format!("CONVERT(VARCHAR(33), {expr}, 126)"),
            Dialect::MySql => format!("CAST({expr} AS CHAR)"),
            Dialect::Postgres => format!("CAST({expr} AS TEXT)"),
            Dialect::DuckDb => format!("CAST({expr} AS VARCHAR)"),
        }
    }

    /// Bind expression for a timestamp parameter.
    ///
    /// DuckDB receives timestamps as text and needs an explicit cast.
    pub fn timestamp_param(self, position: usize) -> String {
        match self {
            Dialect::DuckDb => format!("CAST({} AS TIMESTAMP)", self.placeholder(position)),
            _ => self.placeholder(position),
        }
    }

    /// Validate and quote a single identifier.
    pub fn quote_ident(self, ident: &str) -> CoreResult<String> {
        validate_identifier(ident)?;
        Ok(match self.quote_style() {
            QuoteStyle::Brackets => format!("[{}]", ident.replace(']', "]]")),
            QuoteStyle::Backticks => format!("`{}`", ident.replace('`', "``")),
            QuoteStyle::DoubleQuotes => format!("\"{}\"", ident.replace('"', "\"\"")),
        })
    }

    /// Quote an optionally schema-qualified name.
    ///
    /// Unlike splitting on `.`, the schema and object are passed separately,
    /// so dots inside either part stay literal.
    pub fn quote_qualified(self, schema: Option<&str>, name: &str) -> CoreResult<String> {
        match schema {
            Some(schema) => Ok(format!(
                "{}.{}",
                self.quote_ident(schema)?,
                self.quote_ident(name)?
            )),
            None => self.quote_ident(name),
        }
    }
}

/// Reject identifiers no backend can safely quote.
///
/// Rejects empty names, names with a NUL byte, and names longer than
/// [`MAX_IDENTIFIER_LENGTH`] bytes.
pub fn validate_identifier(name: &str) -> CoreResult<()> {
    let reason = if name.is_empty() {
        "identifier cannot be empty".to_string()
    } else if name.contains('\0') {
        "identifier contains a NUL byte".to_string()
    } else if name.len() > MAX_IDENTIFIER_LENGTH {
        format!(
            "identifier exceeds {MAX_IDENTIFIER_LENGTH} bytes (got {})",
            name.len()
        )
    } else {
        return Ok(());
    };
    Err(CoreError::InvalidIdentifier {
        name: name.to_string(),
        reason,
    })
}

/// Escape a SQL string literal value by doubling single quotes.
///
/// This is for use inside single-quoted SQL string literals, not identifiers.
pub fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}

#[cfg(test)]
#[path = "dialect_test.rs"]
mod tests;
