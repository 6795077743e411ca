//! Per-dialect statement text for the journal table.
//!
//! [`JournalSql`] resolves the table descriptor once into a quoted,
//! qualified name and renders every statement the journal issues. Values are
//! always bound as parameters; only identifiers are spliced into the text.

use crate::schema::{
    ColumnEvolution, APPLIED_COLUMN, BATCH_NUMBER_COLUMN, EVOLUTIONS, ID_COLUMN,
    SCRIPT_NAME_COLUMN,
};
use chrono::NaiveDateTime;
use uj_core::dialect::escape_sql_string;
use uj_core::{CoreError, CoreResult, Dialect, JournalTable};
use uj_db::SqlParam;

/// Statement text plus its bound parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// SQL text with dialect placeholders
    pub sql: String,
    /// Values for the placeholders, in order
    pub params: Vec<SqlParam>,
}

/// Collects parameters and hands out matching placeholders.
struct Binder {
    dialect: Dialect,
    params: Vec<SqlParam>,
}

impl Binder {
    fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            params: Vec::new(),
        }
    }

    fn bind(&mut self, value: impl Into<SqlParam>) -> String {
        let value = value.into();
        let is_timestamp = matches!(value, SqlParam::Timestamp(_));
        self.params.push(value);
        let position = self.params.len();
        if is_timestamp {
            self.dialect.timestamp_param(position)
        } else {
            self.dialect.placeholder(position)
        }
    }

    fn finish(self, sql: String) -> Statement {
        Statement {
            sql,
            params: self.params,
        }
    }
}

/// Statement generator for one journal table on one dialect
#[derive(Debug, Clone)]
pub struct JournalSql {
    dialect: Dialect,
    table: JournalTable,
    qualified: String,
    id: String,
    script_name: String,
    applied: String,
    batch_number: String,
    id_definition: String,
    id_constraint: Option<String>,
    /// DuckDB sequence feeding `Id`
    sequence: Option<String>,
}

impl JournalSql {
    /// Resolve `table` for `dialect`, rejecting names that cannot be quoted.
    ///
    /// Derived names (the DuckDB sequence, the SQL Server primary key) are
    /// checked here too, so a bad descriptor fails before anything is written.
    pub fn new(dialect: Dialect, table: JournalTable) -> CoreResult<Self> {
        let id = dialect.quote_ident(ID_COLUMN)?;
        let IdColumn {
            definition: id_definition,
            constraint: id_constraint,
            sequence,
        } = id_column(dialect, &table, &id)?;
        Ok(Self {
            qualified: table.qualified_name(dialect)?,
            script_name: dialect.quote_ident(SCRIPT_NAME_COLUMN)?,
            applied: dialect.quote_ident(APPLIED_COLUMN)?,
            batch_number: dialect.quote_ident(BATCH_NUMBER_COLUMN)?,
            id,
            id_definition,
            id_constraint,
            sequence,
            dialect,
            table,
        })
    }

    /// Dialect statements are rendered for.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Unquoted table descriptor.
    pub fn table(&self) -> &JournalTable {
        &self.table
    }

    /// Quoted, qualified table name.
    pub fn qualified_name(&self) -> &str {
        &self.qualified
    }

    /// Compare an introspection column with a name the way the backend
    /// resolves identifiers.
    fn name_matches(&self, column: &str, value: &str) -> String {
        if self.dialect.case_insensitive_identifiers() {
            format!("lower({column}) = lower({value})")
        } else {
            format!("{column} = {value}")
        }
    }

    /// Table and schema filter shared by both introspection queries.
    fn table_predicate(&self, binder: &mut Binder) -> String {
        let table = binder.bind(self.table.table());
        let schema = match self.table.schema() {
            Some(schema) => binder.bind(schema),
            None => self.dialect.current_schema_expr().to_string(),
        };
        format!(
            "{} AND {}",
            self.name_matches("TABLE_NAME", &table),
            self.name_matches("TABLE_SCHEMA", &schema)
        )
    }

    /// Count of tables matching the journal table.
    pub fn table_exists(&self) -> Statement {
        let mut b = Binder::new(self.dialect);
        let predicate = self.table_predicate(&mut b);
        b.finish(format!(
            "SELECT COUNT(*) FROM INFORMATION_SCHEMA.TABLES WHERE {predicate}"
        ))
    }

    /// Count of columns named `column` on the journal table.
    pub fn column_exists(&self, column: &str) -> Statement {
        let mut b = Binder::new(self.dialect);
        let predicate = self.table_predicate(&mut b);
        let column = b.bind(column);
        b.finish(format!(
            "SELECT COUNT(*) FROM INFORMATION_SCHEMA.COLUMNS WHERE {predicate} AND {}",
            self.name_matches("COLUMN_NAME", &column)
        ))
    }

    /// Column definition for an evolved integer column.
    fn evolved_column_def(&self, evolution: &ColumnEvolution, in_create: bool) -> CoreResult<String> {
        let name = self.dialect.quote_ident(evolution.column)?;
        let ty = self.dialect.integer_type();
        let default = evolution.default;
        Ok(
            if in_create || self.dialect.supports_not_null_on_add_column() {
                format!("{name} {ty} NOT NULL DEFAULT {default}")
            } else {
                format!("{name} {ty} DEFAULT {default}")
            },
        )
    }

    /// DDL creating the journal table in its current shape.
    ///
    /// DuckDB needs a sequence first, so the result may hold two statements.
    pub fn create_table(&self) -> CoreResult<String> {
        let mut columns = vec![
            self.id_definition.clone(),
            format!(
                "{} {} NOT NULL",
                self.script_name,
                self.dialect.script_name_type()
            ),
            format!("{} {} NOT NULL", self.applied, self.dialect.timestamp_type()),
        ];
        for evolution in EVOLUTIONS {
            columns.push(self.evolved_column_def(evolution, true)?);
        }
        columns.extend(self.id_constraint.clone());

        let create = format!(
            "CREATE TABLE {} (\n    {}\n)",
            self.qualified,
            columns.join(",\n    ")
        );
        Ok(match &self.sequence {
            Some(sequence) => format!("CREATE SEQUENCE IF NOT EXISTS {sequence};\n{create};"),
            None => create,
        })
    }

    /// DDL adding one evolved column to an existing journal table.
    pub fn add_column(&self, evolution: &ColumnEvolution) -> CoreResult<String> {
        Ok(format!(
            "ALTER TABLE {} {} {}",
            self.qualified,
            self.dialect.add_column_keyword(),
            self.evolved_column_def(evolution, false)?
        ))
    }

    /// All script names, ordered by name.
    pub fn select_executed(&self) -> String {
        format!(
            "SELECT {name} FROM {table} ORDER BY {name}",
            name = self.script_name,
            table = self.qualified
        )
    }

    /// Script names recorded in one batch, ordered by name.
    pub fn select_executed_on_batch(&self, batch_number: i64) -> Statement {
        let mut b = Binder::new(self.dialect);
        let batch = b.bind(batch_number);
        b.finish(format!(
            "SELECT {name} FROM {table} WHERE {batch_col} = {batch} ORDER BY {name}",
            name = self.script_name,
            table = self.qualified,
            batch_col = self.batch_number
        ))
    }

    /// Highest batch number, or 0 for an empty table.
    pub fn select_current_batch(&self) -> String {
        format!(
            "SELECT COALESCE(MAX({}), 0) FROM {}",
            self.batch_number, self.qualified
        )
    }

    /// Insert one executed-script record.
    pub fn insert(&self, script_name: &str, applied: NaiveDateTime, batch_number: i64) -> Statement {
        let mut b = Binder::new(self.dialect);
        let name = b.bind(script_name);
        let applied_at = b.bind(applied);
        let batch = b.bind(batch_number);
        b.finish(format!(
            "INSERT INTO {} ({}, {}, {}) VALUES ({name}, {applied_at}, {batch})",
            self.qualified, self.script_name, self.applied, self.batch_number
        ))
    }

    /// Rename every record called `from` to `to`.
    pub fn rename(&self, from: &str, to: &str) -> Statement {
        let mut b = Binder::new(self.dialect);
        let new_name = b.bind(to);
        let old_name = b.bind(from);
        b.finish(format!(
            "UPDATE {table} SET {name} = {new_name} WHERE {name} = {old_name}",
            table = self.qualified,
            name = self.script_name
        ))
    }

    /// Full records ordered by `Id`, with `Applied` rendered as text.
    ///
    /// Tables that predate batch numbering report every row in batch 0.
    pub fn select_entries(&self, has_batch_column: bool) -> String {
        let batch = if has_batch_column {
            self.batch_number.clone()
        } else {
            "0".to_string()
        };
        format!(
            "SELECT {id}, {name}, {applied}, {batch} FROM {table} ORDER BY {id}",
            id = self.id,
            name = self.script_name,
            applied = self.dialect.cast_to_text(&self.applied),
            table = self.qualified
        )
    }
}

/// Qualified name of the DuckDB sequence feeding `Id`.
///
/// `nextval` takes the name as a string and does not unescape doubled
/// quotes, so names containing `"` are rejected.
fn sequence_name(table: &JournalTable) -> CoreResult<String> {
    for part in table.schema().into_iter().chain([table.table()]) {
        if part.contains('"') {
            return Err(CoreError::InvalidIdentifier {
                name: part.to_string(),
                reason: "DuckDB journal names cannot contain '\"'".to_string(),
            });
        }
    }
    Dialect::DuckDb.quote_qualified(
        table.schema(),
        &format!("{}_{}_seq", table.table(), ID_COLUMN),
    )
}

/// How `Id` is generated on one dialect.
struct IdColumn {
    definition: String,
    /// Trailing table constraint
    constraint: Option<String>,
    sequence: Option<String>,
}

fn id_column(dialect: Dialect, table: &JournalTable, id: &str) -> CoreResult<IdColumn> {
    let (definition, constraint, sequence) = match dialect {
        Dialect::SqlServer => {
            let pk = dialect.quote_ident(&format!("PK_{}_{}", table.table(), ID_COLUMN))?;
            (
                format!("{id} INT IDENTITY(1,1) NOT NULL CONSTRAINT {pk} PRIMARY KEY"),
                None,
                None,
            )
        }
        Dialect::MySql => (
            format!("{id} INT NOT NULL AUTO_INCREMENT"),
            Some(format!("PRIMARY KEY ({id})")),
            None,
        ),
        Dialect::Postgres => (format!("{id} SERIAL NOT NULL PRIMARY KEY"), None, None),
        Dialect::DuckDb => {
            let sequence = sequence_name(table)?;
            (
                format!(
                    "{id} BIGINT NOT NULL DEFAULT nextval('{}') PRIMARY KEY",
                    escape_sql_string(&sequence)
                ),
                None,
                Some(sequence),
            )
        }
    };
    Ok(IdColumn {
        definition,
        constraint,
        sequence,
    })
}

#[cfg(test)]
#[path = "sql_test.rs"]
mod tests;
