//! Brings the journal table up to its current shape.
//!
//! Missing tables are created outright. Existing tables are compared column
//! by column against [`EVOLUTIONS`] and any missing column is added with its
//! default back-filled, so running the evolver twice is a no-op.

use crate::error::JournalResult;
use crate::prober::ExistenceProber;
use crate::schema::EVOLUTIONS;
use crate::sql::JournalSql;
use uj_core::UpgradeLog;
use uj_db::Session;

/// What [`SchemaEvolver::ensure_storage`] had to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageState {
    /// The table did not exist and was created
    Created,
    /// The table existed and these columns were added, in order
    Evolved(Vec<&'static str>),
    /// The table was already current
    Current,
}

/// Creates or evolves the journal table within one session.
pub struct SchemaEvolver<'a> {
    sql: &'a JournalSql,
    prober: ExistenceProber,
    log: &'a dyn UpgradeLog,
}

impl<'a> SchemaEvolver<'a> {
    /// Evolver for the table `sql` describes, probing with `prober`.
    pub fn new(sql: &'a JournalSql, prober: ExistenceProber, log: &'a dyn UpgradeLog) -> Self {
        Self { sql, prober, log }
    }

    /// Make sure the journal table exists with every evolved column.
    pub fn ensure_storage(&self, session: &dyn Session) -> JournalResult<StorageState> {
        let table = self.sql.table();
        if !self.prober.table_exists(session, self.sql, self.log)? {
            self.log
                .write_information(&format!("Creating the {table} table"));
            session.execute_batch(&self.sql.create_table()?)?;
            self.log
                .write_information(&format!("The {table} table has been created"));
            return Ok(StorageState::Created);
        }

        let mut added = Vec::new();
        for evolution in EVOLUTIONS {
            if self
                .prober
                .column_exists(session, self.sql, evolution.column, self.log)?
            {
                continue;
            }
            self.log.write_information(&format!(
                "Adding the {} column to the {table} table",
                evolution.column
            ));
            session.execute_batch(&self.sql.add_column(evolution)?)?;
            log::debug!(
                "journal {table} evolved to version {}",
                evolution.version
            );
            added.push(evolution.column);
        }

        Ok(if added.is_empty() {
            StorageState::Current
        } else {
            StorageState::Evolved(added)
        })
    }
}
