//! Journal kept in a table of the target database.

use crate::error::{JournalError, JournalResult};
use crate::evolver::{SchemaEvolver, StorageState};
use crate::prober::ExistenceProber;
use crate::record::ExecutedScript;
use crate::schema::{rolled_back_name, BATCH_NUMBER_COLUMN, EMPTY_BATCH_NUMBER};
use crate::sql::JournalSql;
use crate::traits::Journal;
use chrono::Utc;
use uj_core::{Config, Dialect, JournalTable, LogFacade, ProbeErrorPolicy, Script, UpgradeLog};
use uj_db::{ConnectionManager, Session};

/// How much of the journal table is present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Storage {
    Absent,
    /// Created before batch numbering; every row counts as batch 0
    Legacy,
    Current,
}

/// Journal stored in a `SchemaVersions`-style table.
///
/// Reads never create storage: against a fresh database they log a note and
/// report an empty history. The first store creates the table, and evolves
/// tables written by older releases, before inserting.
///
/// # Example
///
/// ```no_run
/// use uj_core::{Dialect, JournalTable, Script};
/// use uj_db::DuckDbConnectionManager;
/// use uj_journal::{Journal, TableJournal};
///
/// let manager = DuckDbConnectionManager::in_memory()?;
/// let journal = TableJournal::new(manager, Dialect::DuckDb, JournalTable::default())?;
/// journal.store_executed_script(&Script::new("001_init.sql", ""))?;
/// assert_eq!(journal.current_batch_number()?, 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct TableJournal<C: ConnectionManager> {
    manager: C,
    sql: JournalSql,
    prober: ExistenceProber,
    log: Box<dyn UpgradeLog>,
}

impl<C: ConnectionManager> TableJournal<C> {
    /// Create a journal over `table`, logging through [`LogFacade`].
    pub fn new(manager: C, dialect: Dialect, table: JournalTable) -> JournalResult<Self> {
        Ok(Self {
            manager,
            sql: JournalSql::new(dialect, table)?,
            prober: ExistenceProber::default(),
            log: Box::new(LogFacade),
        })
    }

    /// Create a journal from the config, applying `target` overrides.
    pub fn from_config(config: &Config, target: Option<&str>, manager: C) -> JournalResult<Self> {
        let table = config.journal_table(target)?;
        Ok(Self::new(manager, config.dialect, table)?.with_probe_policy(config.probe_errors))
    }

    /// Send lifecycle messages to `log` instead.
    pub fn with_log(mut self, log: impl UpgradeLog + 'static) -> Self {
        self.log = Box::new(log);
        self
    }

    /// Choose how backend errors during existence probes are treated.
    pub fn with_probe_policy(mut self, policy: ProbeErrorPolicy) -> Self {
        self.prober = ExistenceProber::new(policy);
        self
    }

    /// Connection manager the journal executes through.
    pub fn connection_manager(&self) -> &C {
        &self.manager
    }

    /// Statement generator for this journal's table.
    pub fn sql(&self) -> &JournalSql {
        &self.sql
    }

    /// Whether the journal table exists.
    pub fn storage_exists(&self) -> JournalResult<bool> {
        self.manager.execute_with_managed_connection(|session| {
            Ok(self
                .prober
                .table_exists(session, &self.sql, self.log.as_ref())?)
        })
    }

    /// Create or evolve the journal table without recording anything.
    pub fn ensure_storage(&self) -> JournalResult<StorageState> {
        self.manager
            .execute_with_managed_connection(|session| self.evolver().ensure_storage(session))
    }

    /// Every journal row ordered by `Id`, rolled-back entries included.
    pub fn entries(&self) -> JournalResult<Vec<ExecutedScript>> {
        self.manager.execute_with_managed_connection(|session| {
            let has_batch_column = match self.storage(session)? {
                Storage::Absent => return Ok(Vec::new()),
                Storage::Legacy => false,
                Storage::Current => true,
            };
            session
                .query_rows(&self.sql.select_entries(has_batch_column), &[])?
                .iter()
                .map(|row| ExecutedScript::from_row(row))
                .collect()
        })
    }

    fn evolver(&self) -> SchemaEvolver<'_> {
        SchemaEvolver::new(&self.sql, self.prober, self.log.as_ref())
    }

    /// Probe the table and, when present, the batch column.
    fn storage(&self, session: &dyn Session) -> JournalResult<Storage> {
        if !self.table_present(session)? {
            return Ok(Storage::Absent);
        }
        if self
            .prober
            .column_exists(session, &self.sql, BATCH_NUMBER_COLUMN, self.log.as_ref())?
        {
            Ok(Storage::Current)
        } else {
            Ok(Storage::Legacy)
        }
    }

    /// Whether the table exists, noting its absence in the upgrade log.
    fn table_present(&self, session: &dyn Session) -> JournalResult<bool> {
        let log = self.log.as_ref();
        let exists = self.prober.table_exists(session, &self.sql, log)?;
        if !exists {
            log.write_information(&format!(
                "The {} table could not be found. The database is assumed to be at an initial state.",
                self.sql.table()
            ));
        }
        Ok(exists)
    }

    fn current_batch(&self, session: &dyn Session) -> JournalResult<i64> {
        Ok(session
            .query_scalar(&self.sql.select_current_batch(), &[])?
            .unwrap_or(EMPTY_BATCH_NUMBER))
    }

    fn insert(&self, session: &dyn Session, script: &Script, batch_number: i64) -> JournalResult<()> {
        let stmt = self
            .sql
            .insert(script.name(), Utc::now().naive_utc(), batch_number);
        session.execute(&stmt.sql, &stmt.params)?;
        log::debug!(
            "journal {}: recorded {} in batch {batch_number}",
            self.sql.table(),
            script.name()
        );
        Ok(())
    }
}

impl<C: ConnectionManager> Journal for TableJournal<C> {
    fn executed_scripts(&self) -> JournalResult<Vec<String>> {
        self.manager.execute_with_managed_connection(|session| {
            if !self.table_present(session)? {
                return Ok(Vec::new());
            }
            // Backend collations disagree on ordering; byte order is the contract
            let mut names = session.query_column(&self.sql.select_executed(), &[])?;
            names.sort();
            Ok(names)
        })
    }

    fn executed_scripts_on_batch(&self, batch_number: i64) -> JournalResult<Vec<String>> {
        self.manager.execute_with_managed_connection(|session| {
            let mut names = match self.storage(session)? {
                Storage::Absent => return Ok(Vec::new()),
                Storage::Legacy if batch_number == EMPTY_BATCH_NUMBER => {
                    session.query_column(&self.sql.select_executed(), &[])?
                }
                Storage::Legacy => return Ok(Vec::new()),
                Storage::Current => {
                    let stmt = self.sql.select_executed_on_batch(batch_number);
                    session.query_column(&stmt.sql, &stmt.params)?
                }
            };
            names.sort();
            Ok(names)
        })
    }

    fn current_batch_number(&self) -> JournalResult<i64> {
        self.manager
            .execute_with_managed_connection(|session| match self.storage(session)? {
                Storage::Absent | Storage::Legacy => Ok(EMPTY_BATCH_NUMBER),
                Storage::Current => self.current_batch(session),
            })
    }

    fn store_executed_script(&self, script: &Script) -> JournalResult<()> {
        self.manager.execute_with_managed_connection(|session| {
            self.evolver().ensure_storage(session)?;
            let next = self.current_batch(session)? + 1;
            self.insert(session, script, next)
        })
    }

    fn store_executed_script_in_batch(
        &self,
        script: &Script,
        batch_number: i64,
    ) -> JournalResult<()> {
        if batch_number < 1 {
            return Err(JournalError::InvalidBatchNumber(batch_number));
        }
        self.manager.execute_with_managed_connection(|session| {
            self.evolver().ensure_storage(session)?;
            self.insert(session, script, batch_number)
        })
    }

    fn update_script_entry(&self, script_name: &str) -> JournalResult<()> {
        self.manager.execute_with_managed_connection(|session| {
            if !self.table_present(session)? {
                return Ok(());
            }
            let stmt = self.sql.rename(script_name, &rolled_back_name(script_name));
            let renamed = session.execute(&stmt.sql, &stmt.params)?;
            log::debug!(
                "journal {}: marked {renamed} entries of {script_name} rolled back",
                self.sql.table()
            );
            Ok(())
        })
    }
}

#[cfg(test)]
#[path = "table_journal_test.rs"]
mod tests;
