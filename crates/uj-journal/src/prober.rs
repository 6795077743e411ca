//! Existence checks for the journal table and its columns.

use crate::sql::{JournalSql, Statement};
use uj_core::{ProbeErrorPolicy, UpgradeLog};
use uj_db::{DbResult, Session};

/// Answers "does the journal table (or one of its columns) exist?" with a
/// live introspection query.
///
/// Under [`ProbeErrorPolicy::Strict`] only a backend "object not found"
/// answers `false`; under [`ProbeErrorPolicy::Lenient`] every backend error
/// does, which can hide an outage behind an apparently empty journal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExistenceProber {
    policy: ProbeErrorPolicy,
}

impl ExistenceProber {
    /// Create a prober with the given error policy.
    pub fn new(policy: ProbeErrorPolicy) -> Self {
        Self { policy }
    }

    /// Error policy in effect.
    pub fn policy(&self) -> ProbeErrorPolicy {
        self.policy
    }

    /// Whether the journal table exists.
    pub fn table_exists(
        &self,
        session: &dyn Session,
        sql: &JournalSql,
        log: &dyn UpgradeLog,
    ) -> DbResult<bool> {
        self.run(session, &sql.table_exists(), log)
    }

    /// Whether the journal table has a column named `column`.
    pub fn column_exists(
        &self,
        session: &dyn Session,
        sql: &JournalSql,
        column: &str,
        log: &dyn UpgradeLog,
    ) -> DbResult<bool> {
        self.run(session, &sql.column_exists(column), log)
    }

    fn run(&self, session: &dyn Session, stmt: &Statement, log: &dyn UpgradeLog) -> DbResult<bool> {
        match (session.probe(&stmt.sql, &stmt.params), self.policy) {
            (Err(e), ProbeErrorPolicy::Lenient) => {
                log.write_information(&format!(
                    "Existence probe failed and was treated as absent: {e}"
                ));
                Ok(false)
            }
            (result, _) => result,
        }
    }
}
