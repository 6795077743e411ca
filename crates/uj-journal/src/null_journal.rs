//! Journal that keeps no history.
//!
//! Every script looks unapplied on every run, which suits collections of
//! idempotent scripts that should re-run each time.

use crate::error::{JournalError, JournalResult};
use crate::traits::Journal;
use std::sync::atomic::{AtomicBool, Ordering};
use uj_core::Script;

/// Journal that records nothing.
///
/// Batch queries and rollback marking are reported as
/// [`JournalError::Unsupported`] rather than answered with made-up values.
/// Logs a warning on first store.
#[derive(Debug, Default)]
pub struct NullJournal {
    warned: AtomicBool,
}

impl NullJournal {
    /// Create a null journal that has not warned yet.
    pub fn new() -> Self {
        Self::default()
    }

    fn warn_once(&self) {
        if !self.warned.swap(true, Ordering::SeqCst) {
            log::warn!(
                "Using the null journal: executed scripts are not recorded \
                 and every script will run again on the next upgrade."
            );
        }
    }

    fn unsupported<T>(operation: &'static str) -> JournalResult<T> {
        Err(JournalError::Unsupported {
            journal: "null",
            operation,
        })
    }
}

impl Journal for NullJournal {
    fn executed_scripts(&self) -> JournalResult<Vec<String>> {
        Ok(Vec::new())
    }

    fn executed_scripts_on_batch(&self, _batch_number: i64) -> JournalResult<Vec<String>> {
        Self::unsupported("executed_scripts_on_batch")
    }

    fn current_batch_number(&self) -> JournalResult<i64> {
        Self::unsupported("current_batch_number")
    }

    fn store_executed_script(&self, _script: &Script) -> JournalResult<()> {
        self.warn_once();
        Ok(())
    }

    fn store_executed_script_in_batch(
        &self,
        _script: &Script,
        _batch_number: i64,
    ) -> JournalResult<()> {
        self.warn_once();
        Ok(())
    }

    fn update_script_entry(&self, _script_name: &str) -> JournalResult<()> {
        Self::unsupported("update_script_entry")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_stays_empty_after_store() {
        let journal = NullJournal::new();
        journal
            .store_executed_script(&Script::new("001_init.sql", "CREATE TABLE t (x INT)"))
            .unwrap();
        journal
            .store_executed_script_in_batch(&Script::new("002.sql", ""), 3)
            .unwrap();
        assert!(journal.executed_scripts().unwrap().is_empty());
        assert!(journal.warned.load(Ordering::SeqCst));
    }

    #[test]
    fn test_batch_and_rollback_are_unsupported() {
        let journal = NullJournal::new();
        let results = [
            journal.executed_scripts_on_batch(1).map(|_| ()),
            journal.current_batch_number().map(|_| ()),
            journal.update_script_entry("001_init.sql"),
        ];
        for result in results {
            let err = result.unwrap_err();
            assert!(err.is_unsupported());
            assert!(err.as_db_error().is_none());
        }
    }

    #[test]
    fn test_unsupported_message_names_operation() {
        let err = NullJournal::new().current_batch_number().unwrap_err();
        assert_eq!(
            err.to_string(),
            "[J003] current_batch_number is not supported by the null journal"
        );
    }

    #[test]
    fn test_usable_as_trait_object() {
        let journal: Box<dyn Journal> = Box::new(NullJournal::new());
        assert!(journal.executed_scripts().unwrap().is_empty());
    }
}
