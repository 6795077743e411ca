//! The journal abstraction
//!
//! An upgrade engine asks a [`Journal`] which scripts have already run,
//! records each script it applies, and marks scripts rolled back. Variants
//! differ in where (and whether) that history is kept.

use crate::error::JournalResult;
use uj_core::Script;

/// Record of applied upgrade scripts
pub trait Journal {
    /// Names of every recorded script, sorted ascending
    ///
    /// Rolled-back entries appear under their prefixed name. Empty when no
    /// journal storage exists yet; reading never creates storage.
    fn executed_scripts(&self) -> JournalResult<Vec<String>>;

    /// Names of scripts recorded in `batch_number`, sorted ascending
    fn executed_scripts_on_batch(&self, batch_number: i64) -> JournalResult<Vec<String>>;

    /// Highest recorded batch number, or 0 when nothing is recorded
    fn current_batch_number(&self) -> JournalResult<i64>;

    /// Record `script` as applied in a new batch
    ///
    /// Creates or evolves storage first.
    fn store_executed_script(&self, script: &Script) -> JournalResult<()>;

    /// Record `script` as applied in an explicit batch (1 or greater)
    ///
    /// Lets one upgrade run group several scripts under a single batch.
    fn store_executed_script_in_batch(&self, script: &Script, batch_number: i64)
        -> JournalResult<()>;

    /// Mark every entry named `script_name` as rolled back
    fn update_script_entry(&self, script_name: &str) -> JournalResult<()>;
}
