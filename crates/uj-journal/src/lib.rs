//! uj-journal - Upgrade-script journal for Upjournal
//!
//! This crate records which upgrade scripts have been applied to a database.
//! [`TableJournal`] keeps the history in a table it creates and evolves on
//! first write; [`NullJournal`] keeps none. Both implement [`Journal`].

pub mod error;
pub mod evolver;
pub mod null_journal;
pub mod plan;
pub mod prober;
pub mod record;
pub mod schema;
pub mod sql;
pub mod table_journal;
pub mod traits;

pub use error::{JournalError, JournalResult};
pub use evolver::{SchemaEvolver, StorageState};
pub use null_journal::NullJournal;
pub use plan::pending_scripts;
pub use prober::ExistenceProber;
pub use record::ExecutedScript;
pub use sql::{JournalSql, Statement};
pub use table_journal::TableJournal;
pub use traits::Journal;
