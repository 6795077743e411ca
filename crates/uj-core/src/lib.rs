//! uj-core - Core library for Upjournal
//!
//! This crate provides the types shared by the journal and its backends:
//! dialect descriptions and identifier quoting, the journal table
//! descriptor, upgrade scripts, configuration parsing, and the
//! informational log interface.

pub mod config;
pub mod dialect;
pub mod error;
pub mod journal_table;
pub mod script;
pub mod upgrade_log;

pub use config::{Config, DatabaseConfig, ProbeErrorPolicy, TargetConfig};
pub use dialect::{Dialect, PlaceholderStyle, QuoteStyle};
pub use error::{CoreError, CoreResult};
pub use journal_table::JournalTable;
pub use script::{Script, ScriptKind};
pub use upgrade_log::{LogFacade, MemoryLog, UpgradeLog};
